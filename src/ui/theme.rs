use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::calendar::layout::SlotStyle;

pub fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    // Phosphor icons as fallback in the Proportional family
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    ctx.set_fonts(fonts);
}

pub fn setup_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    // Dark visuals with blue accents
    let mut visuals = Visuals::dark();

    let bg = Color32::BLACK;
    visuals.panel_fill = bg;
    visuals.window_fill = bg;
    visuals.faint_bg_color = Color32::from_rgb(20, 20, 18);
    visuals.extreme_bg_color = bg;

    // Widget colors - warm grays (R=G > B for warmth)
    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(40, 40, 38);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(176, 176, 168));

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(56, 56, 52);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(200, 200, 192));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(80, 80, 74);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.selection.bg_fill = ACCENT;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = ACCENT;

    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.window_rounding = Rounding::same(8.0);

    style.visuals = visuals;

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(20.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(12.0, 10.0);
    style.spacing.button_padding = egui::vec2(18.0, 10.0);
    style.spacing.window_margin = egui::Margin::same(24.0);

    ctx.set_style(style);
}

pub const ACCENT: Color32 = Color32::from_rgb(19, 152, 244);

/// Returns (fill, border, text) for a slot block
pub fn slot_colors(style: SlotStyle) -> (Color32, Color32, Color32) {
    match style {
        SlotStyle::Bookable => (
            Color32::from_rgb(0x12, 0x2e, 0x1c),   // dark green
            Color32::from_rgb(0x4c, 0xaf, 0x50),
            Color32::WHITE,
        ),
        SlotStyle::Disabled => (
            Color32::from_rgb(0x1c, 0x1c, 0x1a),
            Color32::from_rgb(0x38, 0x38, 0x34),
            Color32::from_rgb(0x70, 0x70, 0x68),
        ),
        SlotStyle::Booked => (
            Color32::from_rgb(0x0b, 0x2a, 0x40),   // dark blue
            ACCENT,
            Color32::WHITE,
        ),
        SlotStyle::Default => (
            Color32::from_rgb(0x28, 0x28, 0x26),
            Color32::from_rgb(0x50, 0x50, 0x4a),
            Color32::from_rgb(200, 200, 192),
        ),
    }
}

/// Returns (bg_color, text_color) for button-like elements to ensure consistency
pub fn button_colors() -> (Color32, Color32) {
    (
        Color32::from_rgb(56, 56, 52),       // bg - warm gray
        Color32::from_rgb(200, 200, 192),    // text - warm gray
    )
}

/// Returns (content_bg, frame_color) for dialogs
pub fn dialog_colors() -> (Color32, Color32) {
    (
        Color32::BLACK,                      // content bg
        Color32::from_rgb(40, 40, 38),       // frame/border - warm gray
    )
}

/// Returns (grid_line, hour_line, label) colors for the week grid
pub fn grid_colors() -> (Color32, Color32, Color32) {
    (
        Color32::from_rgb(0x40, 0x40, 0x3c),
        Color32::from_rgb(0x50, 0x50, 0x4a),
        Color32::from_rgb(0x70, 0x70, 0x68),
    )
}
