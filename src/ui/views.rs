use chrono::{Local, NaiveDate};
use egui::{Color32, RichText, Ui};

use crate::api::Event;
use crate::calendar::coaches::{CoachSelector, NO_COACH};
use crate::calendar::layout::{
    day_labels, day_windows, month_label, place_slots, BUSINESS_END_HOUR, BUSINESS_START_HOUR,
    COLUMN_HEIGHT, PIXELS_PER_MINUTE,
};
use super::theme::{button_colors, grid_colors, slot_colors};

/// Navigation intent from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekNav {
    Previous,
    Next,
}

/// Coach picker. Returns the newly chosen id (`NO_COACH` for "none").
pub fn render_coach_selector(ui: &mut Ui, selector: &CoachSelector) -> Option<i64> {
    let mut chosen = selector.selected_id();

    ui.horizontal(|ui| {
        ui.label("Select a coach:");
        let selected_text = selector
            .selected()
            .map(|c| c.display_name())
            .unwrap_or_else(|| "None selected".to_string());

        egui::ComboBox::from_id_salt("coach_selector")
            .selected_text(selected_text)
            .width(220.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut chosen, NO_COACH, "None selected");
                for coach in selector.coaches() {
                    ui.selectable_value(&mut chosen, coach.id, coach.display_name());
                }
            });

        if selector.is_empty() {
            ui.label(RichText::new("No coaches available").color(Color32::from_rgb(120, 120, 140)));
        }
    });

    (chosen != selector.selected_id()).then_some(chosen)
}

/// Month label between previous/next arrows, as a pill-shaped button
pub fn render_week_header(ui: &mut Ui, week_start: NaiveDate, loading: bool) -> Option<WeekNav> {
    let mut nav = None;
    let (button_bg, button_text) = button_colors();

    ui.horizontal(|ui| {
        egui::Frame::none()
            .fill(button_bg)
            .rounding(egui::Rounding::same(12.0))
            .inner_margin(egui::Margin::symmetric(8.0, 4.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let left_arrow = ui.add(egui::Label::new(
                        RichText::new(egui_phosphor::regular::CARET_LEFT).size(14.0).color(button_text)
                    ).sense(egui::Sense::click()));
                    if left_arrow.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    }
                    if left_arrow.on_hover_text("Previous week").clicked() {
                        nav = Some(WeekNav::Previous);
                    }

                    // Min width for the longest label, "September/October"
                    ui.allocate_ui_with_layout(
                        egui::vec2(150.0, 14.0),
                        egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                        |ui| {
                            ui.label(RichText::new(month_label(week_start)).size(14.0).color(button_text));
                        }
                    );

                    let right_arrow = ui.add(egui::Label::new(
                        RichText::new(egui_phosphor::regular::CARET_RIGHT).size(14.0).color(button_text)
                    ).sense(egui::Sense::click()));
                    if right_arrow.hovered() {
                        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                    }
                    if right_arrow.on_hover_text("Next week").clicked() {
                        nav = Some(WeekNav::Next);
                    }
                });
            });

        if loading {
            ui.spinner();
        }
    });

    nav
}

/// Seven day columns with their slots. Returns the event whose block was
/// clicked, whether or not it is bookable; the container decides.
pub fn render_week_grid(ui: &mut Ui, week_start: NaiveDate, events: &[Event]) -> Option<Event> {
    let mut clicked = None;
    let today = Local::now().date_naive();
    let (grid_line_color, hour_line_color, label_color) = grid_colors();

    let hour_label_width = 50.0;
    let header_height = 28.0;
    let block_margin = 2.0;

    let available_width = ui.available_width();
    let labels = day_labels(week_start);
    let day_width = (available_width - hour_label_width) / labels.len() as f32;

    // Day labels
    let (header_rect, _) = ui.allocate_exact_size(
        egui::vec2(available_width, header_height),
        egui::Sense::hover()
    );
    let painter = ui.painter();
    for (i, label) in labels.iter().enumerate() {
        let x = header_rect.min.x + hour_label_width + i as f32 * day_width;
        let color = if label.date == today { Color32::WHITE } else { Color32::from_rgb(0xb0, 0xb0, 0xa8) };
        painter.text(
            egui::pos2(x + 8.0, header_rect.center().y),
            egui::Align2::LEFT_CENTER,
            &label.text,
            egui::FontId::proportional(14.0),
            color,
        );
    }

    let (grid_rect, _) = ui.allocate_exact_size(
        egui::vec2(available_width, COLUMN_HEIGHT),
        egui::Sense::hover()
    );
    let painter = ui.painter();

    // Hour labels and horizontal lines
    for hour in BUSINESS_START_HOUR..=BUSINESS_END_HOUR {
        let y = grid_rect.min.y + ((hour - BUSINESS_START_HOUR) * 60) as f32 * PIXELS_PER_MINUTE;
        if hour < BUSINESS_END_HOUR {
            painter.text(
                egui::pos2(grid_rect.min.x + hour_label_width - 8.0, y),
                egui::Align2::RIGHT_TOP,
                format!("{:02}:00", hour),
                egui::FontId::proportional(11.0),
                label_color,
            );
        }
        painter.line_segment(
            [
                egui::pos2(grid_rect.min.x + hour_label_width, y),
                egui::pos2(grid_rect.max.x, y),
            ],
            egui::Stroke::new(1.0, if hour == BUSINESS_START_HOUR { hour_line_color } else { grid_line_color }),
        );
    }

    for (day_idx, window) in day_windows(week_start).iter().enumerate() {
        let col_x = grid_rect.min.x + hour_label_width + day_idx as f32 * day_width;
        let col_rect = egui::Rect::from_min_size(
            egui::pos2(col_x, grid_rect.min.y),
            egui::vec2(day_width, COLUMN_HEIGHT)
        );

        if window.date == today {
            ui.painter().rect_filled(col_rect, 0.0, Color32::from_rgb(0x11, 0x11, 0x10));
        }
        ui.painter().line_segment(
            [col_rect.left_top(), col_rect.left_bottom()],
            egui::Stroke::new(1.0, grid_line_color),
        );

        // Blocks may straddle the business window; keep them in the column
        let painter = ui.painter().with_clip_rect(col_rect);

        for (slot_idx, slot) in place_slots(window, events).into_iter().enumerate() {
            let block_rect = egui::Rect::from_min_size(
                egui::pos2(col_x + block_margin, grid_rect.min.y + slot.geometry.top),
                egui::vec2(day_width - block_margin * 2.0, slot.geometry.height.max(1.0))
            );
            let visible = block_rect.intersect(col_rect);
            let clickable = slot.event.is_clickable();

            let response = ui.interact(
                visible,
                ui.id().with(("slot", day_idx, slot_idx)),
                egui::Sense::click(),
            );

            let (fill, border, text_color) = slot_colors(slot.style);
            let stroke = if clickable && response.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                egui::Stroke::new(2.0, Color32::WHITE)
            } else {
                egui::Stroke::new(1.0, border)
            };
            painter.rect(block_rect, 4.0, fill, stroke);

            let mut text_y = block_rect.min.y + 4.0;
            if block_rect.height() > 16.0 {
                painter.text(
                    egui::pos2(block_rect.min.x + 6.0, text_y),
                    egui::Align2::LEFT_TOP,
                    &slot.event.name,
                    egui::FontId::proportional(12.0),
                    text_color,
                );
                text_y += 15.0;
            }
            if block_rect.height() > 34.0 {
                let times = format!(
                    "{}–{}",
                    slot.event.start_time.format("%H:%M"),
                    slot.event.end_time.format("%H:%M")
                );
                painter.text(
                    egui::pos2(block_rect.min.x + 6.0, text_y),
                    egui::Align2::LEFT_TOP,
                    times,
                    egui::FontId::proportional(11.0),
                    text_color.gamma_multiply(0.7),
                );
            }

            if response.clicked() {
                clicked = Some(slot.event.clone());
            }
        }
    }

    // Right edge line
    ui.painter().line_segment(
        [grid_rect.right_top(), grid_rect.right_bottom()],
        egui::Stroke::new(1.0, grid_line_color),
    );

    clicked
}
