use egui::{Color32, RichText};

use crate::calendar::{Dialog, DialogAction};
use super::theme::{dialog_colors, ACCENT};

const NOTES_ID: &str = "appointment_notes";

/// Read-only snapshot of what the dialog shows; notes are edited separately
pub struct DialogView {
    pub title: String,
    pub when: String,
    pub participants: Option<String>,
    pub participants_failed: bool,
    pub actions: &'static [DialogAction],
}

impl DialogView {
    pub fn from_dialog(dialog: &Dialog) -> Option<Self> {
        let title = dialog.title()?;
        let when = dialog
            .event()
            .map(|event| {
                format!(
                    "{} {}–{}",
                    event.start_time.format("%A, %B %-d"),
                    event.start_time.format("%H:%M"),
                    event.end_time.format("%H:%M")
                )
            })
            .unwrap_or_default();

        Some(Self {
            title,
            when,
            participants: dialog.participants_text(),
            participants_failed: dialog.participants_failed(),
            actions: dialog.actions(),
        })
    }
}

/// Modal for booking or editing an appointment. Returns the pressed button.
pub fn render_appointment_dialog(
    ctx: &egui::Context,
    view: &DialogView,
    notes: &mut String,
) -> Option<DialogAction> {
    let mut pressed = None;
    let mut notes_engaged = false;

    let (content_bg, frame_color) = dialog_colors();
    let dialog_frame = egui::Frame::none()
        .fill(content_bg)
        .stroke(egui::Stroke::new(2.0, frame_color))
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(egui::Margin::same(20.0));

    egui::Window::new(view.title.as_str())
        .id(egui::Id::new("appointment_dialog"))
        .collapsible(false)
        .resizable(false)
        .default_width(480.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(dialog_frame)
        .show(ctx, |ui| {
            ui.set_min_width(440.0);
            let section_color = Color32::from_rgb(140, 140, 160);

            ui.label(RichText::new(&view.when).size(15.0).color(Color32::WHITE));
            ui.add_space(8.0);

            ui.label(RichText::new("Participants").color(section_color).strong());
            match &view.participants {
                Some(names) => {
                    ui.label(names);
                }
                None if view.participants_failed => {
                    ui.label(RichText::new("Participants unavailable").color(section_color));
                }
                None => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Loading participants...").color(section_color));
                    });
                }
            }
            ui.add_space(8.0);

            ui.label(RichText::new("Description").color(section_color).strong());
            let notes_response = ui.add(
                egui::TextEdit::multiline(notes)
                    .id(egui::Id::new(NOTES_ID))
                    .desired_width(ui.available_width())
                    .desired_rows(5)
                    .hint_text("What would you like to cover?")
            );
            // Escape inside the editor only drops focus
            notes_engaged = notes_response.has_focus() || notes_response.lost_focus();

            ui.add_space(14.0);

            ui.horizontal(|ui| {
                for action in view.actions {
                    let button = match action {
                        DialogAction::Book | DialogAction::Update => egui::Button::new(
                            RichText::new(action.label()).color(Color32::WHITE)
                        ).fill(ACCENT),
                        DialogAction::CancelAppointment => egui::Button::new(
                            RichText::new(action.label()).color(Color32::from_rgb(224, 108, 117))
                        ),
                        DialogAction::Exit => egui::Button::new(action.label()),
                    };
                    if ui.add(button).clicked() {
                        pressed = Some(*action);
                    }
                }
            });
        });

    if !notes_engaged && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        pressed = pressed.or(Some(DialogAction::Exit));
    }

    pressed
}
