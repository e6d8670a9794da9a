use anyhow::{Context, Result};
use chrono::Local;
use eframe::egui;
use egui::{Color32, RichText};
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::api::ScheduleClient;
use crate::calendar::{effects, CalendarState, Command, Outcome};
use crate::config::Config;
use super::dialog::{render_appointment_dialog, DialogView};
use super::views::{self, WeekNav};

pub struct CoachCalendarApp {
    config: Config,
    state: CalendarState,
    client: ScheduleClient,

    // Async communication
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<Outcome>,
    result_tx: Sender<Outcome>,
    /// In-flight events fetch; aborted when a newer one starts
    events_task: Option<tokio::task::JoinHandle<()>>,
}

impl CoachCalendarApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Result<Self> {
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx);

        let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        let client = ScheduleClient::new(&config).context("Failed to create HTTP client")?;
        let (result_tx, result_rx) = channel();

        tracing::info!("Using schedule service at {}", config.base_url());

        let today = Local::now().date_naive();
        let state = CalendarState::new(config.user.clone(), today);

        let mut app = Self {
            config,
            state,
            client,
            runtime,
            result_rx,
            result_tx,
            events_task: None,
        };

        let commands = app.state.start();
        app.dispatch(&cc.egui_ctx, commands);

        Ok(app)
    }

    /// Run each command on the runtime; outcomes come back through the channel
    fn dispatch(&mut self, ctx: &egui::Context, commands: Vec<Command>) {
        for command in commands {
            let supersedes = matches!(command, Command::FetchEvents(_));
            let client = self.client.clone();
            let tx = self.result_tx.clone();
            let ctx = ctx.clone();

            let handle = self.runtime.spawn(async move {
                if let Some(outcome) = effects::run(&client, command).await {
                    let _ = tx.send(outcome);
                    ctx.request_repaint();
                }
            });

            if supersedes {
                if let Some(previous) = self.events_task.replace(handle) {
                    previous.abort();
                }
            }
        }
    }

    fn check_async_results(&mut self) {
        while let Ok(outcome) = self.result_rx.try_recv() {
            self.state.apply(outcome);
        }
    }

    fn render_top_bar(&mut self, ui: &mut egui::Ui) -> Vec<Command> {
        let mut commands = Vec::new();
        let dim_color = Color32::from_rgb(120, 120, 130);

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            ui.heading("Schedule a coaching session");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("Booking as {}", self.state.user().display_name()))
                        .color(dim_color)
                );
            });
        });
        ui.add_space(4.0);

        // Navigation stays locked while the dialog is open
        let enabled = !self.state.dialog().is_shown();
        ui.add_enabled_ui(enabled, |ui| {
            ui.horizontal(|ui| {
                if let Some(coach_id) = views::render_coach_selector(ui, self.state.coaches()) {
                    commands.extend(self.state.select_coach(coach_id));
                }

                ui.add_space(16.0);

                match views::render_week_header(ui, self.state.calendar_date(), self.state.is_loading()) {
                    Some(WeekNav::Previous) => commands.extend(self.state.previous_week()),
                    Some(WeekNav::Next) => commands.extend(self.state.next_week()),
                    None => {}
                }

                let reload = ui.add(egui::Label::new(
                    RichText::new(egui_phosphor::regular::ARROWS_CLOCKWISE).size(16.0).color(dim_color)
                ).sense(egui::Sense::click()));
                if reload.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                if reload.on_hover_text("Reload").clicked() {
                    commands.extend(self.state.refresh());
                }
            });
        });
        ui.add_space(8.0);

        commands
    }
}

impl eframe::App for CoachCalendarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.font_scale = (self.config.font_scale * zoom_delta).clamp(0.75, 2.5);
            if (zoom_delta - 1.0).abs() > 0.01 {
                if let Err(e) = self.config.save() {
                    tracing::warn!("Failed to save font scale: {:#}", e);
                }
            }
        }
        ctx.set_pixels_per_point(self.config.font_scale);

        self.check_async_results();

        let mut commands = Vec::new();

        egui::TopBottomPanel::top("top_bar")
            .frame(egui::Frame::none().inner_margin(egui::Margin::symmetric(16.0, 0.0)))
            .show_separator_line(false)
            .show(ctx, |ui| {
                commands.extend(self.render_top_bar(ui));
            });

        egui::CentralPanel::default().frame(
            egui::Frame::none().inner_margin(egui::Margin::symmetric(16.0, 8.0))
        ).show(ctx, |ui| {
            if self.state.coaches().selected().is_none() {
                ui.label(
                    RichText::new("Pick a coach to see their open slots.")
                        .color(Color32::from_rgb(120, 120, 130))
                );
                ui.add_space(8.0);
            }

            let clicked = views::render_week_grid(ui, self.state.calendar_date(), self.state.events());
            // The grid sits behind the dialog; clicks only count while it is closed
            if let Some(event) = clicked.filter(|_| !self.state.dialog().is_shown()) {
                commands.extend(self.state.slot_clicked(&event));
            }
        });

        if let Some(view) = DialogView::from_dialog(self.state.dialog()) {
            let action = self
                .state
                .dialog_notes_mut()
                .and_then(|notes| render_appointment_dialog(ctx, &view, notes));
            if let Some(action) = action {
                commands.extend(self.state.dialog_action(action));
            }
        }

        if !commands.is_empty() {
            self.dispatch(ctx, commands);
        }
    }
}
