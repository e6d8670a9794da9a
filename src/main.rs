#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod api;
mod calendar;
mod config;
mod ui;

use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> eframe::Result<()> {
    init_tracing();

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Using default configuration: {:#}", e);
        Config::default()
    });

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 800.0])
        .with_min_inner_size([900.0, 640.0])
        .with_title("Coach Calendar");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Coach Calendar",
        options,
        Box::new(|cc| Ok(Box::new(ui::CoachCalendarApp::new(cc, config)?))),
    )
}
