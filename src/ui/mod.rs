mod app;
mod dialog;
mod theme;
mod views;

pub use app::CoachCalendarApp;
pub(crate) use theme::{setup_fonts, setup_theme};
