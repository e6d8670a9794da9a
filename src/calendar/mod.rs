pub mod coaches;
pub mod dialog;
pub mod effects;
pub mod layout;
pub mod state;

pub use dialog::{Dialog, DialogAction};
pub use state::{CalendarState, Command, Outcome};
