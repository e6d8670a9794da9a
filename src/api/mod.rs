mod types;
mod client;
mod time;

pub use types::*;
pub use client::ScheduleClient;
pub use time::local_at;
