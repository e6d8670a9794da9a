//! Week grid geometry: which week is shown, how it is labelled, and where
//! each slot lands inside its day column.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Weekday};

use crate::api::{local_at, Event, EventKind};

pub const DAYS_PER_WEEK: i64 = 7;
pub const BUSINESS_START_HOUR: u32 = 8;
pub const BUSINESS_END_HOUR: u32 = 18;
pub const BUSINESS_MINUTES: f32 = ((BUSINESS_END_HOUR - BUSINESS_START_HOUR) * 60) as f32;
/// Height of a day column in pixels
pub const COLUMN_HEIGHT: f32 = 500.0;
pub const PIXELS_PER_MINUTE: f32 = COLUMN_HEIGHT / BUSINESS_MINUTES;
/// Gap left between vertically adjacent blocks
pub const SLOT_GAP: f32 = 1.0;

/// The Sunday that starts the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let days_from_sunday = date.weekday().num_days_from_sunday();
    date - Duration::days(days_from_sunday as i64)
}

/// Week shown on startup. Once this week is more than half over (Friday or
/// Saturday) look ahead to next week.
pub fn default_week_start(today: NaiveDate) -> NaiveDate {
    let start = week_start(today);
    if today.weekday().num_days_from_sunday() > 4 {
        start + Duration::days(DAYS_PER_WEEK)
    } else {
        start
    }
}

/// "January", or "January/February" when the week straddles two months
pub fn month_label(week_start: NaiveDate) -> String {
    let last = week_start + Duration::days(DAYS_PER_WEEK - 1);
    if week_start.month() == last.month() {
        week_start.format("%B").to_string()
    } else {
        format!("{}/{}", week_start.format("%B"), last.format("%B"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayLabel {
    pub date: NaiveDate,
    /// "Sun 7"
    pub text: String,
}

pub fn week_days(week_start: NaiveDate) -> Vec<NaiveDate> {
    (0..DAYS_PER_WEEK).map(|i| week_start + Duration::days(i)).collect()
}

pub fn day_labels(week_start: NaiveDate) -> Vec<DayLabel> {
    week_days(week_start)
        .into_iter()
        .map(|date| DayLabel {
            date,
            text: format!("{} {}", weekday_abbrev(date.weekday()), date.day()),
        })
        .collect()
}

fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

/// Half-open `[from, to)` range of instants covered by one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub from: DateTime<Local>,
    pub to: DateTime<Local>,
}

impl WeekWindow {
    pub fn for_week(week_start: NaiveDate) -> Self {
        Self {
            from: local_at(week_start, 0),
            to: local_at(week_start + Duration::days(DAYS_PER_WEEK), 0),
        }
    }
}

/// The 08:00–18:00 span of one day; the coordinate space of its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            start: local_at(date, BUSINESS_START_HOUR),
            end: local_at(date, BUSINESS_END_HOUR),
        }
    }

    /// An event lands in this column iff it starts before the window closes
    /// and has not ended before it opens
    pub fn contains(&self, event: &Event) -> bool {
        event.start_time < self.end && event.end_time >= self.start
    }

    pub fn geometry(&self, event: &Event) -> SlotGeometry {
        let offset_minutes = (event.start_time - self.start).num_seconds() as f32 / 60.0;
        SlotGeometry {
            top: offset_minutes * PIXELS_PER_MINUTE,
            height: event.duration_minutes() * PIXELS_PER_MINUTE - SLOT_GAP,
        }
    }
}

pub fn day_windows(week_start: NaiveDate) -> Vec<DayWindow> {
    week_days(week_start).into_iter().map(DayWindow::for_date).collect()
}

/// Vertical placement of a block relative to the top of its column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGeometry {
    pub top: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStyle {
    Bookable,
    Disabled,
    Booked,
    Default,
}

impl SlotStyle {
    pub fn for_event(event: &Event) -> Self {
        match event.kind {
            EventKind::OpenSlot => SlotStyle::Bookable,
            EventKind::UnavailableSlot => SlotStyle::Disabled,
            _ if event.id.is_some() => SlotStyle::Booked,
            _ => SlotStyle::Default,
        }
    }
}

/// A block ready to paint: the event, where it goes, how it looks
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedSlot<'a> {
    pub event: &'a Event,
    pub geometry: SlotGeometry,
    pub style: SlotStyle,
}

/// Blocks for one day column, in the order the events were given
pub fn place_slots<'a>(window: &DayWindow, events: &'a [Event]) -> Vec<PlacedSlot<'a>> {
    events
        .iter()
        .filter(|event| window.contains(event))
        .map(|event| PlacedSlot {
            event,
            geometry: window.geometry(event),
            style: SlotStyle::for_event(event),
        })
        .collect()
}
