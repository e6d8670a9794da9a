use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::time::deserialize_local;

/// A person record as the scheduler returns it. Coaches, the current user
/// and event participants all share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

pub type Coach = Person;
pub type Participant = Person;

impl Person {
    pub fn new(id: i64, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }

    /// "First Last", without stray spaces when either part is missing
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Join participant names for display: "Ada Lovelace, Alan Turing"
pub fn format_participants(people: &[Person]) -> String {
    people
        .iter()
        .map(Person::display_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The `type` field of an event. The server may invent new types, so
/// anything unrecognised is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    OpenSlot,
    UnavailableSlot,
    Coaching,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::OpenSlot => "open slot",
            EventKind::UnavailableSlot => "unavailable slot",
            EventKind::Coaching => "coaching",
            EventKind::Other(s) => s,
        }
    }
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "open slot" => EventKind::OpenSlot,
            "unavailable slot" => EventKind::UnavailableSlot,
            "coaching" => EventKind::Coaching,
            _ => EventKind::Other(s),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        kind.as_str().to_string()
    }
}

impl Default for EventKind {
    fn default() -> Self {
        EventKind::Other("event".to_string())
    }
}

/// A calendar entry in the viewer's local time.
///
/// Open and unavailable slots are synthesized by the server for each query
/// window and carry no id; booked events are persisted and always have one.
/// The server drops empty fields from its JSON, hence the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(deserialize_with = "deserialize_local")]
    pub start_time: DateTime<Local>,
    #[serde(deserialize_with = "deserialize_local")]
    pub end_time: DateTime<Local>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub participants: Vec<i64>,
}

impl Event {
    /// Only open slots and persisted events react to clicks
    pub fn is_clickable(&self) -> bool {
        self.kind == EventKind::OpenSlot || self.id.is_some()
    }

    pub fn duration_minutes(&self) -> f32 {
        (self.end_time - self.start_time).num_seconds() as f32 / 60.0
    }
}

/// Body of `POST /event/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEventRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub notes: String,
    pub participants: Vec<i64>,
}

/// Body of `PUT /event/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateEventRequest {
    pub id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub notes: String,
    pub participants: Vec<i64>,
}
