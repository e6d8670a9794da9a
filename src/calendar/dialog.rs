//! Appointment dialog state and the requests it produces

use chrono::Utc;

use crate::api::{format_participants, Coach, Event, EventKind, NewEventRequest, Person, UpdateEventRequest};

pub const NEW_BOOKING_TITLE: &str = "Book a Coaching Session";
pub const COACHING_SESSION_NAME: &str = "Coaching session";

/// Participant names for an existing event arrive after the dialog opens
#[derive(Debug, Clone, PartialEq)]
pub enum Participants {
    Loading,
    Loaded(Vec<Person>),
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub slot: Event,
    pub coach: Coach,
    pub user: Person,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExistingAppointment {
    pub event_id: i64,
    pub event: Event,
    pub participants: Participants,
    pub notes: String,
    /// Identifies this opening of the dialog for late participant responses
    pub ticket: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Dialog {
    #[default]
    Hidden,
    NewBooking(NewBooking),
    ExistingEvent(ExistingAppointment),
}

/// Buttons in the dialog footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Book,
    Update,
    CancelAppointment,
    Exit,
}

impl DialogAction {
    pub fn label(&self) -> &'static str {
        match self {
            DialogAction::Book => "Book",
            DialogAction::Update => "Update",
            DialogAction::CancelAppointment => "Cancel appointment",
            DialogAction::Exit => "Exit",
        }
    }
}

/// A write the dialog asks the container to perform
#[derive(Debug, Clone, PartialEq)]
pub enum WriteRequest {
    Create(NewEventRequest),
    Update(UpdateEventRequest),
    Delete(i64),
}

impl NewBooking {
    pub fn new(slot: Event, coach: Coach, user: Person) -> Self {
        Self {
            slot,
            coach,
            user,
            notes: String::new(),
        }
    }

    /// Coach first, then the person booking. No network call needed.
    pub fn participants(&self) -> Vec<Person> {
        vec![self.coach.clone(), self.user.clone()]
    }

    pub fn request(&self) -> NewEventRequest {
        NewEventRequest {
            start_time: self.slot.start_time.with_timezone(&Utc),
            end_time: self.slot.end_time.with_timezone(&Utc),
            name: COACHING_SESSION_NAME.to_string(),
            kind: EventKind::Coaching,
            notes: self.notes.clone(),
            participants: vec![self.coach.id, self.user.id],
        }
    }
}

impl ExistingAppointment {
    pub fn new(event_id: i64, event: Event, ticket: u64) -> Self {
        let notes = event.notes.clone();
        Self {
            event_id,
            event,
            participants: Participants::Loading,
            notes,
            ticket,
        }
    }

    /// Same event with only the notes changed
    pub fn update_request(&self) -> UpdateEventRequest {
        UpdateEventRequest {
            id: self.event_id,
            start_time: self.event.start_time.with_timezone(&Utc),
            end_time: self.event.end_time.with_timezone(&Utc),
            name: self.event.name.clone(),
            kind: self.event.kind.clone(),
            notes: self.notes.clone(),
            participants: self.event.participants.clone(),
        }
    }
}

impl Dialog {
    pub fn is_shown(&self) -> bool {
        !matches!(self, Dialog::Hidden)
    }

    pub fn title(&self) -> Option<String> {
        match self {
            Dialog::Hidden => None,
            Dialog::NewBooking(_) => Some(NEW_BOOKING_TITLE.to_string()),
            Dialog::ExistingEvent(existing) => Some(existing.event.name.clone()),
        }
    }

    pub fn actions(&self) -> &'static [DialogAction] {
        match self {
            Dialog::Hidden => &[],
            Dialog::NewBooking(_) => &[DialogAction::Book, DialogAction::Exit],
            Dialog::ExistingEvent(_) => &[
                DialogAction::Update,
                DialogAction::CancelAppointment,
                DialogAction::Exit,
            ],
        }
    }

    /// The slot or event the dialog is about
    pub fn event(&self) -> Option<&Event> {
        match self {
            Dialog::Hidden => None,
            Dialog::NewBooking(booking) => Some(&booking.slot),
            Dialog::ExistingEvent(existing) => Some(&existing.event),
        }
    }

    /// Participant line, or `None` while names are still unknown
    pub fn participants_text(&self) -> Option<String> {
        match self {
            Dialog::Hidden => None,
            Dialog::NewBooking(booking) => Some(format_participants(&booking.participants())),
            Dialog::ExistingEvent(existing) => match &existing.participants {
                Participants::Loaded(people) => Some(format_participants(people)),
                Participants::Loading | Participants::Failed => None,
            },
        }
    }

    /// Whether the participant lookup for an existing event gave up
    pub fn participants_failed(&self) -> bool {
        matches!(
            self,
            Dialog::ExistingEvent(ExistingAppointment { participants: Participants::Failed, .. })
        )
    }

    pub fn notes_mut(&mut self) -> Option<&mut String> {
        match self {
            Dialog::Hidden => None,
            Dialog::NewBooking(booking) => Some(&mut booking.notes),
            Dialog::ExistingEvent(existing) => Some(&mut existing.notes),
        }
    }

    /// The write `action` stands for in the current mode. Actions that do
    /// not belong to the mode yield nothing.
    pub fn request_for(&self, action: DialogAction) -> Option<WriteRequest> {
        match (self, action) {
            (Dialog::NewBooking(booking), DialogAction::Book) => {
                Some(WriteRequest::Create(booking.request()))
            }
            (Dialog::ExistingEvent(existing), DialogAction::Update) => {
                Some(WriteRequest::Update(existing.update_request()))
            }
            (Dialog::ExistingEvent(existing), DialogAction::CancelAppointment) => {
                Some(WriteRequest::Delete(existing.event_id))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn slot(id: Option<i64>, kind: EventKind) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 1, 8, 15, 0, 0).unwrap().with_timezone(&Local);
        Event {
            id,
            start_time: start,
            end_time: start + chrono::Duration::hours(1),
            name: if id.is_some() { "Coaching session".into() } else { "Available".into() },
            kind,
            notes: if id.is_some() { "agenda".into() } else { String::new() },
            participants: if id.is_some() { vec![5, 1] } else { Vec::new() },
        }
    }

    fn coach() -> Coach {
        Person::new(5, "Grace", "Hopper")
    }

    fn user() -> Person {
        Person::new(1, "Ada", "Lovelace")
    }

    #[test]
    fn new_booking_mode() {
        let mut dialog = Dialog::NewBooking(NewBooking::new(slot(None, EventKind::OpenSlot), coach(), user()));
        assert!(dialog.is_shown());
        assert_eq!(dialog.title().as_deref(), Some("Book a Coaching Session"));
        assert_eq!(dialog.actions(), &[DialogAction::Book, DialogAction::Exit]);
        assert_eq!(dialog.participants_text().as_deref(), Some("Grace Hopper, Ada Lovelace"));
        assert_eq!(dialog.notes_mut().map(|n| n.clone()), Some(String::new()));
    }

    #[test]
    fn book_builds_create_request() {
        let mut dialog = Dialog::NewBooking(NewBooking::new(slot(None, EventKind::OpenSlot), coach(), user()));
        *dialog.notes_mut().unwrap() = "N".to_string();

        let Some(WriteRequest::Create(request)) = dialog.request_for(DialogAction::Book) else {
            panic!("expected a create request");
        };
        assert_eq!(request.start_time, Utc.with_ymd_and_hms(2024, 1, 8, 15, 0, 0).unwrap());
        assert_eq!(request.end_time, Utc.with_ymd_and_hms(2024, 1, 8, 16, 0, 0).unwrap());
        assert_eq!(request.name, "Coaching session");
        assert_eq!(request.kind, EventKind::Coaching);
        assert_eq!(request.notes, "N");
        assert_eq!(request.participants, vec![5, 1]);
    }

    #[test]
    fn existing_event_mode() {
        let dialog = Dialog::ExistingEvent(ExistingAppointment::new(42, slot(Some(42), EventKind::Coaching), 1));
        assert_eq!(dialog.title().as_deref(), Some("Coaching session"));
        assert_eq!(
            dialog.actions(),
            &[DialogAction::Update, DialogAction::CancelAppointment, DialogAction::Exit]
        );
        // Names are unknown until the participants fetch lands
        assert_eq!(dialog.participants_text(), None);
        assert!(!dialog.participants_failed());
    }

    #[test]
    fn failed_participants_lookup_is_reported() {
        let mut existing = ExistingAppointment::new(42, slot(Some(42), EventKind::Coaching), 1);
        existing.participants = Participants::Failed;
        let dialog = Dialog::ExistingEvent(existing);
        assert!(dialog.participants_failed());
        assert_eq!(dialog.participants_text(), None);
    }

    #[test]
    fn update_preserves_event_and_takes_edited_notes() {
        let mut existing = ExistingAppointment::new(42, slot(Some(42), EventKind::Coaching), 1);
        assert_eq!(existing.notes, "agenda");
        existing.notes = "moved agenda".to_string();
        let dialog = Dialog::ExistingEvent(existing);

        let Some(WriteRequest::Update(request)) = dialog.request_for(DialogAction::Update) else {
            panic!("expected an update request");
        };
        assert_eq!(request.id, 42);
        assert_eq!(request.name, "Coaching session");
        assert_eq!(request.kind, EventKind::Coaching);
        assert_eq!(request.participants, vec![5, 1]);
        assert_eq!(request.notes, "moved agenda");
    }

    #[test]
    fn cancel_deletes_by_id() {
        let dialog = Dialog::ExistingEvent(ExistingAppointment::new(42, slot(Some(42), EventKind::Coaching), 1));
        assert_eq!(dialog.request_for(DialogAction::CancelAppointment), Some(WriteRequest::Delete(42)));
    }

    #[test]
    fn mismatched_actions_produce_nothing() {
        let booking = Dialog::NewBooking(NewBooking::new(slot(None, EventKind::OpenSlot), coach(), user()));
        assert_eq!(booking.request_for(DialogAction::Update), None);
        assert_eq!(booking.request_for(DialogAction::CancelAppointment), None);
        assert_eq!(booking.request_for(DialogAction::Exit), None);
        assert_eq!(Dialog::Hidden.request_for(DialogAction::Book), None);
        assert!(Dialog::Hidden.title().is_none());
    }
}
