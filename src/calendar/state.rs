//! The calendar container: authoritative state plus the commands it needs
//! run against the server.
//!
//! Nothing here touches the network. Every intent returns the commands to
//! execute and every server response comes back as an [`Outcome`]. Events
//! and participant responses carry the ticket they were issued with; a
//! response whose ticket is no longer current is dropped.

use chrono::{Duration, NaiveDate};

use super::coaches::CoachSelector;
use super::dialog::{Dialog, DialogAction, ExistingAppointment, NewBooking, Participants, WriteRequest};
use super::layout::{default_week_start, WeekWindow, DAYS_PER_WEEK};
use crate::api::{Coach, Event, EventKind, Participant, Person};

/// One fetch of a coach's calendar as seen by the user
#[derive(Debug, Clone, PartialEq)]
pub struct EventsQuery {
    pub ticket: u64,
    pub user_id: i64,
    pub coach_id: i64,
    pub window: WeekWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchCoaches,
    FetchEvents(EventsQuery),
    FetchParticipants { event_id: i64, ticket: u64 },
    /// Perform the write, then run `refresh` whether or not it succeeded
    Write {
        request: WriteRequest,
        refresh: Option<EventsQuery>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    CoachesLoaded(Vec<Coach>),
    EventsLoaded { ticket: u64, events: Vec<Event> },
    /// The fetch ended without a usable answer
    EventsFailed { ticket: u64 },
    ParticipantsLoaded {
        ticket: u64,
        participants: Option<Vec<Participant>>,
    },
}

pub struct CalendarState {
    user: Person,
    coaches: CoachSelector,
    calendar_date: NaiveDate,
    events: Vec<Event>,
    dialog: Dialog,
    next_ticket: u64,
    /// Ticket of the events fetch whose answer we are waiting for
    pending_events: Option<u64>,
    /// Ticket of the newest events fetch; anything older is stale
    latest_events: u64,
}

impl CalendarState {
    pub fn new(user: Person, today: NaiveDate) -> Self {
        Self {
            user,
            coaches: CoachSelector::default(),
            calendar_date: default_week_start(today),
            events: Vec::new(),
            dialog: Dialog::Hidden,
            next_ticket: 0,
            pending_events: None,
            latest_events: 0,
        }
    }

    pub fn user(&self) -> &Person {
        &self.user
    }

    pub fn coaches(&self) -> &CoachSelector {
        &self.coaches
    }

    pub fn calendar_date(&self) -> NaiveDate {
        self.calendar_date
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// The one piece of dialog state views may edit directly
    pub fn dialog_notes_mut(&mut self) -> Option<&mut String> {
        self.dialog.notes_mut()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_events.is_some()
    }

    fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    /// Query for the displayed week, or `None` while no coach is selected
    fn events_query(&mut self) -> Option<EventsQuery> {
        let coach_id = self.coaches.selected()?.id;
        let ticket = self.issue_ticket();
        self.latest_events = ticket;
        self.pending_events = Some(ticket);
        Some(EventsQuery {
            ticket,
            user_id: self.user.id,
            coach_id,
            window: WeekWindow::for_week(self.calendar_date),
        })
    }

    fn fetch_events(&mut self) -> Vec<Command> {
        self.events_query().map(Command::FetchEvents).into_iter().collect()
    }

    /// The dialog belongs to the coach and week it was opened on; changing
    /// either discards it along with any unsaved notes
    fn dismiss_dialog(&mut self) {
        if self.dialog.is_shown() {
            tracing::debug!("closing dialog after coach or week change");
            self.dialog = Dialog::Hidden;
        }
    }

    /// Initial commands when the app starts
    pub fn start(&mut self) -> Vec<Command> {
        vec![Command::FetchCoaches]
    }

    pub fn select_coach(&mut self, coach_id: i64) -> Vec<Command> {
        self.dismiss_dialog();
        let previous = self.coaches.selected_id();
        let selected = self.coaches.select(coach_id);
        tracing::debug!("coach changed from {} to {:?}", previous, selected.as_ref().map(|c| c.id));

        if selected.is_none() {
            // Nothing to show without a coach; late answers for the old one
            // must not repaint the grid
            self.events.clear();
            self.pending_events = None;
            self.latest_events = self.issue_ticket();
            return Vec::new();
        }
        self.fetch_events()
    }

    pub fn previous_week(&mut self) -> Vec<Command> {
        self.dismiss_dialog();
        self.calendar_date = self.calendar_date - Duration::days(DAYS_PER_WEEK);
        self.fetch_events()
    }

    pub fn next_week(&mut self) -> Vec<Command> {
        self.dismiss_dialog();
        self.calendar_date = self.calendar_date + Duration::days(DAYS_PER_WEEK);
        self.fetch_events()
    }

    pub fn refresh(&mut self) -> Vec<Command> {
        self.fetch_events()
    }

    /// React to a click on a grid block
    pub fn slot_clicked(&mut self, event: &Event) -> Vec<Command> {
        if !event.is_clickable() {
            return Vec::new();
        }

        if let Some(event_id) = event.id {
            let ticket = self.issue_ticket();
            self.dialog = Dialog::ExistingEvent(ExistingAppointment::new(event_id, event.clone(), ticket));
            return vec![Command::FetchParticipants { event_id, ticket }];
        }

        if event.kind == EventKind::OpenSlot {
            match self.coaches.selected() {
                Some(coach) => {
                    self.dialog = Dialog::NewBooking(NewBooking::new(
                        event.clone(),
                        coach.clone(),
                        self.user.clone(),
                    ));
                }
                None => tracing::warn!("open slot clicked with no coach selected"),
            }
        }
        Vec::new()
    }

    /// A dialog footer button was pressed. The dialog closes whatever the
    /// action; writes are always followed by a refresh.
    pub fn dialog_action(&mut self, action: DialogAction) -> Vec<Command> {
        let request = self.dialog.request_for(action);
        self.dialog = Dialog::Hidden;

        match request {
            Some(request) => {
                let refresh = self.events_query();
                vec![Command::Write { request, refresh }]
            }
            None => Vec::new(),
        }
    }

    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::CoachesLoaded(coaches) => {
                tracing::debug!("loaded {} coaches", coaches.len());
                self.coaches.populate(coaches);
            }
            Outcome::EventsLoaded { ticket, events } => {
                if ticket != self.latest_events {
                    tracing::debug!("dropping stale events response (ticket {}, latest {})", ticket, self.latest_events);
                    return;
                }
                self.pending_events = None;
                self.events = events
                    .into_iter()
                    .filter(|event| {
                        let valid = event.start_time < event.end_time;
                        if !valid {
                            tracing::warn!("dropping event with non-positive duration: {:?}", event);
                        }
                        valid
                    })
                    .collect();
            }
            Outcome::EventsFailed { ticket } => {
                if self.pending_events == Some(ticket) {
                    self.pending_events = None;
                }
            }
            Outcome::ParticipantsLoaded { ticket, participants } => {
                let Dialog::ExistingEvent(existing) = &mut self.dialog else {
                    return;
                };
                if existing.ticket != ticket {
                    return;
                }
                existing.participants = match participants {
                    Some(people) => Participants::Loaded(people),
                    None => Participants::Failed,
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::local_at;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: Option<i64>, kind: EventKind, day: NaiveDate, hour: u32) -> Event {
        let start = local_at(day, hour);
        Event {
            id,
            start_time: start,
            end_time: start + Duration::hours(1),
            name: if id.is_some() { "Coaching session".into() } else { "Available".into() },
            kind,
            notes: String::new(),
            participants: if id.is_some() { vec![5, 1] } else { Vec::new() },
        }
    }

    /// Wednesday 2024-01-10, coaches loaded, nothing selected
    fn state() -> CalendarState {
        let mut state = CalendarState::new(Person::new(1, "Ada", "Lovelace"), date(2024, 1, 10));
        assert_eq!(state.start(), vec![Command::FetchCoaches]);
        state.apply(Outcome::CoachesLoaded(vec![
            Person::new(5, "Grace", "Hopper"),
            Person::new(7, "Alan", "Turing"),
        ]));
        state
    }

    fn fetches(commands: &[Command]) -> Vec<&EventsQuery> {
        commands
            .iter()
            .filter_map(|c| match c {
                Command::FetchEvents(q) => Some(q),
                _ => None,
            })
            .collect()
    }

    fn ticket_of(commands: &[Command]) -> u64 {
        fetches(commands)[0].ticket
    }

    #[test]
    fn default_week_and_no_fetch_without_coach() {
        let mut state = state();
        assert_eq!(state.calendar_date(), date(2024, 1, 7));
        assert!(state.refresh().is_empty());
        assert!(state.next_week().is_empty());
        assert_eq!(state.calendar_date(), date(2024, 1, 14));
    }

    #[test]
    fn selecting_coach_fetches_current_week() {
        let mut state = state();
        let commands = state.select_coach(5);
        let queries = fetches(&commands);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].coach_id, 5);
        assert_eq!(queries[0].user_id, 1);
        assert_eq!(queries[0].window, WeekWindow::for_week(date(2024, 1, 7)));
        assert!(state.is_loading());
    }

    #[test]
    fn navigating_fetches_only_the_new_window() {
        let mut state = state();
        state.select_coach(5);

        let commands = state.next_week();
        assert_eq!(commands.len(), 1);
        let queries = fetches(&commands);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].coach_id, 5);
        assert_eq!(queries[0].window, WeekWindow::for_week(date(2024, 1, 14)));
        assert_ne!(queries[0].window, WeekWindow::for_week(date(2024, 1, 7)));

        let commands = state.previous_week();
        assert_eq!(fetches(&commands)[0].window, WeekWindow::for_week(date(2024, 1, 7)));
    }

    #[test]
    fn stale_events_response_is_dropped() {
        let mut state = state();
        let old = ticket_of(&state.select_coach(5));
        let new = ticket_of(&state.next_week());

        let monday = date(2024, 1, 15);
        state.apply(Outcome::EventsLoaded {
            ticket: new,
            events: vec![event(None, EventKind::OpenSlot, monday, 9)],
        });
        // The previous week's answer arrives late
        state.apply(Outcome::EventsLoaded {
            ticket: old,
            events: vec![event(None, EventKind::OpenSlot, date(2024, 1, 8), 9); 3],
        });

        assert_eq!(state.events().len(), 1);
        assert_eq!(state.events()[0].start_time.date_naive(), monday);
        assert!(!state.is_loading());
    }

    #[test]
    fn deselecting_coach_clears_grid_and_ignores_late_answers() {
        let mut state = state();
        let ticket = ticket_of(&state.select_coach(5));
        assert!(state.select_coach(0).is_empty());
        state.apply(Outcome::EventsLoaded {
            ticket,
            events: vec![event(None, EventKind::OpenSlot, date(2024, 1, 8), 9)],
        });
        assert!(state.events().is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn inverted_events_are_dropped() {
        let mut state = state();
        let ticket = ticket_of(&state.select_coach(5));
        let mut broken = event(None, EventKind::OpenSlot, date(2024, 1, 8), 9);
        broken.end_time = broken.start_time;
        state.apply(Outcome::EventsLoaded {
            ticket,
            events: vec![broken, event(None, EventKind::OpenSlot, date(2024, 1, 8), 10)],
        });
        assert_eq!(state.events().len(), 1);
    }

    #[test]
    fn unavailable_slot_never_opens_dialog() {
        let mut state = state();
        state.select_coach(5);
        let commands = state.slot_clicked(&event(None, EventKind::UnavailableSlot, date(2024, 1, 8), 9));
        assert!(commands.is_empty());
        assert_eq!(state.dialog(), &Dialog::Hidden);
    }

    #[test]
    fn open_slot_opens_booking_without_network() {
        let mut state = state();
        state.select_coach(5);
        let commands = state.slot_clicked(&event(None, EventKind::OpenSlot, date(2024, 1, 8), 9));
        assert!(commands.is_empty());
        assert!(matches!(state.dialog(), Dialog::NewBooking(_)));
        assert_eq!(state.dialog().participants_text().as_deref(), Some("Grace Hopper, Ada Lovelace"));
    }

    #[test]
    fn open_slot_needs_a_coach() {
        let mut state = state();
        state.slot_clicked(&event(None, EventKind::OpenSlot, date(2024, 1, 8), 9));
        assert!(!state.dialog().is_shown());
    }

    #[test]
    fn existing_event_fetches_participants_before_names() {
        let mut state = state();
        state.select_coach(5);
        let commands = state.slot_clicked(&event(Some(42), EventKind::Coaching, date(2024, 1, 8), 9));

        let [Command::FetchParticipants { event_id, ticket }] = commands.as_slice() else {
            panic!("expected one participants fetch, got {:?}", commands);
        };
        assert_eq!(*event_id, 42);
        assert!(state.dialog().is_shown());
        assert_eq!(state.dialog().participants_text(), None);

        state.apply(Outcome::ParticipantsLoaded {
            ticket: *ticket,
            participants: Some(vec![Person::new(5, "Grace", "Hopper"), Person::new(1, "Ada", "Lovelace")]),
        });
        assert_eq!(state.dialog().participants_text().as_deref(), Some("Grace Hopper, Ada Lovelace"));
    }

    #[test]
    fn participants_for_a_closed_dialog_are_ignored() {
        let mut state = state();
        state.select_coach(5);
        let first = state.slot_clicked(&event(Some(42), EventKind::Coaching, date(2024, 1, 8), 9));
        let Command::FetchParticipants { ticket: old, .. } = first[0] else {
            panic!("expected participants fetch");
        };
        state.dialog_action(DialogAction::Exit);
        state.slot_clicked(&event(Some(43), EventKind::Coaching, date(2024, 1, 9), 9));

        state.apply(Outcome::ParticipantsLoaded {
            ticket: old,
            participants: Some(vec![Person::new(9, "Wrong", "Person")]),
        });
        assert_eq!(state.dialog().participants_text(), None);
    }

    #[test]
    fn book_closes_dialog_and_refreshes() {
        let mut state = state();
        state.select_coach(5);
        state.slot_clicked(&event(None, EventKind::OpenSlot, date(2024, 1, 8), 9));
        *state.dialog_notes_mut().unwrap() = "N".to_string();

        let commands = state.dialog_action(DialogAction::Book);
        assert_eq!(state.dialog(), &Dialog::Hidden);
        let [Command::Write { request: WriteRequest::Create(request), refresh: Some(refresh) }] = commands.as_slice() else {
            panic!("expected a create with refresh, got {:?}", commands);
        };
        assert_eq!(request.notes, "N");
        assert_eq!(request.participants, vec![5, 1]);
        assert_eq!(refresh.coach_id, 5);
        assert_eq!(refresh.window, WeekWindow::for_week(date(2024, 1, 7)));
    }

    #[test]
    fn cancel_appointment_deletes_and_refreshes() {
        let mut state = state();
        state.select_coach(5);
        state.slot_clicked(&event(Some(42), EventKind::Coaching, date(2024, 1, 8), 9));
        let commands = state.dialog_action(DialogAction::CancelAppointment);
        assert!(matches!(
            commands.as_slice(),
            [Command::Write { request: WriteRequest::Delete(42), refresh: Some(_) }]
        ));
        assert!(!state.dialog().is_shown());
    }

    #[test]
    fn exit_only_closes() {
        let mut state = state();
        state.select_coach(5);
        state.slot_clicked(&event(Some(42), EventKind::Coaching, date(2024, 1, 8), 9));
        assert!(state.dialog_action(DialogAction::Exit).is_empty());
        assert!(!state.dialog().is_shown());
    }

    #[test]
    fn failed_fetch_clears_loading() {
        let mut state = state();
        let ticket = ticket_of(&state.select_coach(5));
        state.apply(Outcome::EventsFailed { ticket });
        assert!(!state.is_loading());
    }

    #[test]
    fn changing_coach_closes_booking_for_the_old_coach() {
        let mut state = state();
        state.select_coach(5);
        state.slot_clicked(&event(None, EventKind::OpenSlot, date(2024, 1, 8), 10));
        assert!(state.dialog().is_shown());

        let commands = state.select_coach(7);
        assert!(!state.dialog().is_shown());
        assert_eq!(fetches(&commands)[0].coach_id, 7);

        // A late Book press has nothing left to write
        assert!(state.dialog_action(DialogAction::Book).is_empty());
    }

    #[test]
    fn changing_week_closes_dialog() {
        let mut state = state();
        state.select_coach(5);

        state.slot_clicked(&event(None, EventKind::OpenSlot, date(2024, 1, 8), 10));
        state.next_week();
        assert!(!state.dialog().is_shown());

        state.slot_clicked(&event(Some(42), EventKind::Coaching, date(2024, 1, 15), 9));
        assert!(state.dialog().is_shown());
        state.previous_week();
        assert_eq!(state.dialog(), &Dialog::Hidden);
    }
}
