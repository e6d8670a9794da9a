//! Executes container commands against the REST service.
//!
//! Failures are logged here and go no further: the UI is never told, nothing
//! is retried, and a failed write still triggers its refresh.

use super::dialog::WriteRequest;
use super::state::{Command, EventsQuery, Outcome};
use crate::api::ScheduleClient;

pub async fn run(client: &ScheduleClient, command: Command) -> Option<Outcome> {
    match command {
        Command::FetchCoaches => match client.get_coaches().await {
            Ok(coaches) => Some(Outcome::CoachesLoaded(coaches)),
            Err(e) => {
                tracing::error!("Failed to load coaches: {}", e);
                None
            }
        },
        Command::FetchEvents(query) => Some(fetch_events(client, &query).await),
        Command::FetchParticipants { event_id, ticket } => {
            let participants = match client.get_participants(event_id).await {
                Ok(people) => Some(people),
                Err(e) => {
                    tracing::error!("Failed to load participants for event {}: {}", event_id, e);
                    None
                }
            };
            Some(Outcome::ParticipantsLoaded { ticket, participants })
        }
        Command::Write { request, refresh } => {
            write(client, &request).await;
            match refresh {
                Some(query) => Some(fetch_events(client, &query).await),
                None => None,
            }
        }
    }
}

async fn fetch_events(client: &ScheduleClient, query: &EventsQuery) -> Outcome {
    let result = client
        .get_calendar(query.user_id, query.coach_id, &query.window.from, &query.window.to)
        .await;

    match result {
        Ok(events) => {
            if events.is_empty() {
                tracing::debug!("received no appointment slots");
            } else {
                tracing::debug!("fetched {} appointment slots", events.len());
            }
            Outcome::EventsLoaded { ticket: query.ticket, events }
        }
        Err(e) => {
            tracing::error!("Failed to load calendar for coach {}: {}", query.coach_id, e);
            Outcome::EventsFailed { ticket: query.ticket }
        }
    }
}

async fn write(client: &ScheduleClient, request: &WriteRequest) {
    let result = match request {
        WriteRequest::Create(body) => client.create_event(body).await.map(|event| {
            tracing::info!("Booked event {:?} at {}", event.id, event.start_time);
        }),
        WriteRequest::Update(body) => client.update_event(body).await.map(|_| {
            tracing::info!("Updated event {}", body.id);
        }),
        WriteRequest::Delete(event_id) => client.delete_event(*event_id).await.map(|_| {
            tracing::info!("Cancelled event {}", event_id);
        }),
    };

    if let Err(e) = result {
        tracing::error!("Failed to save appointment: {}", e);
    }
}
