// --- File: crates/bookify_gcal/src/service.rs ---
//! Google Calendar gateway implementation.
//!
//! Implements the [`CalendarService`] seam over the Google Calendar v3 API.
//! The calendar store owns all durable appointment state: attendee identity
//! is round-tripped through the event description (`Client:` / `Email:`
//! lines) so nothing needs to be persisted locally, and the event's
//! `sequence` field carries the iTIP revision counter.

use std::sync::Arc;

use bookify_common::models::{
    Appointment, AppointmentDraft, AppointmentStatus, CreatedAppointment,
};
use bookify_common::services::{BoxFuture, CalendarService, GatewayError};
use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, EventDateTime};
use tracing::{debug, warn};

use crate::auth::HubType;

/// Google Calendar gateway.
pub struct GoogleCalendarGateway {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarGateway {
    /// Create a new gateway around an authenticated hub.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

/// Classify an API error from a read call. Reads are side-effect free, so a
/// timeout is a clean, retryable failure.
pub(crate) fn map_query_error(e: google_calendar3::Error) -> GatewayError {
    let msg = e.to_string();
    if msg.contains("404") {
        GatewayError::NotFound(msg)
    } else {
        GatewayError::Api(msg)
    }
}

/// Classify an API error from a mutation. A timeout here means the write may
/// have been applied on the remote side, surfaced as `AmbiguousOutcome` so
/// callers do not retry blindly and double-book.
pub(crate) fn map_mutation_error(e: google_calendar3::Error) -> GatewayError {
    let msg = e.to_string();
    if msg.contains("timed out") || msg.contains("timeout") || msg.contains("connection closed") {
        GatewayError::AmbiguousOutcome(msg)
    } else if msg.contains("404") {
        GatewayError::NotFound(msg)
    } else {
        GatewayError::Api(msg)
    }
}

/// Encode the attendee identity into the event description so a later list
/// can recover it without local storage.
pub(crate) fn encode_description(draft: &AppointmentDraft) -> String {
    let name = draft.attendee_name.as_deref().unwrap_or("Unknown");
    format!(
        "Client: {}\nEmail: {}\nSubject: {}",
        name, draft.attendee_email, draft.subject
    )
}

/// Recover `(name, email)` from a description written by
/// [`encode_description`]. Missing or hand-edited descriptions yield `None`s.
pub(crate) fn attendee_from_description(description: &str) -> (Option<String>, Option<String>) {
    let field = |tag: &str| {
        description.lines().find_map(|line| {
            line.strip_prefix(tag)
                .map(|rest| rest.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    };
    (field("Client:"), field("Email:"))
}

/// Map a calendar event into the domain `Appointment`. Events without a
/// concrete dateTime (all-day entries) are not appointments and map to None.
pub(crate) fn appointment_from_event(event: Event) -> Option<Appointment> {
    let event_id = event.id?;
    let start = event.start.as_ref().and_then(|s| s.date_time)?;
    let end = event.end.as_ref().and_then(|e| e.date_time)?;

    let description = event.description.unwrap_or_default();
    let (attendee_name, attendee_email) = attendee_from_description(&description);

    let sequence = i64::from(event.sequence.unwrap_or(0));
    let status = match event.status.as_deref() {
        Some("cancelled") => AppointmentStatus::Cancelled,
        _ if sequence > 0 => AppointmentStatus::Rescheduled,
        _ => AppointmentStatus::Scheduled,
    };

    Some(Appointment {
        event_id,
        attendee_email: attendee_email.unwrap_or_default(),
        attendee_name,
        subject: event.summary.unwrap_or_else(|| "Appointment".to_string()),
        start,
        end,
        status,
        sequence,
    })
}

fn event_time(dt: DateTime<Utc>) -> EventDateTime {
    EventDateTime {
        date_time: Some(dt),
        time_zone: Some("UTC".to_string()),
        ..Default::default()
    }
}

impl CalendarService for GoogleCalendarGateway {
    fn list_appointments(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, GatewayError> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, events_list) = calendar_hub
                .events()
                .list(&calendar_id)
                .time_min(start)
                .time_max(end)
                .single_events(true)
                .order_by("startTime")
                .doit()
                .await
                .map_err(map_query_error)?;

            let mut appointments = Vec::new();
            for event in events_list.items.unwrap_or_default() {
                if event.status.as_deref() == Some("cancelled") {
                    continue;
                }
                match appointment_from_event(event) {
                    Some(appt) => appointments.push(appt),
                    None => debug!("skipping event without a concrete dateTime"),
                }
            }
            appointments.sort_by_key(|a| a.start);
            Ok(appointments)
        })
    }

    fn create_appointment(
        &self,
        calendar_id: &str,
        draft: AppointmentDraft,
    ) -> BoxFuture<'_, CreatedAppointment, GatewayError> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let new_event = Event {
                summary: Some(draft.subject.clone()),
                description: Some(encode_description(&draft)),
                start: Some(event_time(draft.start)),
                end: Some(event_time(draft.end)),
                ..Default::default()
            };

            let (_response, created) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await
                .map_err(map_mutation_error)?;

            let event_id = created
                .id
                .ok_or_else(|| GatewayError::Api("created event has no id".to_string()))?;

            Ok(CreatedAppointment {
                event_id,
                sequence: i64::from(created.sequence.unwrap_or(0)),
            })
        })
    }

    fn reschedule_appointment(
        &self,
        calendar_id: &str,
        event_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, i64, GatewayError> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            // Read the current revision first; the invite chain must never
            // reuse a sequence value, so the increment is based on what the
            // store holds, not on an assumed zero.
            let (_response, current) = calendar_hub
                .events()
                .get(&calendar_id, &event_id)
                .doit()
                .await
                .map_err(map_query_error)?;

            let next_sequence = current.sequence.map(|n| n + 1).unwrap_or(1);

            let patch = Event {
                start: Some(event_time(start)),
                end: Some(event_time(end)),
                sequence: Some(next_sequence),
                ..Default::default()
            };

            let (_response, updated) = calendar_hub
                .events()
                .patch(patch, &calendar_id, &event_id)
                .doit()
                .await
                .map_err(map_mutation_error)?;

            Ok(i64::from(updated.sequence.unwrap_or(next_sequence)))
        })
    }

    fn delete_appointment(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> BoxFuture<'_, i64, GatewayError> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            // Capture the revision the cancellation invite must build on.
            let prior_sequence = match calendar_hub
                .events()
                .get(&calendar_id, &event_id)
                .doit()
                .await
            {
                Ok((_response, event)) => i64::from(event.sequence.unwrap_or(0)),
                Err(e) if e.to_string().contains("404") => {
                    // Already gone: deleting an absent event is idempotent
                    // success with no known prior revision.
                    return Ok(0);
                }
                Err(e) => return Err(map_query_error(e)),
            };

            match calendar_hub
                .events()
                .delete(&calendar_id, &event_id)
                .doit()
                .await
            {
                Ok(_) => Ok(prior_sequence),
                Err(e) => {
                    let msg = e.to_string();
                    if msg.contains("404") || msg.contains("410") {
                        warn!("event {} vanished between get and delete", event_id);
                        Ok(prior_sequence)
                    } else {
                        Err(map_mutation_error(e))
                    }
                }
            }
        })
    }
}
