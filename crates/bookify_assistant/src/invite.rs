// --- File: crates/bookify_assistant/src/invite.rs ---
//! Builds iCalendar invite artifacts for appointment emails.
//!
//! An invite is keyed by `(event_id, sequence)`. Recipient calendar clients
//! match on the UID: a REQUEST with a higher SEQUENCE updates the existing
//! entry instead of duplicating it, and a CANCEL removes it.

use bookify_common::models::Appointment;
use bookify_common::services::InviteAttachment;
use icalendar::{Calendar, Component, Event, EventLike, Property};

/// iTIP method carried in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteMethod {
    Request,
    Cancel,
}

impl InviteMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteMethod::Request => "REQUEST",
            InviteMethod::Cancel => "CANCEL",
        }
    }

    pub fn filename(&self) -> &'static str {
        match self {
            InviteMethod::Request => "appointment.ics",
            InviteMethod::Cancel => "appointment_cancellation.ics",
        }
    }
}

/// Domain suffix for invite UIDs. The event id alone is not a valid UID
/// per RFC 5545's recommendation of a globally unique identifier.
const UID_DOMAIN: &str = "bookify.local";

/// Compose the invite for `appointment` at the given revision.
///
/// `sequence` must be the appointment's current revision as stored by the
/// gateway, never a fresh 0 for an existing event, otherwise recipient
/// clients will ignore the update.
pub fn compose_invite(
    method: InviteMethod,
    appointment: &Appointment,
    sequence: i64,
    organizer_email: &str,
) -> InviteAttachment {
    let mut event = Event::new();
    event
        .uid(&format!("{}@{}", appointment.event_id, UID_DOMAIN))
        .summary(&appointment.subject)
        .starts(appointment.start)
        .ends(appointment.end)
        .append_property(Property::new("SEQUENCE", &sequence.to_string()))
        .append_property(Property::new(
            "ORGANIZER",
            &format!("mailto:{organizer_email}"),
        ))
        .append_property(attendee_property(appointment))
        .append_property(Property::new(
            "STATUS",
            match method {
                InviteMethod::Request => "CONFIRMED",
                InviteMethod::Cancel => "CANCELLED",
            },
        ));

    let mut calendar = Calendar::new();
    calendar.append_property(Property::new("METHOD", method.as_str()));
    calendar.push(event.done());

    InviteAttachment {
        filename: method.filename().to_string(),
        content: calendar.to_string(),
    }
}

fn attendee_property(appointment: &Appointment) -> Property {
    let mut attendee = Property::new(
        "ATTENDEE",
        &format!("mailto:{}", appointment.attendee_email),
    );
    if let Some(name) = &appointment.attendee_name {
        attendee.add_parameter("CN", name.as_str());
    }
    attendee.done()
}
