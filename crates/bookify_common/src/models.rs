// --- File: crates/bookify_common/src/models.rs ---
//! Shared domain types for the booking assistant.
//!
//! The remote calendar is the single source of truth for appointments; these
//! types are the in-process view of that state and are never cached between
//! requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an appointment, inferred from calendar-store state at
/// query time (never persisted locally).
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Rescheduled,
    Cancelled,
}

/// An appointment as read back from the calendar store.
///
/// `event_id` is assigned by the store on creation and immutable afterwards;
/// reschedules mutate `start`/`end`/`sequence` on the same id. `sequence` is
/// the iTIP revision counter carried into invite artifacts so recipient
/// calendar clients apply updates and cancellations in order.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub event_id: String,
    pub attendee_email: String,
    pub attendee_name: Option<String>,
    pub subject: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub sequence: i64,
}

/// The fields needed to create a new appointment in the calendar store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub attendee_email: String,
    pub attendee_name: Option<String>,
    pub subject: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Result of a successful create call against the calendar store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedAppointment {
    pub event_id: String,
    pub sequence: i64,
}

/// The normalized, validated representation of a user's intent.
///
/// The language model's loosely-typed tool-call payload is mapped into this
/// enum at the boundary; nothing downstream branches on raw JSON. Time
/// phrases are kept as phrases here and always re-resolved by the time
/// resolver; any absolute timestamp the extractor invents is ignored.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuredAction {
    Create {
        attendee_email: String,
        attendee_name: Option<String>,
        subject: Option<String>,
        when_phrase: String,
        duration_minutes: Option<i64>,
    },
    Reschedule {
        attendee_email: String,
        old_phrase: String,
        new_phrase: String,
    },
    Cancel {
        attendee_email: String,
        when_phrase: String,
    },
    List {
        attendee_email: Option<String>,
    },
    CheckAvailability {
        when_phrase: String,
    },
    /// Intent could not be determined. Treated as a request for
    /// clarification, never as an error.
    Unknown { hint: Option<String> },
}

impl StructuredAction {
    /// Short label used in logs and responses.
    pub fn kind(&self) -> &'static str {
        match self {
            StructuredAction::Create { .. } => "create",
            StructuredAction::Reschedule { .. } => "reschedule",
            StructuredAction::Cancel { .. } => "cancel",
            StructuredAction::List { .. } => "list",
            StructuredAction::CheckAvailability { .. } => "check_availability",
            StructuredAction::Unknown { .. } => "unknown",
        }
    }
}
