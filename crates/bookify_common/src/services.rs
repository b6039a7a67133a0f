// --- File: crates/bookify_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! This module provides trait definitions for the calendar store, the mail
//! dispatcher and the natural-language intent extractor. These traits allow
//! for dependency injection and easier testing: the orchestrator only ever
//! sees these seams, so tests substitute in-memory implementations without
//! touching Google or SendGrid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use crate::models::{Appointment, AppointmentDraft, CreatedAppointment, StructuredAction};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors surfaced by calendar-store operations.
///
/// `AmbiguousOutcome` is deliberately distinct from `Api`: it means the
/// request was sent but its result is unknown (for example a timeout after
/// the write was dispatched). The mutation may or may not have been applied,
/// so callers must not retry blindly.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("calendar API error: {0}")]
    Api(String),
    #[error("event not found: {0}")]
    NotFound(String),
    #[error("calendar call outcome unknown: {0}")]
    AmbiguousOutcome(String),
}

/// Errors surfaced by the notification dispatcher.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("mail request failed: {0}")]
    Request(String),
    #[error("mail API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("notification service not configured")]
    NotConfigured,
}

/// Errors surfaced by the intent extractor.
///
/// These cover transport and protocol failures only. An utterance the model
/// simply cannot interpret is NOT an error; it comes back as
/// [`StructuredAction::Unknown`].
#[derive(Error, Debug)]
pub enum IntentError {
    #[error("language model request failed: {0}")]
    Request(String),
    #[error("language model returned an unusable response: {0}")]
    Malformed(String),
    #[error("intent extractor not configured")]
    NotConfigured,
}

/// A trait for calendar-store operations.
///
/// No call is assumed transactional; the store is the only shared resource
/// and provides whatever atomicity it provides per call.
pub trait CalendarService: Send + Sync {
    /// List appointments within a time range, sorted by start time.
    /// Cancelled events are not returned.
    fn list_appointments(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Appointment>, GatewayError>;

    /// Create an appointment, returning the store-assigned event id and the
    /// initial sequence number.
    fn create_appointment(
        &self,
        calendar_id: &str,
        draft: AppointmentDraft,
    ) -> BoxFuture<'_, CreatedAppointment, GatewayError>;

    /// Move an existing appointment to a new interval on the SAME event id.
    /// Returns the new sequence number.
    fn reschedule_appointment(
        &self,
        calendar_id: &str,
        event_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, i64, GatewayError>;

    /// Delete an appointment. Returns the sequence number the event carried
    /// before deletion (0 when the event was already gone; deleting an
    /// absent event is idempotent success, not an error).
    fn delete_appointment(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> BoxFuture<'_, i64, GatewayError>;
}

/// A calendar-invite document attached to a confirmation email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteAttachment {
    /// Attachment filename, e.g. `appointment.ics`.
    pub filename: String,
    /// The iCalendar text (not yet base64-encoded).
    pub content: String,
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// The status reported by the mail provider.
    pub status: String,
}

/// A trait for notification-dispatch operations.
///
/// A dispatch failure after a completed calendar mutation must never roll
/// the mutation back; callers report it as a partial-success condition.
pub trait NotificationService: Send + Sync {
    /// Send an HTML email, optionally with a calendar invite attached.
    fn send_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        attachment: Option<InviteAttachment>,
    ) -> BoxFuture<'_, NotificationResult, DispatchError>;
}

/// A trait for mapping a free-form utterance to a [`StructuredAction`].
///
/// The extractor is a best-effort classifier, not a time-parsing authority:
/// callers re-resolve every time phrase and validate every extracted field
/// before acting on it.
pub trait IntentExtractor: Send + Sync {
    fn extract(
        &self,
        utterance: &str,
        reference_now: DateTime<Utc>,
        current_appointments: &[Appointment],
    ) -> BoxFuture<'_, StructuredAction, IntentError>;
}

/// Notification dispatcher used when no mail provider is configured.
///
/// Every send fails with [`DispatchError::NotConfigured`], which callers
/// surface as a partial success ("booked, but confirmation email failed"),
/// matching the behaviour of running without mail credentials.
pub struct NullNotifier;

impl NotificationService for NullNotifier {
    fn send_email(
        &self,
        to: &str,
        _subject: &str,
        _html_body: &str,
        _attachment: Option<InviteAttachment>,
    ) -> BoxFuture<'_, NotificationResult, DispatchError> {
        let to = to.to_string();
        Box::pin(async move {
            tracing::warn!("email to {} dropped: notification service not configured", to);
            Err(DispatchError::NotConfigured)
        })
    }
}
