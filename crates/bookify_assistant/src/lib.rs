// --- File: crates/bookify_assistant/src/lib.rs ---
//! Natural-language appointment assistant.
//!
//! Turns a chat utterance into a structured calendar action, executes it
//! against the configured [`CalendarService`], and sends a confirmation
//! email with an iCalendar invite through the configured
//! [`NotificationService`].
//!
//! [`CalendarService`]: bookify_common::CalendarService
//! [`NotificationService`]: bookify_common::NotificationService

pub mod error;
pub mod extractor;
pub mod handlers;
pub mod invite;
pub mod logic;
pub mod routes;
pub mod time;
pub mod slots;

#[cfg(feature = "openapi")]
pub mod doc;

#[cfg(test)]
mod time_test;
#[cfg(test)]
mod slots_test;
#[cfg(test)]
mod slots_proptest;
#[cfg(test)]
mod invite_test;
#[cfg(test)]
mod extractor_test;

pub use error::AssistantError;
pub use logic::{ActionTaken, AppointmentOrchestrator, ChatOutcome};
pub use routes::routes;
