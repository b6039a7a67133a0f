// --- File: crates/bookify_common/src/lib.rs ---

// Declare modules within this crate
pub mod http; // Shared HTTP client
pub mod logging; // Logging utilities
pub mod models; // Shared domain types
pub mod services; // Service abstractions

// Re-export the domain types and trait seams for easier access
pub use models::{
    Appointment, AppointmentDraft, AppointmentStatus, CreatedAppointment, StructuredAction,
};
pub use services::{
    BoxFuture, CalendarService, DispatchError, GatewayError, IntentError, IntentExtractor,
    InviteAttachment, NotificationResult, NotificationService, NullNotifier,
};

pub use http::HTTP_CLIENT;
