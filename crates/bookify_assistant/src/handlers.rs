// --- File: crates/bookify_assistant/src/handlers.rs ---
//! HTTP handlers for the assistant feature.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use bookify_common::models::Appointment;
use bookify_config::AppConfig;

use crate::error::AssistantError;
use crate::logic::{ActionTaken, AppointmentOrchestrator, ChatOutcome};

// Shared state needed by assistant handlers
#[derive(Clone)]
pub struct AssistantState {
    pub config: Arc<AppConfig>,
    pub orchestrator: Arc<AppointmentOrchestrator>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Free-text user message.
    pub message: String,
    /// Reference instant for resolving relative phrases. Defaults to the
    /// server's current time; tests pin it.
    #[serde(default)]
    pub reference_time: Option<DateTime<Utc>>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub action: ActionTaken,
    pub appointment: Option<Appointment>,
    pub notification_failed: bool,
}

impl From<ChatOutcome> for ChatResponse {
    fn from(outcome: ChatOutcome) -> Self {
        ChatResponse {
            reply: outcome.reply,
            action: outcome.action,
            appointment: outcome.appointment,
            notification_failed: outcome.notification_failed,
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize)]
pub struct AppointmentsQuery {
    /// Window size in days; defaults to, and is capped at, the configured
    /// lookahead.
    pub days: Option<i64>,
    /// Filter to one attendee's appointments.
    pub attendee_email: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<Appointment>,
}

fn error_response(err: AssistantError) -> (StatusCode, String) {
    let status = match &err {
        AssistantError::Parse(_) | AssistantError::Validation(_) => StatusCode::BAD_REQUEST,
        AssistantError::Conflict(_) => StatusCode::CONFLICT,
        AssistantError::Gateway(_)
        | AssistantError::AmbiguousOutcome(_)
        | AssistantError::Intent(_) => StatusCode::BAD_GATEWAY,
    };
    (status, err.to_string())
}

/// Handler for the chat entry point.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/chat", // Path relative to /api
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Request handled; see `action` for what was done", body = ChatResponse),
        (status = 400, description = "Unresolvable time phrase or invalid field"),
        (status = 409, description = "Requested slot conflicts with an existing appointment"),
        (status = 502, description = "Calendar, mail or language-model backend failed")
    ),
    tag = "Assistant"
))]
pub async fn chat_handler(
    State(state): State<Arc<AssistantState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, String)> {
    let reference_now = request.reference_time.unwrap_or_else(Utc::now);
    info!(chars = request.message.len(), "chat request received");
    state
        .orchestrator
        .handle(&request.message, reference_now)
        .await
        .map(|outcome| Json(outcome.into()))
        .map_err(error_response)
}

/// Handler to list upcoming appointments without going through chat.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments", // Path relative to /api
    params(
        ("days" = Option<i64>, Query, description = "Window size in days"),
        ("attendee_email" = Option<String>, Query, description = "Filter to one attendee")
    ),
    responses(
        (status = 200, description = "Upcoming appointments", body = AppointmentsResponse),
        (status = 502, description = "Calendar backend failed")
    ),
    tag = "Assistant"
))]
pub async fn list_appointments_handler(
    State(state): State<Arc<AssistantState>>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<AppointmentsResponse>, (StatusCode, String)> {
    let days = bounded_window(query.days, state.config.assistant.lookahead_days);
    state
        .orchestrator
        .upcoming(Utc::now(), days, query.attendee_email.as_deref())
        .await
        .map(|appointments| Json(AppointmentsResponse { appointments }))
        .map_err(error_response)
}

/// Clamp a caller-supplied window to the configured lookahead so the listing
/// endpoint stays bounded regardless of query input.
fn bounded_window(days: Option<i64>, lookahead_days: i64) -> Option<i64> {
    days.map(|d| d.clamp(1, lookahead_days))
}

#[cfg(test)]
mod tests {
    use super::bounded_window;

    #[test]
    fn window_is_capped_at_the_configured_lookahead() {
        assert_eq!(bounded_window(None, 60), None);
        assert_eq!(bounded_window(Some(7), 60), Some(7));
        assert_eq!(bounded_window(Some(10_000), 60), Some(60));
        assert_eq!(bounded_window(Some(0), 60), Some(1));
    }
}
