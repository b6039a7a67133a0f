// --- File: crates/bookify_assistant/src/routes.rs ---

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{chat_handler, list_appointments_handler, AssistantState};

/// Creates a router containing all routes for the assistant feature.
/// The state carries an already-constructed orchestrator so the transport
/// layer decides which concrete services back it.
pub fn routes(state: Arc<AssistantState>) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/appointments", get(list_appointments_handler))
        .with_state(state)
}
