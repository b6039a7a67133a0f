// --- File: crates/bookify_assistant/src/doc.rs ---

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{AppointmentsQuery, AppointmentsResponse, ChatRequest, ChatResponse};
use crate::logic::ActionTaken;
use bookify_common::models::{Appointment, AppointmentStatus};

#[utoipa::path(
    post,
    path = "/chat",
    request_body(content = ChatRequest, example = json!({
        "message": "Book an appointment tomorrow at 2 PM for a@b.com",
        "reference_time": "2024-03-10T03:30:00Z"
    })),
    responses(
        (status = 200, description = "Request handled", body = ChatResponse,
         example = json!({
             "reply": "Booked \"Appointment\" for 2024-03-11 at 14:00.",
             "action": "created",
             "appointment": {
                 "event_id": "abc123",
                 "attendee_email": "a@b.com",
                 "attendee_name": null,
                 "subject": "Appointment",
                 "start": "2024-03-11T08:30:00Z",
                 "end": "2024-03-11T09:00:00Z",
                 "status": "scheduled",
                 "sequence": 0
             },
             "notification_failed": false
         })
        ),
        (status = 400, description = "Unresolvable time phrase or invalid field", body = String),
        (status = 409, description = "Slot conflict", body = String),
        (status = 502, description = "Backend failure", body = String)
    )
)]
fn doc_chat_handler() {}

#[utoipa::path(
    get,
    path = "/appointments",
    params(
        ("days" = Option<i64>, Query, description = "Window size in days", example = 60),
        ("attendee_email" = Option<String>, Query, description = "Filter to one attendee", example = "a@b.com")
    ),
    responses(
        (status = 200, description = "Upcoming appointments", body = AppointmentsResponse),
        (status = 502, description = "Calendar backend failed", body = String)
    )
)]
fn doc_list_appointments_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_chat_handler, doc_list_appointments_handler),
    components(
        schemas(
            ChatRequest,
            ChatResponse,
            AppointmentsQuery,
            AppointmentsResponse,
            ActionTaken,
            Appointment,
            AppointmentStatus
        )
    ),
    tags(
        (name = "assistant", description = "Natural-language appointment API")
    ),
    servers(
        (url = "/api", description = "Assistant API server")
    )
)]
pub struct AssistantApiDoc;
