// --- File: crates/bookify_assistant/src/extractor.rs ---
//! Maps free-form utterances to [`StructuredAction`]s via an LLM.
//!
//! The model is called with function-calling tools, one per action kind.
//! Whatever comes back is mapped into the fixed [`StructuredAction`] variant
//! type right here at the boundary, with strict field validation, so the
//! orchestrator never branches on loosely-typed payloads. An utterance the
//! model cannot classify yields [`StructuredAction::Unknown`], which is a
//! request for clarification, not an error.

use bookify_common::http::HTTP_CLIENT;
use bookify_common::models::{Appointment, StructuredAction};
use bookify_common::services::{BoxFuture, IntentError, IntentExtractor};
use bookify_config::OpenAiConfig;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Intent extractor backed by the OpenAI chat-completions API.
pub struct OpenAiIntentExtractor {
    api_key: String,
    model: String,
    api_base: String,
    time_zone: Tz,
}

impl OpenAiIntentExtractor {
    /// Build the extractor from config. The API key comes from the
    /// `OPENAI_API_KEY` environment variable, never from config files.
    pub fn from_config(config: &OpenAiConfig, time_zone: Tz) -> Result<Self, IntentError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| IntentError::NotConfigured)?;
        Ok(Self {
            api_key,
            model: config.model.clone(),
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            time_zone,
        })
    }
}

impl IntentExtractor for OpenAiIntentExtractor {
    fn extract(
        &self,
        utterance: &str,
        reference_now: DateTime<Utc>,
        current_appointments: &[Appointment],
    ) -> BoxFuture<'_, StructuredAction, IntentError> {
        let utterance = utterance.to_string();
        let appointments = current_appointments.to_vec();
        Box::pin(async move {
            let body = json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "system",
                        "content": system_prompt(reference_now, &appointments, self.time_zone),
                    },
                    { "role": "user", "content": utterance },
                ],
                "tools": tool_schemas(),
                "tool_choice": "auto",
            });

            let response = HTTP_CLIENT
                .post(format!("{}/chat/completions", self.api_base))
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| IntentError::Request(e.to_string()))?;

            if !response.status().is_success() {
                let status = response.status();
                let message = response.text().await.unwrap_or_default();
                warn!(%status, "chat completion request rejected");
                return Err(IntentError::Request(format!("{status}: {message}")));
            }

            let completion: ChatCompletion = response
                .json()
                .await
                .map_err(|e| IntentError::Malformed(e.to_string()))?;
            let message = completion
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message)
                .ok_or_else(|| IntentError::Malformed("no choices in response".to_string()))?;

            match message.tool_calls.into_iter().next() {
                Some(call) => {
                    debug!(tool = %call.function.name, "model selected a tool");
                    Ok(action_from_tool_call(
                        &call.function.name,
                        &call.function.arguments,
                    ))
                }
                None => Ok(StructuredAction::Unknown {
                    hint: message.content,
                }),
            }
        })
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ScheduleArgs {
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    purpose: Option<String>,
    when: String,
    #[serde(default)]
    duration_minutes: Option<i64>,
}

#[derive(Deserialize)]
struct RescheduleArgs {
    email: String,
    old_when: String,
    new_when: String,
}

#[derive(Deserialize)]
struct CancelArgs {
    email: String,
    when: String,
}

#[derive(Deserialize)]
struct ListArgs {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct AvailabilityArgs {
    date: String,
}

/// Map one tool call into the structured variant type. Unparseable
/// arguments degrade to `Unknown` so the user is asked to clarify instead
/// of the request failing outright.
pub(crate) fn action_from_tool_call(name: &str, arguments: &str) -> StructuredAction {
    let unknown = |hint: String| StructuredAction::Unknown { hint: Some(hint) };
    match name {
        "schedule_appointment" => match serde_json::from_str::<ScheduleArgs>(arguments) {
            Ok(args) => StructuredAction::Create {
                attendee_email: args.email,
                attendee_name: args.name,
                subject: args.purpose,
                when_phrase: args.when,
                duration_minutes: args.duration_minutes,
            },
            Err(e) => unknown(format!("could not read booking details: {e}")),
        },
        "reschedule_appointment" => match serde_json::from_str::<RescheduleArgs>(arguments) {
            Ok(args) => StructuredAction::Reschedule {
                attendee_email: args.email,
                old_phrase: args.old_when,
                new_phrase: args.new_when,
            },
            Err(e) => unknown(format!("could not read reschedule details: {e}")),
        },
        "cancel_appointment" => match serde_json::from_str::<CancelArgs>(arguments) {
            Ok(args) => StructuredAction::Cancel {
                attendee_email: args.email,
                when_phrase: args.when,
            },
            Err(e) => unknown(format!("could not read cancellation details: {e}")),
        },
        "get_user_appointments" => match serde_json::from_str::<ListArgs>(arguments) {
            Ok(args) => StructuredAction::List {
                attendee_email: args.email,
            },
            Err(e) => unknown(format!("could not read listing details: {e}")),
        },
        "check_availability" => match serde_json::from_str::<AvailabilityArgs>(arguments) {
            Ok(args) => StructuredAction::CheckAvailability {
                when_phrase: args.date,
            },
            Err(e) => unknown(format!("could not read the date to check: {e}")),
        },
        other => unknown(format!("unrecognised tool {other}")),
    }
}

fn system_prompt(reference_now: DateTime<Utc>, appointments: &[Appointment], tz: Tz) -> String {
    let now_local = reference_now.with_timezone(&tz);
    let mut prompt = format!(
        "You are an appointment booking assistant. The current local time is {} ({}). \
         When the user wants to book, reschedule, cancel or list appointments, or asks \
         what times are free on a date, call the \
         matching tool. Pass time expressions through verbatim as the user said them; do \
         not convert them to timestamps yourself. If the request is not about \
         appointments, answer briefly without calling a tool.",
        now_local.format("%A %Y-%m-%d %H:%M"),
        tz,
    );
    if !appointments.is_empty() {
        prompt.push_str("\n\nThe user's upcoming appointments:");
        for appt in appointments {
            let start = appt.start.with_timezone(&tz);
            prompt.push_str(&format!(
                "\n- {} {} to {}: {} ({})",
                start.format("%A %Y-%m-%d"),
                start.format("%H:%M"),
                appt.end.with_timezone(&tz).format("%H:%M"),
                appt.subject,
                appt.attendee_email,
            ));
        }
    }
    prompt
}

fn tool_schemas() -> Value {
    json!([
        {
            "type": "function",
            "function": {
                "name": "schedule_appointment",
                "description": "Book a new appointment",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "email": { "type": "string", "description": "Attendee email address" },
                        "name": { "type": "string", "description": "Attendee name, if given" },
                        "purpose": { "type": "string", "description": "What the appointment is for" },
                        "when": { "type": "string", "description": "The requested time, verbatim from the user, e.g. 'tomorrow at 2 PM'" },
                        "duration_minutes": { "type": "integer", "description": "Requested length in minutes, if given" }
                    },
                    "required": ["email", "when"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "reschedule_appointment",
                "description": "Move an existing appointment to a new time",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "email": { "type": "string", "description": "Attendee email address" },
                        "old_when": { "type": "string", "description": "The current appointment time, verbatim" },
                        "new_when": { "type": "string", "description": "The new requested time, verbatim" }
                    },
                    "required": ["email", "old_when", "new_when"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "cancel_appointment",
                "description": "Cancel an existing appointment",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "email": { "type": "string", "description": "Attendee email address" },
                        "when": { "type": "string", "description": "The appointment time to cancel, verbatim" }
                    },
                    "required": ["email", "when"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "check_availability",
                "description": "List the free appointment slots on a given date",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "date": { "type": "string", "description": "The date to check, verbatim from the user, e.g. 'tomorrow' or 'March 14'" }
                    },
                    "required": ["date"]
                }
            }
        },
        {
            "type": "function",
            "function": {
                "name": "get_user_appointments",
                "description": "List upcoming appointments",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "email": { "type": "string", "description": "Filter to this attendee, if given" }
                    }
                }
            }
        }
    ])
}
