// --- File: crates/bookify_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

// --- Google Calendar Config ---
// Holds non-secret GCal config. The service-account key is referenced by
// path; no credential material lives in the config file.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>,
    pub calendar_id: Option<String>,
}

// --- SendGrid Config ---
// Holds non-secret mail config. Secret loaded directly from env var:
// SENDGRID_API_KEY
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SendgridConfig {
    pub from_email: String, // Mandatory; also the invite ORGANIZER address
    pub from_name: Option<String>,
}

// --- OpenAI Config ---
// Holds non-secret model config. Secret loaded directly from env var:
// OPENAI_API_KEY
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OpenAiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for the API base URL (tests point this at a stub server).
    pub api_base: Option<String>,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

// --- Assistant Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssistantConfig {
    /// The single fixed target timezone. Every timestamp the assistant
    /// produces or displays is in this zone; no other zone is ever emitted.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: i64,
    #[serde(default = "default_subject")]
    pub default_subject: String,
    /// How far ahead LIST and target-matching look, in days.
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: i64,
}

fn default_time_zone() -> String {
    "Asia/Kolkata".to_string()
}
fn default_duration_minutes() -> i64 {
    30
}
fn default_subject() -> String {
    "Appointment".to_string()
}
fn default_lookahead_days() -> i64 {
    60
}

impl Default for AssistantConfig {
    fn default() -> Self {
        AssistantConfig {
            time_zone: default_time_zone(),
            default_duration_minutes: default_duration_minutes(),
            default_subject: default_subject(),
            lookahead_days: default_lookahead_days(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_sendgrid: bool,
    #[serde(default)]
    pub use_openai: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub sendgrid: Option<SendgridConfig>,
    #[serde(default)]
    pub openai: Option<OpenAiConfig>,
    #[serde(default)]
    pub assistant: AssistantConfig,
}
