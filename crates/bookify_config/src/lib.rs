// --- File: crates/bookify_config/src/lib.rs ---
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;

pub mod models;
pub use models::*;

static DOTENV_LOADED: OnceCell<()> = OnceCell::new();

/// Load `.env` once per process. Later calls are no-ops.
pub fn ensure_dotenv_loaded() {
    DOTENV_LOADED.get_or_init(|| {
        if dotenv::dotenv().is_ok() {
            tracing::debug!("loaded environment from .env");
        }
    });
}

/// Loads the application configuration.
///
/// Sources, later ones overriding earlier ones:
/// 1. `config/default.*` (optional)
/// 2. `config/<RUN_ENV>.*` (optional, RUN_ENV defaults to "default")
/// 3. environment variables with the `APP` prefix and `__` separator,
///    e.g. `APP_SERVER__PORT=9090`, `APP_ASSISTANT__TIME_ZONE=Asia/Kolkata`
///
/// Dependent crates call this so they do not need to know where the config
/// comes from.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "default".to_string());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible_without_any_source() {
        let config: AppConfig = serde_json::from_str("{}").expect("empty config deserializes");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(!config.use_gcal);
        assert_eq!(config.assistant.time_zone, "Asia/Kolkata");
        assert_eq!(config.assistant.default_duration_minutes, 30);
        assert_eq!(config.assistant.lookahead_days, 60);
    }
}
