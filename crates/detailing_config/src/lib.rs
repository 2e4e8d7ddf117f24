use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::PathBuf;
use tracing::warn;

pub mod models;
pub use models::*;

/// Marker value replaced by an environment variable named after the key path.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Loads the application configuration.
///
/// Sources, later ones winning:
/// 1. `{CONFIG_DIR}/default.*` (optional)
/// 2. `{CONFIG_DIR}/{RUN_ENV}.*` (optional, `RUN_ENV` defaults to `debug`)
/// 3. Environment variables prefixed with `PREFIX` (default `DETAILING`), `__` separated,
///    e.g. `DETAILING__SERVER__PORT=8080`.
///
/// Afterwards every `"secret_from_env"` value is replaced from the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "DETAILING".to_string());
    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    tracing::debug!(
        "Loading config from {} and {} (prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values.
///
/// The variable name is the key path joined by `_` and upper-cased, so
/// `stripe.secret_key` is read from `STRIPE_SECRET_KEY`. A missing variable turns
/// the value into `null`, which optional fields read as "not configured".
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let env_key = path.join("_").to_uppercase();
                match env::var(&env_key) {
                    Ok(env_val) => *obj = Value::String(env_val),
                    Err(_) => {
                        warn!("env var {} not found for secret_from_env", env_key);
                        *obj = Value::Null;
                    }
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config.
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("config is not serializable: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("secret injection broke config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// `DOTENV_OVERRIDE` wins, then a first CLI argument starting with `.env`, then `.env`.
/// Returns the path that was used.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config_json() -> Value {
        serde_json::json!({
            "server": { "host": "127.0.0.1", "port": 8080 }
        })
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: AppConfig = serde_json::from_value(minimal_config_json()).unwrap();

        assert!(!config.use_gcal);
        assert_eq!(config.scheduling.business_start, "08:00");
        assert_eq!(config.scheduling.business_end, "18:00");
        assert_eq!(config.scheduling.appointment_duration_minutes, 60);
        assert_eq!(config.scheduling.working_days.len(), 5);
        assert_eq!(
            config.scheduling.travel_failure,
            TravelFailureConfig::FailClosed
        );
        assert_eq!(config.catalog.currency, "chf");
        assert_eq!(config.cache.max_capacity, 10_000);
    }

    #[test]
    fn test_travel_failure_fallback_is_tagged() {
        let mut json = minimal_config_json();
        json["scheduling"] = serde_json::json!({
            "travel_failure": { "mode": "fallback", "minutes": 30 }
        });
        let config: AppConfig = serde_json::from_value(json).unwrap();
        assert_eq!(
            config.scheduling.travel_failure,
            TravelFailureConfig::Fallback { minutes: 30 }
        );
    }

    #[test]
    fn test_secret_marker_is_replaced_from_env() {
        env::set_var("MAPS_API_KEY", "maps-test-key");
        let mut json = minimal_config_json();
        json["maps"] = serde_json::json!({ "api_key": SECRET_MARKER });
        let config: AppConfig = serde_json::from_value(json).unwrap();

        let config = apply_env_overrides_from_marker(config).unwrap();
        assert_eq!(
            config.maps.unwrap().api_key.as_deref(),
            Some("maps-test-key")
        );
    }

    #[test]
    fn test_missing_secret_becomes_none() {
        let mut json = minimal_config_json();
        json["gcal"] = serde_json::json!({
            "calendar_id": "primary",
            "key_path": SECRET_MARKER
        });
        let config: AppConfig = serde_json::from_value(json).unwrap();

        let config = apply_env_overrides_from_marker(config).unwrap();
        let gcal = config.gcal.unwrap();
        assert_eq!(gcal.calendar_id.as_deref(), Some("primary"));
        assert!(gcal.key_path.is_none());
    }
}
