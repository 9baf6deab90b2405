use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files, which is
/// useful for testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup instead of `set_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let env = parse_environment(&or_default("SENTIVIEW_ENV", "development"));

    let bind_addr = parse_addr("SENTIVIEW_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("SENTIVIEW_LOG_LEVEL", "info");
    let public_dir = PathBuf::from(or_default("SENTIVIEW_PUBLIC_DIR", "./public"));

    let backend_url = or_default("SENTIVIEW_BACKEND_URL", "http://localhost:8000/api");
    let ml_api_url = or_default(
        "SENTIVIEW_ML_API_URL",
        "https://inference.example.com/api/predict",
    );
    let use_local_backend = parse_bool("SENTIVIEW_USE_LOCAL_BACKEND", "true")?;

    let allowed_origins: Vec<String> = or_default("SENTIVIEW_ALLOWED_ORIGINS", "")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    let api_timeout_secs = parse_u64("SENTIVIEW_API_TIMEOUT_SECS", "30")?;
    let default_timeout_secs = parse_u64("SENTIVIEW_DEFAULT_TIMEOUT_SECS", "10")?;
    let cache_ttl_secs = parse_u64("SENTIVIEW_CACHE_TTL_SECS", "300")?;
    let history_path = PathBuf::from(or_default(
        "SENTIVIEW_HISTORY_PATH",
        "./analysis-history.json",
    ));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        public_dir,
        backend_url,
        ml_api_url,
        use_local_backend,
        allowed_origins,
        api_timeout_secs,
        default_timeout_secs,
        cache_ttl_secs,
        history_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
