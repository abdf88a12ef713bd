use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Hosted Mistral instruct endpoint used by the content generator.
pub const DEFAULT_MODEL_URL: &str =
    "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("ADBOARD_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_as(
        "ADBOARD_BIND_ADDR",
        &or_default("ADBOARD_BIND_ADDR", "0.0.0.0:3002"),
    )?;
    let log_level = or_default("ADBOARD_LOG_LEVEL", "info");

    let model_url = or_default("ADBOARD_MODEL_URL", DEFAULT_MODEL_URL);
    if !model_url.starts_with("http://") && !model_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "ADBOARD_MODEL_URL".to_string(),
            reason: format!("expected an http(s) URL, got '{model_url}'"),
        });
    }
    let model_api_token = lookup("ADBOARD_MODEL_API_TOKEN")
        .ok()
        .filter(|t| !t.trim().is_empty());

    let model_timeout_secs: u64 = parse_as(
        "ADBOARD_MODEL_TIMEOUT_SECS",
        &or_default("ADBOARD_MODEL_TIMEOUT_SECS", "30"),
    )?;
    let model_max_retries: u32 = parse_as(
        "ADBOARD_MODEL_MAX_RETRIES",
        &or_default("ADBOARD_MODEL_MAX_RETRIES", "2"),
    )?;
    let model_retry_backoff_ms: u64 = parse_as(
        "ADBOARD_MODEL_RETRY_BACKOFF_MS",
        &or_default("ADBOARD_MODEL_RETRY_BACKOFF_MS", "500"),
    )?;
    let rate_limit_per_minute: usize = parse_as(
        "ADBOARD_RATE_LIMIT_PER_MINUTE",
        &or_default("ADBOARD_RATE_LIMIT_PER_MINUTE", "120"),
    )?;
    let max_upload_bytes: usize = parse_as(
        "ADBOARD_MAX_UPLOAD_BYTES",
        &or_default("ADBOARD_MAX_UPLOAD_BYTES", "1048576"),
    )?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        model_url,
        model_api_token,
        model_timeout_secs,
        model_max_retries,
        model_retry_backoff_ms,
        rate_limit_per_minute,
        max_upload_bytes,
    })
}

fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ADBOARD_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
