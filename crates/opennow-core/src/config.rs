use chrono_tz::Tz;

use crate::app_config::{AppConfig, DEFAULT_OVERPASS_ENDPOINTS};
use crate::ConfigError;

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
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("OPENNOW_LOG_LEVEL", "info");

    let overpass_endpoints = match lookup("OPENNOW_OVERPASS_ENDPOINTS") {
        Ok(raw) => parse_endpoint_list(&raw)
            .ok_or_else(|| invalid("OPENNOW_OVERPASS_ENDPOINTS", "no endpoints listed".into()))?,
        Err(_) => DEFAULT_OVERPASS_ENDPOINTS
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    };
    let overpass_user_agent = or_default(
        "OPENNOW_OVERPASS_USER_AGENT",
        "opennow/0.1 (pharmacy-open-now)",
    );
    let overpass_request_timeout_secs = parse_u64("OPENNOW_OVERPASS_REQUEST_TIMEOUT_SECS", "45")?;
    let overpass_query_timeout_secs = parse_u64("OPENNOW_OVERPASS_QUERY_TIMEOUT_SECS", "25")?;

    let overpass_max_attempts = parse_u32("OPENNOW_OVERPASS_MAX_ATTEMPTS", "6")?;
    if overpass_max_attempts == 0 {
        return Err(invalid(
            "OPENNOW_OVERPASS_MAX_ATTEMPTS",
            "must be at least 1".into(),
        ));
    }

    let overpass_backoff_base =
        parse_backoff_base(&or_default("OPENNOW_OVERPASS_BACKOFF_BASE", "1.6"))
            .map_err(|reason| invalid("OPENNOW_OVERPASS_BACKOFF_BASE", reason))?;

    let overpass_max_backoff_secs = match lookup("OPENNOW_OVERPASS_MAX_BACKOFF_SECS") {
        Ok(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| invalid("OPENNOW_OVERPASS_MAX_BACKOFF_SECS", e.to_string()))?,
        ),
        Err(_) => None,
    };

    let search_default_radius_m = parse_u32("OPENNOW_SEARCH_DEFAULT_RADIUS_M", "1200")?;
    let search_max_radius_m = parse_u32("OPENNOW_SEARCH_MAX_RADIUS_M", "3000")?;
    if search_default_radius_m == 0 {
        return Err(invalid(
            "OPENNOW_SEARCH_DEFAULT_RADIUS_M",
            "must be greater than 0".into(),
        ));
    }

    let tz_raw = or_default("OPENNOW_DEFAULT_TIMEZONE", "Asia/Seoul");
    let default_timezone = tz_raw
        .parse::<Tz>()
        .map_err(|_| invalid("OPENNOW_DEFAULT_TIMEZONE", format!("unknown zone \"{tz_raw}\"")))?;

    Ok(AppConfig {
        log_level,
        overpass_endpoints,
        overpass_user_agent,
        overpass_request_timeout_secs,
        overpass_query_timeout_secs,
        overpass_max_attempts,
        overpass_backoff_base,
        overpass_max_backoff_secs,
        search_default_radius_m,
        search_max_radius_m,
        default_timezone,
    })
}

/// Splits a comma-separated endpoint list, dropping blank entries.
///
/// Returns `None` when nothing usable remains.
fn parse_endpoint_list(raw: &str) -> Option<Vec<String>> {
    let endpoints: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!endpoints.is_empty()).then_some(endpoints)
}

/// A backoff base below 1.0 would shrink delays on every retry.
fn parse_backoff_base(raw: &str) -> Result<f64, String> {
    let base = raw.parse::<f64>().map_err(|e| e.to_string())?;
    if !base.is_finite() || base < 1.0 {
        return Err(format!("must be a finite number >= 1.0, got {raw}"));
    }
    Ok(base)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
