use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable holds an invalid value.
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
/// Returns `ConfigError` if a variable holds an invalid value.
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

    let env = parse_environment(&or_default("FOODSPOT_ENV", "development"))?;
    let bind_addr = parse_or(&lookup, "FOODSPOT_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("FOODSPOT_LOG_LEVEL", "info");

    let geoapify_api_key = lookup("GEOAPIFY_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    let geoapify_base_url = or_default("FOODSPOT_GEOAPIFY_BASE_URL", "https://api.geoapify.com/");
    let user_agent = or_default("FOODSPOT_USER_AGENT", "foodspot/0.1 (local-food-discovery)");

    let search_radius_meters = parse_or(&lookup, "FOODSPOT_SEARCH_RADIUS_METERS", "5000")?;
    let search_timeout_secs = parse_or(&lookup, "FOODSPOT_SEARCH_TIMEOUT_SECS", "10")?;
    let upstream_timeout_secs = parse_or(&lookup, "FOODSPOT_UPSTREAM_TIMEOUT_SECS", "5")?;
    let routing_concurrency: usize = parse_or(&lookup, "FOODSPOT_ROUTING_CONCURRENCY", "10")?;
    let exact_route_limit = parse_or(&lookup, "FOODSPOT_EXACT_ROUTE_LIMIT", "20")?;
    let response_cache_ttl_secs = parse_or(&lookup, "FOODSPOT_RESPONSE_CACHE_TTL_SECS", "900")?;
    let geocode_cache_ttl_secs = parse_or(&lookup, "FOODSPOT_GEOCODE_CACHE_TTL_SECS", "3600")?;
    let route_cache_ttl_secs = parse_or(&lookup, "FOODSPOT_ROUTE_CACHE_TTL_SECS", "3600")?;

    if routing_concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOODSPOT_ROUTING_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        geoapify_api_key,
        geoapify_base_url,
        user_agent,
        search_radius_meters,
        search_timeout_secs,
        upstream_timeout_secs,
        routing_concurrency,
        exact_route_limit,
        response_cache_ttl_secs,
        geocode_cache_ttl_secs,
        route_cache_ttl_secs,
    })
}

/// Parse `var` (or `default` when unset) into `T`.
fn parse_or<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOODSPOT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
