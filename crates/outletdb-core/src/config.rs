use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key), DatabaseUrl::Required)
}

/// Load configuration for commands that never open a database connection.
///
/// `DATABASE_URL` may be unset; it is then left blank and any later connect
/// attempt fails with a missing-URL error. Loads `.env` like [`load_app_config`].
///
/// # Errors
///
/// Returns `ConfigError` if any value that is present is invalid.
pub fn load_offline_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(|key| std::env::var(key), DatabaseUrl::Optional)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatabaseUrl {
    Required,
    Optional,
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap` lookup.
fn build_app_config<F>(lookup: F, database_url: DatabaseUrl) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = match database_url {
        DatabaseUrl::Required => require("DATABASE_URL")?,
        DatabaseUrl::Optional => lookup("DATABASE_URL").unwrap_or_default(),
    };
    let env = parse_environment(&or_default("OUTLETDB_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_value(
        "OUTLETDB_BIND_ADDR",
        &or_default("OUTLETDB_BIND_ADDR", "0.0.0.0:8000"),
    )?;
    let log_level = or_default("OUTLETDB_LOG_LEVEL", "info");

    let db_max_connections: u32 = parse_value(
        "OUTLETDB_DB_MAX_CONNECTIONS",
        &or_default("OUTLETDB_DB_MAX_CONNECTIONS", "10"),
    )?;
    let db_min_connections: u32 = parse_value(
        "OUTLETDB_DB_MIN_CONNECTIONS",
        &or_default("OUTLETDB_DB_MIN_CONNECTIONS", "1"),
    )?;
    let db_acquire_timeout_secs: u64 = parse_value(
        "OUTLETDB_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("OUTLETDB_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let locator_url = or_default(
        "OUTLETDB_LOCATOR_URL",
        "https://subway.com.my/find-a-subway",
    );
    let locator_area = or_default("OUTLETDB_LOCATOR_AREA", "Kuala Lumpur");

    let scraper_request_timeout_secs: u64 = parse_value(
        "OUTLETDB_SCRAPER_REQUEST_TIMEOUT_SECS",
        &or_default("OUTLETDB_SCRAPER_REQUEST_TIMEOUT_SECS", "30"),
    )?;
    let scraper_user_agent = or_default(
        "OUTLETDB_SCRAPER_USER_AGENT",
        "outletdb/0.1 (outlet-locator)",
    );
    let scraper_max_retries: u32 = parse_value(
        "OUTLETDB_SCRAPER_MAX_RETRIES",
        &or_default("OUTLETDB_SCRAPER_MAX_RETRIES", "3"),
    )?;
    let scraper_retry_backoff_base_secs: u64 = parse_value(
        "OUTLETDB_SCRAPER_RETRY_BACKOFF_BASE_SECS",
        &or_default("OUTLETDB_SCRAPER_RETRY_BACKOFF_BASE_SECS", "5"),
    )?;

    let rate_limit_per_minute: usize = parse_value(
        "OUTLETDB_RATE_LIMIT_PER_MINUTE",
        &or_default("OUTLETDB_RATE_LIMIT_PER_MINUTE", "120"),
    )?;
    if rate_limit_per_minute == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "OUTLETDB_RATE_LIMIT_PER_MINUTE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        locator_url,
        locator_area,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_secs,
        rate_limit_per_minute,
    })
}

fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "OUTLETDB_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
