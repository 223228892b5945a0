// src/config.rs
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub max_workers: usize,
    pub listings_path: PathBuf,

    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expires_in: Duration,
    pub jwt_refresh_expires_in: Duration,

    pub rate_limit_window: Duration,
    pub rate_limit_max_requests: u32,

    pub log_level: String,

    pub api_prefix: String,
    pub api_version: String,

    pub demo_user_email: String,
    pub demo_user_password: String,
}

impl Config {
    /// Reads the environment, after loading `.env` if there is one.
    /// Unset variables take defaults; set but malformed ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            environment: get("APP_ENV", "development"),
            host: get("HOST", "127.0.0.1"),
            port: parse_num("PORT", get("PORT", "3000"))?,
            max_workers: parse_num("MAX_WORKERS", get("MAX_WORKERS", "8"))?,
            listings_path: PathBuf::from(get("LISTINGS_PATH", "data/listings.json")),

            jwt_secret: get("JWT_SECRET", "super-secret-jwt-key"),
            jwt_issuer: get("JWT_ISSUER", "housing-api"),
            jwt_expires_in: parse_duration("JWT_EXPIRES_IN", get("JWT_EXPIRES_IN", "24h"), Unit::Secs)?,
            jwt_refresh_expires_in: parse_duration(
                "JWT_REFRESH_EXPIRES_IN",
                get("JWT_REFRESH_EXPIRES_IN", "168h"),
                Unit::Secs,
            )?,

            rate_limit_window: parse_duration(
                "RATE_LIMIT_WINDOW_MS",
                get("RATE_LIMIT_WINDOW_MS", "3600000"),
                Unit::Millis,
            )?,
            rate_limit_max_requests: parse_num(
                "RATE_LIMIT_MAX_REQUESTS",
                get("RATE_LIMIT_MAX_REQUESTS", "100"),
            )?,

            log_level: get("LOG_LEVEL", "info"),

            api_prefix: get("API_PREFIX", "/api"),
            api_version: get("API_VERSION", "v1"),

            demo_user_email: get("DEMO_USER_EMAIL", "demo@worksquare.com"),
            demo_user_password: get("DEMO_USER_PASSWORD", "demo123456"),
        })
    }

    /// Defaults only, ignoring the process environment.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::from_lookup(|_| None).unwrap_or_else(|e| panic!("default config is invalid: {e}"))
    }

    /// "/api/v1"
    pub fn api_base(&self) -> String {
        format!(
            "/{}/{}",
            self.api_prefix.trim_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_num<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

#[derive(Clone, Copy)]
enum Unit {
    Millis,
    Secs,
}

/// "250ms", "30s", "15m", "24h". A bare number is read in `bare` units.
fn parse_duration(key: &'static str, value: String, bare: Unit) -> Result<Duration, ConfigError> {
    let v = value.trim();
    let digits_end = v.find(|c: char| !c.is_ascii_digit()).unwrap_or(v.len());
    let (num, suffix) = v.split_at(digits_end);

    let invalid = |reason: &str| ConfigError::Invalid {
        key,
        value: value.clone(),
        reason: reason.to_string(),
    };

    let n: u64 = num.parse().map_err(|_| invalid("expected a number"))?;
    let secs = |mult: u64| {
        n.checked_mul(mult)
            .map(Duration::from_secs)
            .ok_or_else(|| invalid("out of range"))
    };

    match suffix.trim() {
        "" => match bare {
            Unit::Millis => Ok(Duration::from_millis(n)),
            Unit::Secs => Ok(Duration::from_secs(n)),
        },
        "ms" => Ok(Duration::from_millis(n)),
        "s" => secs(1),
        "m" => secs(60),
        "h" => secs(3600),
        _ => Err(invalid("unknown unit, use ms, s, m or h")),
    }
}
