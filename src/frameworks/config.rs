use std::{env, path::PathBuf, time::Duration};
use url::Url;

use crate::domain::errors::ConfigError;

// Runtime settings, read from the environment after `.env` is loaded.

pub fn graphql_endpoint() -> Result<Url, ConfigError> {
    let raw = env::var("GRAPHQL_ENDPOINT")
        .unwrap_or_else(|_| "http://127.0.0.1:4000/graphql".to_string());
    parse_endpoint(&raw)
}

pub fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name: "GRAPHQL_ENDPOINT",
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            name: "GRAPHQL_ENDPOINT",
            reason: format!("unsupported scheme {:?}", url.scheme()),
        });
    }
    Ok(url)
}

pub fn view_dwell() -> Duration {
    millis_var("VIEW_DWELL_MS", 3000)
}

pub fn graphql_timeout() -> Duration {
    millis_var("GRAPHQL_TIMEOUT_MS", 5000)
}

// Secure cookies only in production builds.
pub fn is_production() -> bool {
    matches!(env::var("APP_ENV").as_deref(), Ok("production"))
}

pub fn cookie_file() -> PathBuf {
    env::var("GUEST_COOKIE_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".guest_cookies.json"))
}

fn millis_var(name: &str, default: u64) -> Duration {
    let millis = env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_millis(millis)
}
