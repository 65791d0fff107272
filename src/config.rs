//! Client configuration.
//!
//! Values come from a lookup function so the browser build can feed
//! compile-time `option_env!` values and tests can feed a map.

use tracing::Level;
use tutor_shared::DEFAULT_API_BASE_URL;

pub const ENV_API_URL: &str = "TUTOR_API_URL";
pub const ENV_AUTH_URL: &str = "TUTOR_AUTH_URL";
pub const ENV_AUTH_ANON_KEY: &str = "TUTOR_AUTH_ANON_KEY";
pub const ENV_LOG_LEVEL: &str = "TUTOR_LOG";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the tutoring REST API, without trailing slash.
    pub api_base_url: String,
    /// Base URL of the auth/storage provider. Empty when not configured.
    pub auth_url: String,
    pub auth_anon_key: String,
    pub log_level: Level,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_url: String::new(),
            auth_anon_key: String::new(),
            log_level: Level::INFO,
        }
    }
}

impl ClientConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_base_url = match read(ENV_API_URL) {
            Some(url) => validate_url(ENV_API_URL, &url)?,
            None => DEFAULT_API_BASE_URL.to_string(),
        };

        let auth_url = match read(ENV_AUTH_URL) {
            Some(url) => validate_url(ENV_AUTH_URL, &url)?,
            None => String::new(),
        };

        let auth_anon_key = read(ENV_AUTH_ANON_KEY).unwrap_or_default();

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(level) => level.parse::<Level>().map_err(|_| {
                ConfigError::InvalidValue(
                    ENV_LOG_LEVEL.to_string(),
                    format!("'{}' is not a valid log level", level),
                )
            })?,
            None => Level::INFO,
        };

        Ok(Self {
            api_base_url,
            auth_url,
            auth_anon_key,
            log_level,
        })
    }

    pub fn auth_enabled(&self) -> bool {
        !self.auth_url.is_empty()
    }
}

fn validate_url(key: &str, url: &str) -> Result<String, ConfigError> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("'{}' is not an http(s) URL", url),
        ));
    }
    Ok(url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_local_api() {
        let cfg = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.api_base_url, "http://localhost:5000/api");
        assert!(!cfg.auth_enabled());
        assert_eq!(cfg.log_level, Level::INFO);
    }

    #[test]
    fn trims_trailing_slash_and_reads_auth() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://tutor.example.com/api/"),
            (ENV_AUTH_URL, "https://project.supabase.co"),
            (ENV_AUTH_ANON_KEY, "anon"),
            (ENV_LOG_LEVEL, "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_base_url, "https://tutor.example.com/api");
        assert!(cfg.auth_enabled());
        assert_eq!(cfg.auth_anon_key, "anon");
        assert_eq!(cfg.log_level, Level::DEBUG);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[(ENV_API_URL, "localhost:5000")])),
            Err(ConfigError::InvalidValue(key, _)) if key == ENV_API_URL
        ));
        assert!(ClientConfig::from_lookup(lookup(&[(ENV_LOG_LEVEL, "loud")])).is_err());
    }
}
