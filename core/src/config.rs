//! Client configuration.

use serde::Deserialize;
use url::Url;

use crate::error::InvalidArgument;

pub const DEFAULT_BASE_URL: &str = "http://beecreative.ch";

/// Where the server lives and how long a single request may take.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Applies to the whole request, connect to last body byte.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("swiss-affinity/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by `AFFINITY_BASE_URL`, `AFFINITY_TIMEOUT_SECS`
    /// and `AFFINITY_USER_AGENT`.
    pub fn from_env() -> Result<Self, InvalidArgument> {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("AFFINITY_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("AFFINITY_TIMEOUT_SECS") {
            config.timeout_secs = timeout.trim().parse().map_err(|_| InvalidArgument::Invalid {
                field: "timeout_secs",
                reason: format!("`{timeout}` is not a number of seconds"),
            })?;
        }
        if let Ok(user_agent) = std::env::var("AFFINITY_USER_AGENT") {
            config.user_agent = user_agent;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, InvalidArgument> {
        let config: Self = serde_json::from_str(text).map_err(|err| InvalidArgument::Invalid {
            field: "config",
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InvalidArgument> {
        validate_base_url(&self.base_url)?;
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(InvalidArgument::Invalid {
                field: "timeout_secs",
                reason: format!("{} is outside 1..=300", self.timeout_secs),
            });
        }
        Ok(())
    }
}

/// A base URL must be a non-blank absolute http(s) URL. Returns it without
/// a trailing slash.
pub fn validate_base_url(base_url: &str) -> Result<String, InvalidArgument> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(InvalidArgument::Empty("base_url"));
    }
    let url = Url::parse(trimmed).map_err(|err| InvalidArgument::Invalid {
        field: "base_url",
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(InvalidArgument::Invalid {
            field: "base_url",
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("swiss-affinity/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = ClientConfig::from_json(r#"{"base_url":"http://localhost:3000"}"#).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn json_with_zero_timeout_is_rejected() {
        let err = ClientConfig::from_json(r#"{"timeout_secs":0}"#).unwrap_err();
        assert!(matches!(err, InvalidArgument::Invalid { field: "timeout_secs", .. }));
    }

    #[test]
    fn base_url_validation() {
        assert_eq!(validate_base_url("http://localhost:3000/").unwrap(), "http://localhost:3000");
        assert_eq!(validate_base_url("  ").unwrap_err(), InvalidArgument::Empty("base_url"));
        assert!(validate_base_url("beecreative.ch").is_err());
        assert!(validate_base_url("ftp://beecreative.ch").is_err());
    }
}
