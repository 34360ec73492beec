//! Runtime configuration
//!
//! Read once at startup from environment variables.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

pub const ENV_FORM_ENDPOINT: &str = "RXHUB_FORM_ENDPOINT";
pub const ENV_REPLY_SUBJECT: &str = "RXHUB_REPLY_SUBJECT";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "RXHUB_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_SUBJECT: &str = "New contact form submission";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidEndpoint { var: &'static str, value: String },

    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Where and how contact form submissions are delivered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormConfig {
    pub endpoint: String,
    /// `_subject` routing field sent with each submission
    pub subject: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HubConfig {
    /// `None` when no endpoint is configured; the contact tools then report
    /// the form as unavailable while the calculators keep working
    pub form: Option<FormConfig>,
}

impl HubConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let Some(endpoint) = get(ENV_FORM_ENDPOINT) else {
            return Ok(Self { form: None });
        };
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::InvalidEndpoint {
                var: ENV_FORM_ENDPOINT,
                value: endpoint,
            });
        }

        let request_timeout = match get(ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: ENV_REQUEST_TIMEOUT_SECS,
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Self {
            form: Some(FormConfig {
                endpoint,
                subject: get(ENV_REPLY_SUBJECT).unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
                request_timeout,
            }),
        })
    }
}
