// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact form relay.
//!
//! Everything is read from environment variables at startup. The owner
//! mailbox (`CONTACT_EMAIL`) and the provider credential (`RESEND_API_KEY`)
//! have no defaults; a process without them refuses to start.

use crate::validator::is_plain_address;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Startup configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for the contact form relay service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Where notifications go and who they come from
    pub contact: ContactConfig,

    /// Email provider settings
    pub delivery: DeliveryConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Field rules
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Browser origins allowed to post the form
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Notification addressing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Owner mailbox receiving submissions
    pub to_address: String,

    /// Sender shown on notifications
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

/// Transactional email provider settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Provider API key
    pub api_key: String,

    /// Provider base URL (default: https://api.resend.com/)
    #[serde(default = "default_api_base")]
    pub api_base: Url,

    /// Per-request HTTP timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Keeps the API key out of logs.
impl std::fmt::Debug for DeliveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Sliding window quota per submitter email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Submissions allowed per identifier inside the window (default: 3)
    #[serde(default = "default_max_submissions")]
    pub max_submissions: u32,

    /// Window length in milliseconds (default: one hour)
    #[serde(default = "default_window_ms")]
    pub window_ms: i64,
}

/// Inclusive length bounds for the form fields, in characters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_name_min")]
    pub name_min: usize,
    #[serde(default = "default_name_max")]
    pub name_max: usize,
    #[serde(default = "default_message_min")]
    pub message_min: usize,
    #[serde(default = "default_message_max")]
    pub message_max: usize,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

/// CORS configuration. An empty list allows any origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_from_address() -> String {
    "Contact Form <noreply@localhost>".to_string()
}

fn default_api_base() -> Url {
    Url::parse("https://api.resend.com/").expect("static URL")
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_submissions() -> u32 {
    3
}

fn default_window_ms() -> i64 {
    60 * 60 * 1000
}

fn default_name_min() -> usize {
    2
}

fn default_name_max() -> usize {
    100
}

fn default_message_min() -> usize {
    10
}

fn default_message_max() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            window_ms: default_window_ms(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            name_min: default_name_min(),
            name_max: default_name_max(),
            message_min: default_message_min(),
            message_max: default_message_max(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Human form of the window for user-facing messages ("hour", "2 hours",
    /// "15 minutes", "1500 milliseconds").
    pub fn describe_window(&self) -> String {
        const SECOND: i64 = 1000;
        const MINUTE: i64 = 60 * SECOND;
        const HOUR: i64 = 60 * MINUTE;

        let (count, unit) = match self.window_ms {
            ms if ms >= HOUR && ms % HOUR == 0 => (ms / HOUR, "hour"),
            ms if ms >= MINUTE && ms % MINUTE == 0 => (ms / MINUTE, "minute"),
            ms if ms >= SECOND && ms % SECOND == 0 => (ms / SECOND, "second"),
            ms => (ms, "millisecond"),
        };

        match count {
            1 => unit.to_string(),
            n => format!("{n} {unit}s"),
        }
    }
}

impl DeliveryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let to_address = get("CONTACT_EMAIL").ok_or(ConfigError::Missing("CONTACT_EMAIL"))?;
        if !is_plain_address(&to_address) {
            return Err(ConfigError::Invalid {
                key: "CONTACT_EMAIL",
                value: to_address,
                reason: "not an email address".to_string(),
            });
        }
        let api_key = get("RESEND_API_KEY").ok_or(ConfigError::Missing("RESEND_API_KEY"))?;

        let api_base = match get("RESEND_API_BASE") {
            Some(raw) => Url::parse(&raw)
                .map(with_trailing_slash)
                .map_err(|e| ConfigError::Invalid {
                    key: "RESEND_API_BASE",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => default_api_base(),
        };

        let rate_limit = RateLimitConfig {
            max_submissions: parse_or(&get, "MAX_SUBMISSIONS", default_max_submissions())?,
            window_ms: parse_or(&get, "RATE_LIMIT_WINDOW_MS", default_window_ms())?,
        };
        if rate_limit.max_submissions == 0 || rate_limit.window_ms <= 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_SUBMISSIONS/RATE_LIMIT_WINDOW_MS",
                value: format!("{}/{}", rate_limit.max_submissions, rate_limit.window_ms),
                reason: "quota and window must be positive".to_string(),
            });
        }

        Ok(Config {
            bind_addr: get("BIND_ADDR").unwrap_or_else(default_bind_addr),
            contact: ContactConfig {
                to_address,
                from_address: get("CONTACT_FROM").unwrap_or_else(default_from_address),
            },
            delivery: DeliveryConfig {
                api_key,
                api_base,
                timeout_secs: parse_or(&get, "DELIVERY_TIMEOUT_SECS", default_timeout_secs())?,
            },
            rate_limit,
            validation: ValidationConfig::default(),
            metrics: MetricsConfig {
                enabled: parse_or(&get, "METRICS_ENABLED", default_true())?,
                ..Default::default()
            },
            cors: CorsConfig {
                allowed_origins: get("CORS_ALLOWED_ORIGINS")
                    .map(|raw| {
                        raw.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Make `base` a directory URL so joining a relative path keeps its last
/// segment (`https://host/v1` + `emails` is `https://host/v1/emails`).
pub fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
