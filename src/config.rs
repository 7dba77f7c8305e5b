use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, ShortError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 200;
pub const DEFAULT_BIND: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 3000));

/// Settings for talking to the model provider and serving the API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key. An empty key is allowed; the provider rejects it.
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Upper bound for one script generation call
    pub timeout: Duration,
    pub bind: SocketAddr,
}

/// Values given on the command line. Anything left out falls back to the
/// environment, then to the defaults above.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub bind: Option<String>,
}

impl Config {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bind: DEFAULT_BIND,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolves the configuration from overrides and process environment.
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    fn resolve_with<F>(overrides: Overrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = match overrides.api_key.or_else(|| env("GEMINI_API_KEY")) {
            Some(key) => key,
            None => {
                warn!("GEMINI_API_KEY is not set; the model provider will reject requests");
                String::new()
            }
        };

        let base_url = overrides
            .base_url
            .or_else(|| env("GEMINI_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = overrides
            .model
            .or_else(|| env("GEMINI_MODEL"))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match env("SHORT_TIMEOUT_SECS") {
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                    ShortError::EnvError(format!("SHORT_TIMEOUT_SECS is not a number: {}", raw))
                })?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        let bind = match overrides.bind.or_else(|| env("SHORT_BIND")) {
            Some(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                ShortError::EnvError(format!("Invalid bind address {}: {}", raw, e))
            })?,
            None => DEFAULT_BIND,
        };

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            timeout: Duration::from_secs(timeout_secs),
            bind,
        })
    }
}
