use std::net::{IpAddr, SocketAddr};

use crumb_core::error::Result;
use crumb_core::{CrumbError, DEFAULT_SYSTEM_PROMPT};
use crumb_gateway::DEFAULT_BASE_URL;

/// Crumb runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay bind address
    pub bind_address: String,
    /// Relay port
    pub port: u16,
    /// Completions provider base URL
    pub upstream_base_url: String,
    /// Relay endpoint the chat client posts to; derived from `port` when unset
    pub relay_url: Option<String>,
    /// System prompt sent ahead of the conversation; empty disables it
    pub system_prompt: String,
    /// Directory for rolling log files
    pub log_dir: String,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            upstream_base_url: DEFAULT_BASE_URL.to_string(),
            relay_url: None,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            log_dir: "logs".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// The provider API key is not part of this; the relay reads it from the
    /// environment on every request.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_address: get("CRUMB_BIND").unwrap_or(defaults.bind_address),
            port: get("CRUMB_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            upstream_base_url: get("VOIDAI_BASE_URL").unwrap_or(defaults.upstream_base_url),
            relay_url: get("CRUMB_RELAY_URL"),
            system_prompt: get("CRUMB_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
            log_dir: get("CRUMB_LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|e| CrumbError::Config(format!("invalid bind address {:?}: {e}", self.bind_address)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn relay_url(&self) -> String {
        self.relay_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}/api/voidai", self.port))
    }

    pub fn system_prompt(&self) -> Option<String> {
        (!self.system_prompt.is_empty()).then(|| self.system_prompt.clone())
    }
}
