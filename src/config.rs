// src/config.rs
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result, bail};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENGINE_NAME: &str = "Gemini-3-Flash";

/// Settings for the upstream Gemini API.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub engine_name: String,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("engine_name", &self.engine_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            engine_name: DEFAULT_ENGINE_NAME.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub gemini: GeminiConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            gemini: GeminiConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Read settings from the process environment. A missing API key is not
    /// an error here; it only disables `/chat`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("invalid PORT value: {raw}"))?,
            None => defaults.port,
        };

        let timeout = match get("GEMINI_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("invalid GEMINI_TIMEOUT_SECS value: {raw}"))?;
                if secs == 0 {
                    bail!("GEMINI_TIMEOUT_SECS must be greater than zero; leave it unset for no timeout");
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            gemini: GeminiConfig {
                api_key: get("GEMINI_API_KEY"),
                api_base: get("GEMINI_API_BASE").unwrap_or(defaults.gemini.api_base),
                model: get("GEMINI_MODEL").unwrap_or(defaults.gemini.model),
                engine_name: get("GEMINI_ENGINE_NAME").unwrap_or(defaults.gemini.engine_name),
                timeout,
            },
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("invalid HOST value: {}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
