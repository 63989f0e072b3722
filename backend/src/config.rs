//! Server configuration loaded via OrthoConfig.
//!
//! Values come from `WORDBOOK_*` environment variables, CLI flags or a
//! config file. Accessors supply the defaults so callers never handle raw
//! `Option`s.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::domain::DEFAULT_PROVIDER_TIMEOUT;
use crate::outbound::gemini::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Errors raised when settings are present but unusable.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("WORDBOOK_GEMINI_API_KEY must be set")]
    MissingApiKey,
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid Gemini endpoint {value:?}: {message}")]
    Endpoint { value: String, message: String },
}

/// Configuration for the wordbook server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WORDBOOK")]
pub struct ServerSettings {
    /// PostgreSQL connection string. Without it the server keeps words in
    /// memory.
    pub database_url: Option<String>,
    /// API key for the Generative Language API.
    pub gemini_api_key: Option<String>,
    /// Model used for translations.
    pub gemini_model: Option<String>,
    /// Base URL of the Generative Language API.
    pub gemini_endpoint: Option<String>,
    /// Per-call provider deadline in seconds.
    pub provider_timeout_secs: Option<u64>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl ServerSettings {
    /// Database URL, if persistence is configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Gemini API key; required to start the server.
    pub fn gemini_api_key(&self) -> Result<&str, SettingsError> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingApiKey)
    }

    /// Configured model, falling back to [`DEFAULT_GEMINI_MODEL`].
    pub fn gemini_model(&self) -> &str {
        self.gemini_model
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    /// Configured API base URL, falling back to [`DEFAULT_GEMINI_ENDPOINT`].
    pub fn gemini_endpoint(&self) -> Result<Url, SettingsError> {
        let raw = self
            .gemini_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_ENDPOINT);
        Url::parse(raw).map_err(|error| SettingsError::Endpoint {
            value: raw.to_owned(),
            message: error.to_string(),
        })
    }

    /// Provider deadline, defaulting to 30 seconds.
    pub fn provider_timeout(&self) -> Duration {
        self.provider_timeout_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_PROVIDER_TIMEOUT, Duration::from_secs)
    }

    /// Bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|error: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: error.to_string(),
        })
    }

    /// Database pool size, defaulting to 10.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}
