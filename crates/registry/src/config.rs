use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding the backend base URL
pub const BACKEND_URL_ENV: &str = "FILETRACK_BACKEND_URL";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Where the remote store lives and how to talk to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL of the record backend, without the `/api/...` suffix
    pub backend_url: String,

    /// Per-request timeout; unset means wait for the server
    pub request_timeout_secs: Option<u64>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl RegistryConfig {
    /// Defaults, with the backend URL taken from `FILETRACK_BACKEND_URL` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend_url = url.trim().to_string();
            }
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        let url = self.backend_url.trim();
        if url.is_empty() {
            return Err("backend_url must not be empty".to_string());
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!(
                "backend_url ({url}) must start with http:// or https://"
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err("request_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}
