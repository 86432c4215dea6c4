use anyhow::{anyhow, Context as AnyhowContext, Result};
use filetrack_analytics::AnalyticsConfig;
use filetrack_registry::RegistryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Picked up from the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "filetrack.toml";

/// Contents of `filetrack.toml`. Every section and key is optional.
///
/// ```toml
/// [registry]
/// backend_url = "http://records.internal:8000"
/// request_timeout_secs = 10
///
/// [analytics]
/// hot_location_limit = 5
/// capacity_warning_percent = 80.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FiletrackConfig {
    pub registry: RegistryConfig,
    pub analytics: AnalyticsConfig,
}

impl FiletrackConfig {
    /// Resolve configuration: file (explicit or default), then the
    /// `FILETRACK_BACKEND_URL` environment variable, then `backend_url`.
    pub fn resolve(explicit: Option<&Path>, backend_url: Option<&str>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };

        config.registry.apply_env();
        if let Some(url) = backend_url {
            config.registry.backend_url = url.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self =
            toml::from_str(&raw).with_context(|| format!("Invalid {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.registry
            .validate()
            .map_err(|err| anyhow!("Invalid registry config: {err}"))?;
        self.analytics
            .validate()
            .map_err(|err| anyhow!("Invalid analytics config: {err}"))?;
        Ok(())
    }
}
