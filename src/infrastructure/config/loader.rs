//! Hierarchical settings loading.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use super::settings::Settings;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("api_url cannot be empty")]
    EmptyApiUrl,

    #[error("request_timeout_secs cannot be 0")]
    ZeroRequestTimeout,

    #[error("wait.timeout_secs cannot be 0")]
    ZeroWaitTimeout,

    #[error("wait.interval_secs cannot be 0")]
    ZeroWaitInterval,

    #[error("wait.interval_secs ({0}) must not exceed wait.timeout_secs ({1})")]
    IntervalExceedsTimeout(u64, u64),
}

/// Settings loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. poolctl.yaml in the working directory (optional)
    /// 3. Environment variables (POOLCTL_* prefix, highest priority)
    ///
    /// CLI flags override the loaded settings per invocation; that happens
    /// at the CLI boundary, not here.
    pub fn load() -> Result<Settings> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file("poolctl.yaml"))
            .merge(Env::prefixed("POOLCTL_").split("__"))
            .extract()
            .context("Failed to extract settings from figment")?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Settings> {
        let settings: Settings = Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| {
                format!("Failed to load settings from {}", path.as_ref().display())
            })?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Validate loaded settings
    pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
        if settings.api_url.trim().is_empty() {
            return Err(ConfigError::EmptyApiUrl);
        }
        if settings.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        if settings.wait.timeout_secs == 0 {
            return Err(ConfigError::ZeroWaitTimeout);
        }
        if settings.wait.interval_secs == 0 {
            return Err(ConfigError::ZeroWaitInterval);
        }
        if settings.wait.interval_secs > settings.wait.timeout_secs {
            return Err(ConfigError::IntervalExceedsTimeout(
                settings.wait.interval_secs,
                settings.wait.timeout_secs,
            ));
        }
        Ok(())
    }
}
