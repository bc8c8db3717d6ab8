//! Runtime settings.

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.scaleway.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_wait_timeout_secs() -> u64 {
    600
}

fn default_wait_interval_secs() -> u64 {
    5
}

/// Convergence wait defaults, overridable per invocation from the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Total wait budget in seconds.
    #[serde(default = "default_wait_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause between two status probes in seconds.
    #[serde(default = "default_wait_interval_secs")]
    pub interval_secs: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_wait_timeout_secs(),
            interval_secs: default_wait_interval_secs(),
        }
    }
}

/// Settings merged from programmatic defaults, `poolctl.yaml`, and
/// `POOLCTL_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Control-plane base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// API secret key. Usually left unset here in favor of `--token` or the
    /// `SCW_SECRET_KEY` environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Convergence wait defaults.
    #[serde(default)]
    pub wait: WaitConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            secret_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            wait: WaitConfig::default(),
        }
    }
}
