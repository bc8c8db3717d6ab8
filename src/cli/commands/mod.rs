//! poolctl subcommand implementations.

pub mod apply;
pub mod delete;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::adapters::scaleway::ScalewayClient;
use crate::cli::output::CommandOutput;
use crate::domain::errors::ReconcileError;
use crate::domain::models::{ReconcileAction, ReconcileReport, WaitSettings};
use crate::infrastructure::config::{ConfigLoader, Settings};
use crate::services::Reconciler;

/// Environment variable consulted when no token is supplied anywhere else.
pub const TOKEN_ENV_VAR: &str = "SCW_SECRET_KEY";

/// Flags shared by every subcommand that talks to the control plane.
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Region the cluster lives in
    #[arg(long, default_value = "fr-par")]
    pub region: String,

    /// Cluster the pool belongs to
    #[arg(long)]
    pub cluster_id: String,

    /// API secret key; falls back to the config file, then SCW_SECRET_KEY
    #[arg(long)]
    pub token: Option<String>,

    /// Control-plane base URL override
    #[arg(long)]
    pub api_url: Option<String>,
}

/// Flags controlling the post-mutation convergence wait.
#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Wait for the backend operation to finish (default)
    #[arg(long, overrides_with = "no_wait")]
    pub wait: bool,

    /// Return as soon as the mutation is accepted
    #[arg(long)]
    pub no_wait: bool,

    /// Total wait budget in seconds (default from config)
    #[arg(long)]
    pub wait_timeout: Option<u64>,

    /// Pause between status probes in seconds (default from config)
    #[arg(long)]
    pub wait_interval: Option<u64>,

    /// Attach a truncated snapshot sample to convergence errors
    #[arg(long)]
    pub debug_poll: bool,
}

impl WaitArgs {
    /// Resolve into wait settings, filling gaps from the loaded settings.
    pub fn resolve(&self, settings: &Settings) -> WaitSettings {
        WaitSettings {
            enabled: !self.no_wait,
            timeout: Duration::from_secs(self.wait_timeout.unwrap_or(settings.wait.timeout_secs)),
            interval: Duration::from_secs(
                self.wait_interval.unwrap_or(settings.wait.interval_secs),
            ),
            debug_observation: self.debug_poll,
        }
    }
}

/// Load settings and apply per-invocation connection overrides.
pub(crate) fn load_settings(conn: &ConnectionArgs) -> Result<Settings> {
    let mut settings = ConfigLoader::load()?;
    if let Some(api_url) = &conn.api_url {
        settings.api_url = api_url.clone();
    }
    Ok(settings)
}

/// Resolve the API token: `--token` flag, then config file, then the
/// well-known environment variable. Missing everywhere is a configuration
/// error raised before any backend contact.
pub(crate) fn resolve_token(
    conn: &ConnectionArgs,
    settings: &Settings,
) -> Result<String, ReconcileError> {
    if let Some(token) = conn.token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }
    if let Some(token) = settings.secret_key.as_deref().filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }
    if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
        if !token.is_empty() {
            return Ok(token);
        }
    }
    Err(ReconcileError::Configuration(format!(
        "no API token: pass --token, set secret_key in poolctl.yaml, or export {TOKEN_ENV_VAR}"
    )))
}

/// Build the reconciler over an authenticated HTTP client.
pub(crate) fn build_reconciler(
    settings: &Settings,
    token: String,
) -> Result<Reconciler<ScalewayClient>, ReconcileError> {
    let client = ScalewayClient::new(
        &settings.api_url,
        token,
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    Ok(Reconciler::new(Arc::new(client)))
}

/// Reconciliation report as rendered by the CLI.
#[derive(Debug, serde::Serialize)]
pub struct ReportOutput {
    /// Name of the pool that was reconciled.
    pub pool_name: String,
    /// The underlying report, flattened into the JSON form.
    #[serde(flatten)]
    pub report: ReconcileReport,
}

impl ReportOutput {
    /// Wrap a report for rendering.
    pub fn new(pool_name: impl Into<String>, report: ReconcileReport) -> Self {
        Self {
            pool_name: pool_name.into(),
            report,
        }
    }
}

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        let name = &self.pool_name;
        let mut lines = vec![match (self.report.dry_run, self.report.action) {
            (_, ReconcileAction::None) => {
                if self.report.pool.is_some() {
                    format!("Pool '{name}' already matches the spec")
                } else {
                    format!("Pool '{name}' is already absent")
                }
            }
            (true, ReconcileAction::Create) => format!("Pool '{name}' would be created"),
            (true, ReconcileAction::Update) => format!("Pool '{name}' would be updated"),
            (true, ReconcileAction::Delete) => format!("Pool '{name}' would be deleted"),
            (false, ReconcileAction::Create) => format!("Pool '{name}' created"),
            (false, ReconcileAction::Update) => format!("Pool '{name}' updated"),
            (false, ReconcileAction::Delete) => format!("Pool '{name}' deleted"),
        }];
        if !self.report.mismatches.is_empty() {
            lines.push(format!(
                "Diverged fields: {}",
                self.report.mismatches.join(", ")
            ));
        }
        if let Some(status) = &self.report.status {
            lines.push(format!("Last observed status: {status}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(action: ReconcileAction, dry_run: bool) -> ReconcileReport {
        ReconcileReport {
            changed: !matches!(action, ReconcileAction::None),
            action,
            dry_run,
            pool: None,
            mismatches: Vec::new(),
            status: None,
        }
    }

    fn connection(token: Option<&str>) -> ConnectionArgs {
        ConnectionArgs {
            region: "fr-par".to_string(),
            cluster_id: "c1".to_string(),
            token: token.map(str::to_string),
            api_url: None,
        }
    }

    fn settings_with_key(key: &str) -> Settings {
        Settings {
            secret_key: Some(key.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_token_flag_wins_over_config_and_env() {
        let settings = settings_with_key("from-config");
        temp_env::with_var(TOKEN_ENV_VAR, Some("from-env"), || {
            let token = resolve_token(&connection(Some("from-flag")), &settings).unwrap();
            assert_eq!(token, "from-flag");
        });
    }

    #[test]
    fn test_config_token_wins_over_env() {
        let settings = settings_with_key("from-config");
        temp_env::with_var(TOKEN_ENV_VAR, Some("from-env"), || {
            let token = resolve_token(&connection(None), &settings).unwrap();
            assert_eq!(token, "from-config");
        });
    }

    #[test]
    fn test_env_token_is_the_last_fallback() {
        temp_env::with_var(TOKEN_ENV_VAR, Some("from-env"), || {
            let token = resolve_token(&connection(None), &Settings::default()).unwrap();
            assert_eq!(token, "from-env");
        });
    }

    #[test]
    fn test_missing_token_is_a_configuration_error() {
        temp_env::with_var(TOKEN_ENV_VAR, None::<&str>, || {
            let err = resolve_token(&connection(None), &Settings::default()).unwrap_err();
            assert!(matches!(err, ReconcileError::Configuration(_)));
        });
    }

    #[test]
    fn test_wait_args_fill_gaps_from_settings() {
        let args = WaitArgs {
            wait: false,
            no_wait: false,
            wait_timeout: Some(60),
            wait_interval: None,
            debug_poll: true,
        };
        let wait = args.resolve(&Settings::default());
        assert!(wait.enabled);
        assert_eq!(wait.timeout, Duration::from_secs(60));
        assert_eq!(wait.interval, Duration::from_secs(5));
        assert!(wait.debug_observation);
    }

    #[test]
    fn test_no_wait_disables_the_wait() {
        let args = WaitArgs {
            wait: false,
            no_wait: true,
            wait_timeout: None,
            wait_interval: None,
            debug_poll: false,
        };
        assert!(!args.resolve(&Settings::default()).enabled);
    }

    #[test]
    fn test_human_rendering_mentions_diverged_fields() {
        let mut r = report(ReconcileAction::Update, false);
        r.mismatches = vec!["node_type".to_string(), "size".to_string()];
        r.status = Some("ready".to_string());
        let text = ReportOutput::new("workers", r).to_human();
        assert!(text.contains("Pool 'workers' updated"));
        assert!(text.contains("node_type, size"));
        assert!(text.contains("ready"));
    }

    #[test]
    fn test_human_rendering_distinguishes_noop_kinds() {
        let mut present = report(ReconcileAction::None, false);
        present.pool = Some(json!({"id": "p1"}));
        assert!(ReportOutput::new("workers", present)
            .to_human()
            .contains("already matches"));

        let absent = report(ReconcileAction::None, false);
        assert!(ReportOutput::new("workers", absent)
            .to_human()
            .contains("already absent"));
    }

    #[test]
    fn test_json_rendering_flattens_the_report() {
        let value = ReportOutput::new("workers", report(ReconcileAction::Create, true)).to_json();
        assert_eq!(value["pool_name"], "workers");
        assert_eq!(value["action"], "create");
        assert_eq!(value["dry_run"], true);
    }
}
