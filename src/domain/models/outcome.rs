//! Reconciliation outcome records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::snapshot::PoolSnapshot;

/// Terminal verdict of one wait cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitVerdict {
    /// The pool reached a converged state.
    Converged,
    /// The pool reported a terminal failure status.
    Failed,
    /// The deadline passed while the pool was still in flight.
    TimedOut,
    /// The pool is gone. Only produced by until-absent waits.
    Absent,
}

/// Result of one wait cycle: the verdict plus the evidence behind it.
#[derive(Debug, Clone)]
pub struct ConvergenceOutcome {
    /// How the wait ended.
    pub verdict: WaitVerdict,
    /// Last non-empty status token observed; empty when none was ever seen.
    pub last_status: String,
    /// Last snapshot fetched, kept for diagnostics.
    pub last_snapshot: Option<PoolSnapshot>,
}

impl ConvergenceOutcome {
    /// The last status token, or `unknown` when nothing was observed.
    pub fn status_or_unknown(&self) -> &str {
        if self.last_status.is_empty() {
            "unknown"
        } else {
            &self.last_status
        }
    }
}

/// The mutation a reconciliation run performed (or would perform).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    /// The live pool already matched; nothing was sent.
    None,
    /// The pool did not exist and was created.
    Create,
    /// The pool existed but diverged and was patched.
    Update,
    /// The pool existed and was deleted.
    Delete,
}

impl ReconcileAction {
    /// Lowercase token for logs and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Outbound record of a reconciliation run.
///
/// Rendered by the CLI as human-readable text or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// Whether a mutation was issued, or would be in dry-run mode.
    pub changed: bool,
    /// The action taken (or planned, in dry-run mode).
    pub action: ReconcileAction,
    /// Whether this run was a dry run that skipped all mutations.
    pub dry_run: bool,
    /// The pool document after the operation. For a planned update this
    /// holds both the current document and the desired payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<Value>,
    /// Field names that diverged when an update happened or was planned.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mismatches: Vec<String>,
    /// Last status observed by the convergence wait, when one ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
