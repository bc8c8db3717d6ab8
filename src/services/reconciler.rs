//! Reconciliation control flow.
//!
//! One `reconcile` call drives a single pool toward the target state:
//! locate the pool by name, then create, patch, or delete as needed, and
//! optionally wait for the backend to finish the resulting operation. The
//! reconciler issues at most one mutation per invocation.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::domain::errors::{ReconcileError, ReconcileResult};
use crate::domain::models::{
    ConvergenceOutcome, PoolPayload, PoolSnapshot, PoolSpec, ReconcileAction, ReconcileReport,
    TargetState, WaitVerdict,
};
use crate::domain::ports::PoolApi;

use super::diff::mismatched_fields;
use super::projector::project;
use super::waiter::ConvergenceWaiter;

/// Keys included in a debug observation sample.
const OBSERVATION_KEY_LIMIT: usize = 10;

/// Drives one pool toward its declared state.
pub struct Reconciler<A: PoolApi> {
    api: Arc<A>,
}

impl<A: PoolApi> Reconciler<A> {
    /// Create a reconciler over a control-plane client.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Reconcile the pool named by `spec` toward `target`.
    ///
    /// With `dry_run` set, reports what would change without issuing any
    /// mutating call.
    pub async fn reconcile(
        &self,
        spec: &PoolSpec,
        target: TargetState,
        dry_run: bool,
    ) -> ReconcileResult<ReconcileReport> {
        tracing::debug!(pool = %spec.name, target = target.as_str(), dry_run, "reconciling pool");

        let pools = self.api.list_pools(&spec.region, &spec.cluster_id).await?;
        let current = pools
            .into_iter()
            .find(|pool| pool.name() == Some(spec.name.as_str()));

        match target {
            TargetState::Present => self.ensure_present(spec, current, dry_run).await,
            TargetState::Absent => self.ensure_absent(spec, current, dry_run).await,
        }
    }

    async fn ensure_present(
        &self,
        spec: &PoolSpec,
        current: Option<PoolSnapshot>,
        dry_run: bool,
    ) -> ReconcileResult<ReconcileReport> {
        let desired = project(spec);
        match current {
            None => self.create(spec, &desired, dry_run).await,
            Some(live) => self.update(spec, &desired, live, dry_run).await,
        }
    }

    async fn create(
        &self,
        spec: &PoolSpec,
        desired: &PoolPayload,
        dry_run: bool,
    ) -> ReconcileResult<ReconcileReport> {
        if dry_run {
            tracing::info!(pool = %spec.name, "dry run: pool would be created");
            return Ok(ReconcileReport {
                changed: true,
                action: ReconcileAction::Create,
                dry_run: true,
                pool: Some(json!({ "desired": desired })),
                mismatches: Vec::new(),
                status: None,
            });
        }

        tracing::info!(pool = %spec.name, "creating pool");
        let created = self
            .api
            .create_pool(&spec.region, &spec.cluster_id, desired)
            .await?;
        let pool_id = created.id().map(str::to_string);

        let mut status = None;
        let mut observed = None;
        if spec.wait.enabled {
            if let Some(pool_id) = pool_id {
                let outcome = self.wait_ready(spec, &pool_id).await?;
                status = Some(outcome.last_status);
                observed = outcome.last_snapshot.map(PoolSnapshot::into_value);
            } else {
                // The pool was created; there is just nothing to poll.
                tracing::warn!(pool = %spec.name, "create response carries no pool id, skipping wait");
            }
        }

        Ok(ReconcileReport {
            changed: true,
            action: ReconcileAction::Create,
            dry_run: false,
            pool: Some(observed.unwrap_or_else(|| created.into_value())),
            mismatches: Vec::new(),
            status,
        })
    }

    async fn update(
        &self,
        spec: &PoolSpec,
        desired: &PoolPayload,
        live: PoolSnapshot,
        dry_run: bool,
    ) -> ReconcileResult<ReconcileReport> {
        let mismatches = mismatched_fields(&live, desired);
        if mismatches.is_empty() {
            tracing::info!(pool = %spec.name, "pool already matches, nothing to do");
            return Ok(ReconcileReport {
                changed: false,
                action: ReconcileAction::None,
                dry_run,
                pool: Some(live.into_value()),
                mismatches: Vec::new(),
                status: None,
            });
        }
        let mismatch_names: Vec<String> = mismatches.iter().map(|f| (*f).to_string()).collect();
        tracing::info!(pool = %spec.name, fields = ?mismatch_names, "pool diverged");

        if dry_run {
            return Ok(ReconcileReport {
                changed: true,
                action: ReconcileAction::Update,
                dry_run: true,
                pool: Some(json!({ "current": live.into_value(), "desired": desired })),
                mismatches: mismatch_names,
                status: None,
            });
        }

        let pool_id = require_id(&live, &spec.name)?;
        let updated = self
            .api
            .patch_pool(&spec.region, &spec.cluster_id, &pool_id, desired)
            .await?;

        let mut status = None;
        let mut observed = None;
        if spec.wait.enabled {
            let outcome = self.wait_ready(spec, &pool_id).await?;
            status = Some(outcome.last_status);
            observed = outcome.last_snapshot.map(PoolSnapshot::into_value);
        }

        Ok(ReconcileReport {
            changed: true,
            action: ReconcileAction::Update,
            dry_run: false,
            pool: Some(observed.unwrap_or_else(|| updated.into_value())),
            mismatches: mismatch_names,
            status,
        })
    }

    async fn ensure_absent(
        &self,
        spec: &PoolSpec,
        current: Option<PoolSnapshot>,
        dry_run: bool,
    ) -> ReconcileResult<ReconcileReport> {
        let Some(live) = current else {
            tracing::info!(pool = %spec.name, "pool already absent");
            return Ok(ReconcileReport {
                changed: false,
                action: ReconcileAction::None,
                dry_run,
                pool: None,
                mismatches: Vec::new(),
                status: None,
            });
        };

        if dry_run {
            tracing::info!(pool = %spec.name, "dry run: pool would be deleted");
            return Ok(ReconcileReport {
                changed: true,
                action: ReconcileAction::Delete,
                dry_run: true,
                pool: Some(live.into_value()),
                mismatches: Vec::new(),
                status: None,
            });
        }

        let pool_id = require_id(&live, &spec.name)?;
        tracing::info!(pool = %spec.name, %pool_id, "deleting pool");
        self.api
            .delete_pool(&spec.region, &spec.cluster_id, &pool_id)
            .await?;

        let mut status = None;
        if spec.wait.enabled {
            let outcome = self.wait_absent(spec, &pool_id).await?;
            status = Some(outcome.last_status);
        }

        Ok(ReconcileReport {
            changed: true,
            action: ReconcileAction::Delete,
            dry_run: false,
            pool: None,
            mismatches: Vec::new(),
            status,
        })
    }

    async fn wait_ready(
        &self,
        spec: &PoolSpec,
        pool_id: &str,
    ) -> ReconcileResult<ConvergenceOutcome> {
        let waiter =
            ConvergenceWaiter::new(Arc::clone(&self.api), spec.wait.timeout, spec.wait.interval);
        let outcome = waiter
            .until_ready(&spec.region, &spec.cluster_id, pool_id)
            .await?;
        check_verdict(spec, "ready", outcome)
    }

    async fn wait_absent(
        &self,
        spec: &PoolSpec,
        pool_id: &str,
    ) -> ReconcileResult<ConvergenceOutcome> {
        let waiter =
            ConvergenceWaiter::new(Arc::clone(&self.api), spec.wait.timeout, spec.wait.interval);
        let outcome = waiter
            .until_absent(&spec.region, &spec.cluster_id, pool_id)
            .await?;
        check_verdict(spec, "absent", outcome)
    }
}

/// Turn a terminal wait outcome into an error when it did not converge.
fn check_verdict(
    spec: &PoolSpec,
    goal: &'static str,
    outcome: ConvergenceOutcome,
) -> ReconcileResult<ConvergenceOutcome> {
    match outcome.verdict {
        WaitVerdict::Converged | WaitVerdict::Absent => Ok(outcome),
        WaitVerdict::Failed => Err(ReconcileError::ConvergenceFailed {
            name: spec.name.clone(),
            last_status: outcome.last_status.clone(),
            observation: observation(spec, &outcome),
        }),
        WaitVerdict::TimedOut => Err(ReconcileError::ConvergenceTimeout {
            name: spec.name.clone(),
            goal,
            waited_secs: spec.wait.timeout.as_secs(),
            last_status: outcome.status_or_unknown().to_string(),
            observation: observation(spec, &outcome),
        }),
    }
}

/// Truncated snapshot sample for diagnostics, when the spec asked for one.
fn observation(spec: &PoolSpec, outcome: &ConvergenceOutcome) -> Option<Value> {
    if !spec.wait.debug_observation {
        return None;
    }
    outcome
        .last_snapshot
        .as_ref()
        .and_then(|snap| snap.observation_sample(OBSERVATION_KEY_LIMIT))
}

/// Live pools must carry an id before we can address them.
fn require_id(live: &PoolSnapshot, name: &str) -> ReconcileResult<String> {
    live.id()
        .map(str::to_string)
        .ok_or_else(|| ReconcileError::Decode {
            operation: "list pools",
            message: format!("pool '{name}' has no id"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockPoolApi, RecordedCall, ScriptedGet};
    use crate::domain::models::Scaling;
    use serde_json::json;
    use std::time::Duration;

    fn fast_spec() -> PoolSpec {
        let mut spec = PoolSpec::new("fr-par", "proj", "c1", "workers", "DEV1-M");
        spec.scaling = Scaling::Fixed { size: Some(2) };
        spec.wait.timeout = Duration::from_millis(250);
        spec.wait.interval = Duration::from_millis(1);
        spec
    }

    #[tokio::test]
    async fn test_update_requires_a_live_pool_id() {
        // A live pool without an id cannot be addressed for patching.
        let api = Arc::new(MockPoolApi::with_pools(vec![json!({
            "name": "workers",
            "node_type": "GP1-S"
        })]));
        let reconciler = Reconciler::new(Arc::clone(&api));

        let err = reconciler
            .reconcile(&fast_spec(), TargetState::Present, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("has no id"));
    }

    #[tokio::test]
    async fn test_create_without_id_in_response_skips_wait() {
        let api = Arc::new(MockPoolApi::new());
        api.set_create_result(json!({"name": "workers", "status": "creating"}))
            .await;
        let reconciler = Reconciler::new(Arc::clone(&api));

        let report = reconciler
            .reconcile(&fast_spec(), TargetState::Present, false)
            .await
            .unwrap();
        assert!(report.changed);
        assert_eq!(report.action, ReconcileAction::Create);
        assert_eq!(report.status, None);

        // One list, one create, zero polls.
        let calls = api.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], RecordedCall::List);
        assert!(matches!(calls[1], RecordedCall::Create { .. }));
    }

    #[tokio::test]
    async fn test_wait_failure_surfaces_error_with_observation() {
        let api = Arc::new(MockPoolApi::new());
        api.set_create_result(json!({"id": "p9", "name": "workers"}))
            .await;
        api.push_get(ScriptedGet::Found(json!({"id": "p9", "status": "error"})))
            .await;
        let mut spec = fast_spec();
        spec.wait.debug_observation = true;
        let reconciler = Reconciler::new(Arc::clone(&api));

        let err = reconciler
            .reconcile(&spec, TargetState::Present, false)
            .await
            .unwrap_err();
        match err {
            ReconcileError::ConvergenceFailed {
                last_status,
                observation,
                ..
            } => {
                assert_eq!(last_status, "error");
                let sample = observation.expect("debug observation requested");
                assert_eq!(sample["status"], "error");
            }
            other => panic!("expected ConvergenceFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_converged_update_reports_final_snapshot() {
        let api = Arc::new(MockPoolApi::with_pools(vec![json!({
            "id": "p1", "name": "workers", "node_type": "GP1-S",
            "container_runtime": "containerd", "root_volume": {"type": "l_ssd"},
            "autohealing": true, "autoscaling": false, "size": 2
        })]));
        api.set_patch_result(json!({"id": "p1", "name": "workers", "status": "scaling"}))
            .await;
        api.push_get(ScriptedGet::Found(
            json!({"id": "p1", "name": "workers", "status": "ready", "node_type": "DEV1-M"}),
        ))
        .await;
        let reconciler = Reconciler::new(Arc::clone(&api));

        let report = reconciler
            .reconcile(&fast_spec(), TargetState::Present, false)
            .await
            .unwrap();
        assert!(report.changed);
        assert_eq!(report.action, ReconcileAction::Update);
        assert_eq!(report.mismatches, vec!["node_type".to_string()]);
        assert_eq!(report.status.as_deref(), Some("ready"));
        // The report carries the freshest snapshot, not the patch response.
        assert_eq!(report.pool.unwrap()["status"], "ready");
    }
}
