//! Convergence waiting.
//!
//! Polls a pool at a fixed interval until it converges, fails, disappears,
//! or the deadline passes. The waiter never decides what a verdict means
//! for the caller; it only observes and reports.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::errors::ReconcileResult;
use crate::domain::models::{ConvergenceOutcome, PoolSnapshot, WaitVerdict};
use crate::domain::ports::PoolApi;

use super::status::{classify, extract_status, Readiness};

/// Fixed-interval poller for a single pool.
pub struct ConvergenceWaiter<A: PoolApi> {
    api: Arc<A>,
    timeout: Duration,
    interval: Duration,
}

impl<A: PoolApi> ConvergenceWaiter<A> {
    /// Create a waiter with a total budget and a pause between probes.
    pub fn new(api: Arc<A>, timeout: Duration, interval: Duration) -> Self {
        Self {
            api,
            timeout,
            interval,
        }
    }

    /// Poll until the pool converges or fails.
    ///
    /// A 404 while polling is propagation delay, not an error: freshly
    /// created pools can take a few probes to become visible, so the loop
    /// keeps going. A transport error aborts the wait and propagates.
    pub async fn until_ready(
        &self,
        region: &str,
        cluster_id: &str,
        pool_id: &str,
    ) -> ReconcileResult<ConvergenceOutcome> {
        let deadline = Instant::now() + self.timeout;
        let mut last_status = String::new();
        let mut last_snapshot: Option<PoolSnapshot> = None;
        let mut attempt: u32 = 0;

        while Instant::now() < deadline {
            attempt += 1;
            let Some(snapshot) = self.api.get_pool(region, cluster_id, pool_id).await? else {
                tracing::debug!(attempt, pool_id, "pool not visible yet");
                tokio::time::sleep(self.interval).await;
                continue;
            };

            let status = extract_status(&snapshot);
            if !status.is_empty() {
                last_status.clone_from(&status);
            }

            match classify(&snapshot) {
                Readiness::Failed => {
                    tracing::warn!(attempt, pool_id, status = %status, "pool reported failure");
                    return Ok(ConvergenceOutcome {
                        verdict: WaitVerdict::Failed,
                        last_status: status,
                        last_snapshot: Some(snapshot),
                    });
                }
                Readiness::Converged => {
                    tracing::info!(attempt, pool_id, status = %status, "pool converged");
                    let last_status = if status.is_empty() {
                        // Converged through sizes or node health alone.
                        "ready".to_string()
                    } else {
                        status
                    };
                    return Ok(ConvergenceOutcome {
                        verdict: WaitVerdict::Converged,
                        last_status,
                        last_snapshot: Some(snapshot),
                    });
                }
                Readiness::Pending => {
                    tracing::debug!(attempt, pool_id, status = %status, "pool still converging");
                    last_snapshot = Some(snapshot);
                    tokio::time::sleep(self.interval).await;
                }
            }
        }

        tracing::warn!(attempt, pool_id, status = %last_status, "wait budget exhausted");
        Ok(ConvergenceOutcome {
            verdict: WaitVerdict::TimedOut,
            last_status,
            last_snapshot,
        })
    }

    /// Poll until the pool is gone.
    ///
    /// Any snapshot at all means teardown is still in progress; only a 404
    /// is terminal here.
    pub async fn until_absent(
        &self,
        region: &str,
        cluster_id: &str,
        pool_id: &str,
    ) -> ReconcileResult<ConvergenceOutcome> {
        let deadline = Instant::now() + self.timeout;
        let mut last_status = String::new();
        let mut last_snapshot: Option<PoolSnapshot> = None;
        let mut attempt: u32 = 0;

        while Instant::now() < deadline {
            attempt += 1;
            match self.api.get_pool(region, cluster_id, pool_id).await? {
                None => {
                    tracing::info!(attempt, pool_id, "pool is gone");
                    return Ok(ConvergenceOutcome {
                        verdict: WaitVerdict::Absent,
                        last_status: "absent".to_string(),
                        last_snapshot: None,
                    });
                }
                Some(snapshot) => {
                    let status = extract_status(&snapshot);
                    if !status.is_empty() {
                        last_status = status;
                    }
                    tracing::debug!(attempt, pool_id, "pool still present");
                    last_snapshot = Some(snapshot);
                    tokio::time::sleep(self.interval).await;
                }
            }
        }

        tracing::warn!(attempt, pool_id, "pool still present at deadline");
        Ok(ConvergenceOutcome {
            verdict: WaitVerdict::TimedOut,
            last_status,
            last_snapshot,
        })
    }
}
