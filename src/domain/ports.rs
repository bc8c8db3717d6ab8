use async_trait::async_trait;

use super::errors::ReconcileResult;
use super::models::{PoolPayload, PoolSnapshot};

/// Control-plane interface for node pool operations
///
/// This trait defines the contract the reconciler needs from the backend.
/// The production implementation speaks HTTP to the Kapsule API; tests
/// substitute a scripted mock.
#[async_trait]
pub trait PoolApi: Send + Sync {
    /// List every pool attached to a cluster
    ///
    /// # Returns
    /// * `Ok(Vec<PoolSnapshot>)` - pools in backend order, empty when the
    ///   cluster has none or the response shape is unrecognized
    /// * `Err(ReconcileError)` on transport failure or non-2xx response
    async fn list_pools(
        &self,
        region: &str,
        cluster_id: &str,
    ) -> ReconcileResult<Vec<PoolSnapshot>>;

    /// Fetch one pool by id
    ///
    /// A 404 maps to `Ok(None)`, distinguished from failure on purpose:
    /// callers read it as "gone" after a delete and as "not visible yet"
    /// while a freshly created pool propagates.
    async fn get_pool(
        &self,
        region: &str,
        cluster_id: &str,
        pool_id: &str,
    ) -> ReconcileResult<Option<PoolSnapshot>>;

    /// Create a pool from a projected payload
    ///
    /// # Returns
    /// * `Ok(PoolSnapshot)` - the created pool, envelope already stripped
    /// * `Err(ReconcileError)` on any non-2xx response
    async fn create_pool(
        &self,
        region: &str,
        cluster_id: &str,
        payload: &PoolPayload,
    ) -> ReconcileResult<PoolSnapshot>;

    /// Apply a projected payload to an existing pool
    async fn patch_pool(
        &self,
        region: &str,
        cluster_id: &str,
        pool_id: &str,
        payload: &PoolPayload,
    ) -> ReconcileResult<PoolSnapshot>;

    /// Delete a pool
    ///
    /// Succeeds when the backend confirms (2xx) or when the pool is already
    /// gone (404); deletion is idempotent.
    async fn delete_pool(
        &self,
        region: &str,
        cluster_id: &str,
        pool_id: &str,
    ) -> ReconcileResult<()>;
}
