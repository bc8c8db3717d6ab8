//! Mock pool API for testing.
//!
//! Scripts the control plane deterministically: a fixed list response, a
//! consumable queue of fetch outcomes with a sticky fallback, and canned
//! create/patch responses. Every call is recorded so tests can assert on
//! exactly which mutations a reconciliation issued.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::errors::{ReconcileError, ReconcileResult};
use crate::domain::models::{PoolPayload, PoolSnapshot};
use crate::domain::ports::PoolApi;

/// One scripted outcome for a `get_pool` call.
#[derive(Debug, Clone)]
pub enum ScriptedGet {
    /// The pool exists; the given document is returned.
    Found(Value),
    /// The backend answers 404.
    Missing,
    /// The request fails at the transport level.
    TransportError(String),
}

/// A call observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// `list_pools` was invoked.
    List,
    /// `get_pool` was invoked for this id.
    Get {
        /// Pool id that was fetched.
        pool_id: String,
    },
    /// `create_pool` was invoked with this payload.
    Create {
        /// Payload as the caller sent it.
        payload: PoolPayload,
    },
    /// `patch_pool` was invoked for this id with this payload.
    Patch {
        /// Pool id that was patched.
        pool_id: String,
        /// Payload as the caller sent it.
        payload: PoolPayload,
    },
    /// `delete_pool` was invoked for this id.
    Delete {
        /// Pool id that was deleted.
        pool_id: String,
    },
}

#[derive(Debug)]
struct MockState {
    list_result: Vec<Value>,
    get_script: VecDeque<ScriptedGet>,
    get_fallback: ScriptedGet,
    create_result: Option<Value>,
    patch_result: Option<Value>,
    calls: Vec<RecordedCall>,
}

/// Scripted in-memory implementation of [`PoolApi`].
#[derive(Debug, Clone)]
pub struct MockPoolApi {
    state: Arc<Mutex<MockState>>,
}

impl MockPoolApi {
    /// Create a mock with no pools and 404 on every fetch.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                list_result: Vec::new(),
                get_script: VecDeque::new(),
                get_fallback: ScriptedGet::Missing,
                create_result: None,
                patch_result: None,
                calls: Vec::new(),
            })),
        }
    }

    /// Create a mock whose `list_pools` returns the given documents.
    pub fn with_pools(pools: Vec<Value>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                list_result: pools,
                get_script: VecDeque::new(),
                get_fallback: ScriptedGet::Missing,
                create_result: None,
                patch_result: None,
                calls: Vec::new(),
            })),
        }
    }

    /// Set the documents `list_pools` returns.
    pub async fn set_pools(&self, pools: Vec<Value>) {
        self.state.lock().await.list_result = pools;
    }

    /// Queue one fetch outcome; consumed in FIFO order.
    pub async fn push_get(&self, outcome: ScriptedGet) {
        self.state.lock().await.get_script.push_back(outcome);
    }

    /// Outcome returned once the queue is exhausted (default: 404).
    pub async fn set_get_fallback(&self, outcome: ScriptedGet) {
        self.state.lock().await.get_fallback = outcome;
    }

    /// Document returned by `create_pool`.
    pub async fn set_create_result(&self, doc: Value) {
        self.state.lock().await.create_result = Some(doc);
    }

    /// Document returned by `patch_pool`.
    pub async fn set_patch_result(&self, doc: Value) {
        self.state.lock().await.patch_result = Some(doc);
    }

    /// All calls observed so far.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().await.calls.clone()
    }

    /// Number of `get_pool` calls observed so far.
    pub async fn get_count(&self) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| matches!(c, RecordedCall::Get { .. }))
            .count()
    }

    fn resolve_get(state: &mut MockState) -> ScriptedGet {
        state
            .get_script
            .pop_front()
            .unwrap_or_else(|| state.get_fallback.clone())
    }
}

impl Default for MockPoolApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PoolApi for MockPoolApi {
    async fn list_pools(
        &self,
        _region: &str,
        _cluster_id: &str,
    ) -> ReconcileResult<Vec<PoolSnapshot>> {
        let mut state = self.state.lock().await;
        state.calls.push(RecordedCall::List);
        Ok(state
            .list_result
            .iter()
            .cloned()
            .map(PoolSnapshot::from_value)
            .collect())
    }

    async fn get_pool(
        &self,
        _region: &str,
        _cluster_id: &str,
        pool_id: &str,
    ) -> ReconcileResult<Option<PoolSnapshot>> {
        let mut state = self.state.lock().await;
        state.calls.push(RecordedCall::Get {
            pool_id: pool_id.to_string(),
        });
        match Self::resolve_get(&mut state) {
            ScriptedGet::Found(doc) => Ok(Some(PoolSnapshot::from_value(doc))),
            ScriptedGet::Missing => Ok(None),
            ScriptedGet::TransportError(message) => Err(ReconcileError::Request {
                operation: "get pool",
                message,
            }),
        }
    }

    async fn create_pool(
        &self,
        _region: &str,
        _cluster_id: &str,
        payload: &PoolPayload,
    ) -> ReconcileResult<PoolSnapshot> {
        let mut state = self.state.lock().await;
        state.calls.push(RecordedCall::Create {
            payload: payload.clone(),
        });
        state
            .create_result
            .clone()
            .map(PoolSnapshot::from_value)
            .ok_or_else(|| ReconcileError::Request {
                operation: "create pool",
                message: "no scripted create response".to_string(),
            })
    }

    async fn patch_pool(
        &self,
        _region: &str,
        _cluster_id: &str,
        pool_id: &str,
        payload: &PoolPayload,
    ) -> ReconcileResult<PoolSnapshot> {
        let mut state = self.state.lock().await;
        state.calls.push(RecordedCall::Patch {
            pool_id: pool_id.to_string(),
            payload: payload.clone(),
        });
        state
            .patch_result
            .clone()
            .map(PoolSnapshot::from_value)
            .ok_or_else(|| ReconcileError::Request {
                operation: "patch pool",
                message: "no scripted patch response".to_string(),
            })
    }

    async fn delete_pool(
        &self,
        _region: &str,
        _cluster_id: &str,
        pool_id: &str,
    ) -> ReconcileResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(RecordedCall::Delete {
            pool_id: pool_id.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_script_consumed_in_order_then_fallback() {
        let mock = MockPoolApi::new();
        mock.push_get(ScriptedGet::Found(json!({"id": "p1", "status": "creating"})))
            .await;
        mock.push_get(ScriptedGet::Missing).await;

        let first = mock.get_pool("fr-par", "c1", "p1").await.unwrap();
        assert_eq!(first.unwrap().get("status"), Some(&json!("creating")));

        assert!(mock.get_pool("fr-par", "c1", "p1").await.unwrap().is_none());
        // Queue exhausted; default fallback is 404.
        assert!(mock.get_pool("fr-par", "c1", "p1").await.unwrap().is_none());
        assert_eq!(mock.get_count().await, 3);
    }

    #[tokio::test]
    async fn test_fallback_repeats_indefinitely() {
        let mock = MockPoolApi::new();
        mock.set_get_fallback(ScriptedGet::Found(json!({"status": "creating"})))
            .await;

        for _ in 0..5 {
            let snap = mock.get_pool("fr-par", "c1", "p1").await.unwrap().unwrap();
            assert_eq!(snap.get("status"), Some(&json!("creating")));
        }
    }

    #[tokio::test]
    async fn test_transport_error_is_scripted() {
        let mock = MockPoolApi::new();
        mock.push_get(ScriptedGet::TransportError("connection reset".to_string()))
            .await;

        let err = mock.get_pool("fr-par", "c1", "p1").await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_calls_are_recorded_in_order() {
        let mock = MockPoolApi::new();
        mock.list_pools("fr-par", "c1").await.unwrap();
        mock.delete_pool("fr-par", "c1", "p1").await.unwrap();

        let calls = mock.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], RecordedCall::List);
        assert_eq!(
            calls[1],
            RecordedCall::Delete {
                pool_id: "p1".to_string()
            }
        );
    }
}
