//! Status extraction and readiness classification.
//!
//! The control plane reports pool health in several shapes depending on API
//! vintage and endpoint: a scalar status, a nested status object, Kubernetes
//! style condition lists, a bare `ready` boolean, size counters, or an
//! explicit node array. Extraction runs an ordered chain of typed strategies
//! over the snapshot and stops at the first one that resolves; classification
//! folds the extracted token and the structural signals into one verdict.

use serde_json::Value;

use crate::domain::models::PoolSnapshot;

/// Status tokens that mean the pool has converged.
pub const READY_VALUES: [&str; 5] = ["ready", "available", "running", "active", "stable"];

/// Status tokens that mean the pool has terminally failed.
pub const FAIL_VALUES: [&str; 3] = ["error", "failed", "degraded"];

/// Top-level keys that may carry the pool status, in lookup order.
const TOP_LEVEL_STATUS_KEYS: [&str; 3] = ["status", "pool_status", "phase"];

/// Sub-keys searched inside a status object, in lookup order.
const NESTED_STATUS_KEYS: [&str; 4] = ["name", "state", "phase", "status"];

/// Keys that may carry a condition list, in lookup order.
const CONDITION_KEYS: [&str; 3] = ["conditions", "pool_conditions", "node_pool_conditions"];

/// Verdict for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// At least one converged signal fired and nothing failed.
    Converged,
    /// The status token names a terminal failure.
    Failed,
    /// Nothing terminal observed yet; keep polling.
    Pending,
}

/// Truthiness for loosely typed API fields: native `true`, the number 1, or
/// one of the accepted string tokens (case-insensitive).
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => matches!(
            s.to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "ready"
        ),
        _ => false,
    }
}

/// Extract a lowercase status token from a pool document.
///
/// Strategies run in order: top-level status keys (scalar string or status
/// object), then Ready-type condition lists, then a bare `ready` flag. An
/// empty string means no strategy recognized anything. Total over arbitrary
/// documents; never panics.
pub fn extract_status(pool: &PoolSnapshot) -> String {
    if let Some(token) = top_level_status(pool) {
        return token;
    }
    if ready_condition(pool) {
        return "ready".to_string();
    }
    if pool.get("ready").is_some_and(truthy) {
        return "ready".to_string();
    }
    String::new()
}

/// First token resolved from the top-level status keys.
fn top_level_status(pool: &PoolSnapshot) -> Option<String> {
    TOP_LEVEL_STATUS_KEYS
        .iter()
        .find_map(|key| pool.get(key).and_then(status_token))
}

/// Token from a status value: a string is used as-is (lowercased), an object
/// is searched for the known sub-keys. Other value types resolve nothing, so
/// the caller's chain continues.
fn status_token(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Object(map) => NESTED_STATUS_KEYS.iter().find_map(|key| {
            map.get(*key)
                .and_then(Value::as_str)
                .map(str::to_lowercase)
        }),
        _ => None,
    }
}

/// Whether any condition list carries a truthy Ready-type entry.
fn ready_condition(pool: &PoolSnapshot) -> bool {
    CONDITION_KEYS.iter().any(|key| {
        pool.get(key)
            .and_then(Value::as_array)
            .is_some_and(|conds| conds.iter().any(is_ready_condition))
    })
}

fn is_ready_condition(cond: &Value) -> bool {
    let ready_type = cond
        .get("type")
        .and_then(Value::as_str)
        .is_some_and(|t| t.eq_ignore_ascii_case("ready"));
    ready_type && cond.get("status").is_some_and(truthy)
}

/// Classify a snapshot into a readiness verdict.
///
/// A failed status token wins over every converged signal: a pool reporting
/// `error` is failed even when its node counts look satisfied or its node
/// list looks healthy.
pub fn classify(pool: &PoolSnapshot) -> Readiness {
    let status = extract_status(pool);
    if FAIL_VALUES.contains(&status.as_str()) {
        return Readiness::Failed;
    }
    if READY_VALUES.contains(&status.as_str()) || sizes_reached(pool) || nodes_ready(pool) {
        return Readiness::Converged;
    }
    Readiness::Pending
}

/// Whether the backend reports the desired node count as reached.
///
/// Counter field names vary by API vintage, so the first key that yields an
/// integer wins on each side; an explicit zero counts. When no current
/// counter exists, the length of an explicit `nodes` array stands in.
pub fn sizes_reached(pool: &PoolSnapshot) -> bool {
    let desired = first_count(pool, &["desired_size", "desiredNodes", "size"]);
    let current = first_count(pool, &["current_size", "currentNodes", "size"]).or_else(|| {
        pool.get("nodes")
            .and_then(Value::as_array)
            .map(|nodes| i64::try_from(nodes.len()).unwrap_or(i64::MAX))
    });
    match (desired, current) {
        (Some(desired), Some(current)) => current >= desired,
        _ => false,
    }
}

/// First key among `keys` that resolves to an integer.
fn first_count(pool: &PoolSnapshot, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| pool.get(key).and_then(count_value))
}

/// Integer from a JSON number or a numeric string.
fn count_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Whether every node in an explicit node list looks ready.
///
/// Empty or missing lists never converge by this path. A single failed node
/// sinks the whole check even when later nodes are ready; a node counts as
/// ready on a recognized status token or on a truthy Ready condition.
pub fn nodes_ready(pool: &PoolSnapshot) -> bool {
    let nodes = ["nodes", "node_pool_nodes"].iter().find_map(|key| {
        pool.get(key)
            .and_then(Value::as_array)
            .filter(|list| !list.is_empty())
    });
    let Some(nodes) = nodes else {
        return false;
    };

    let mut all_ready = true;
    for node in nodes {
        let status = node
            .get("status")
            .and_then(status_token)
            .unwrap_or_default();
        if FAIL_VALUES.contains(&status.as_str()) {
            return false;
        }
        if READY_VALUES.contains(&status.as_str()) {
            continue;
        }
        if node_ready_condition(node) {
            continue;
        }
        all_ready = false;
    }
    all_ready
}

/// Whether the first Ready-type condition on a node is truthy.
fn node_ready_condition(node: &Value) -> bool {
    let Some(conds) = node.get("conditions").and_then(Value::as_array) else {
        return false;
    };
    conds
        .iter()
        .find(|cond| {
            cond.get("type")
                .and_then(Value::as_str)
                .is_some_and(|t| t.eq_ignore_ascii_case("ready"))
        })
        .and_then(|cond| cond.get("status"))
        .is_some_and(truthy)
}
