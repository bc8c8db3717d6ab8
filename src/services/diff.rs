//! Live-vs-desired divergence detection.
//!
//! Compares a live pool document against a projected payload field by field
//! and reports the names of the ones that differ. The reconciler patches
//! exactly when the set is non-empty, so every rule here directly gates a
//! mutation.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::domain::models::{PoolPayload, PoolSnapshot};

use super::status::truthy;

/// Whether the live pool already satisfies the desired payload.
pub fn matches(live: &PoolSnapshot, desired: &PoolPayload) -> bool {
    mismatched_fields(live, desired).is_empty()
}

/// Names of the fields where the live pool diverges from the desired
/// payload. Empty means converged.
///
/// Divergence rules follow the payload shape: strings compare literal,
/// flags compare by truthiness (the API has returned `"true"` strings in
/// the past and a missing flag reads as false), counters compare as
/// integers and only within the active scaling mode, and tags compare as
/// sets. `project_id` is consumed at creation and never diffed.
pub fn mismatched_fields(live: &PoolSnapshot, desired: &PoolPayload) -> BTreeSet<&'static str> {
    let mut out = BTreeSet::new();

    if live_str(live, "name") != Some(desired.name.as_str()) {
        out.insert("name");
    }
    if live_str(live, "node_type") != Some(desired.node_type.as_str()) {
        out.insert("node_type");
    }
    if live_str(live, "container_runtime") != Some(desired.container_runtime.as_str()) {
        out.insert("container_runtime");
    }

    if live.get_path(&["root_volume", "type"]).and_then(Value::as_str)
        != Some(desired.root_volume.volume_type.as_str())
    {
        out.insert("root_volume.type");
    }
    if let Some(want) = desired.root_volume.size {
        if live.get_path(&["root_volume", "size"]).and_then(Value::as_u64) != Some(want) {
            out.insert("root_volume.size");
        }
    }

    if live_flag(live, "autoscaling") != desired.autoscaling {
        out.insert("autoscaling");
    }
    if desired.autoscaling {
        if let Some(want) = desired.min_size {
            if live_count(live, "min_size") != Some(want) {
                out.insert("min_size");
            }
        }
        if let Some(want) = desired.max_size {
            if live_count(live, "max_size") != Some(want) {
                out.insert("max_size");
            }
        }
    } else if let Some(want) = desired.size {
        if live_count(live, "size") != Some(want) {
            out.insert("size");
        }
    }

    if live_flag(live, "autohealing") != desired.autohealing {
        out.insert("autohealing");
    }
    if live_flag(live, "public_ip_disabled") != desired.public_ip_disabled {
        out.insert("public_ip_disabled");
    }

    if let Some(want) = &desired.tags {
        let mut want_sorted = want.clone();
        want_sorted.sort();
        if live_tags(live) != want_sorted {
            out.insert("tags");
        }
    }

    out
}

fn live_str<'a>(live: &'a PoolSnapshot, key: &str) -> Option<&'a str> {
    live.get(key).and_then(Value::as_str)
}

fn live_flag(live: &PoolSnapshot, key: &str) -> bool {
    live.get(key).is_some_and(truthy)
}

fn live_count(live: &PoolSnapshot, key: &str) -> Option<u64> {
    live.get(key).and_then(Value::as_u64)
}

/// Live tags as a sorted list; a missing field is an empty list.
fn live_tags(live: &PoolSnapshot) -> Vec<String> {
    let mut tags: Vec<String> = live
        .get("tags")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    tags.sort();
    tags
}
