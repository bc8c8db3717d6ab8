//! Request payload projected from a [`PoolSpec`](super::pool::PoolSpec).

use serde::{Deserialize, Serialize};

/// Root volume section of a pool payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootVolume {
    /// Volume class, e.g. `l_ssd`.
    #[serde(rename = "type")]
    pub volume_type: String,
    /// Size in gigabytes. Omitted from the wire form to accept the backend
    /// default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// JSON body sent on pool create and patch.
///
/// Built fresh from the spec on every reconciliation attempt and never
/// persisted. Optional fields are skipped entirely when unset so the backend
/// applies its own defaults instead of receiving explicit nulls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPayload {
    /// Pool name.
    pub name: String,
    /// Commercial node type.
    pub node_type: String,
    /// Container runtime for the nodes.
    pub container_runtime: String,
    /// Root volume class and optional size.
    pub root_volume: RootVolume,
    /// Automatic replacement of unhealthy nodes.
    pub autohealing: bool,
    /// Nodes created without a public IP.
    pub public_ip_disabled: bool,
    /// Owning project. Consumed on create, ignored by the backend on patch.
    pub project_id: String,
    /// Whether the autoscaler manages this pool.
    pub autoscaling: bool,
    /// Fixed node count. Only present when autoscaling is off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Autoscaler lower bound. Only present when autoscaling is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    /// Autoscaler upper bound. Only present when autoscaling is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    /// Labels, omitted when the spec declared none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_payload() -> PoolPayload {
        PoolPayload {
            name: "workers".to_string(),
            node_type: "DEV1-M".to_string(),
            container_runtime: "containerd".to_string(),
            root_volume: RootVolume {
                volume_type: "l_ssd".to_string(),
                size: None,
            },
            autohealing: true,
            public_ip_disabled: false,
            project_id: "proj".to_string(),
            autoscaling: false,
            size: Some(2),
            min_size: None,
            max_size: None,
            tags: None,
        }
    }

    #[test]
    fn test_unset_fields_are_absent_from_wire_form() {
        let value = serde_json::to_value(minimal_payload()).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("min_size"));
        assert!(!obj.contains_key("max_size"));
        assert!(!obj.contains_key("tags"));
        assert!(!obj["root_volume"].as_object().unwrap().contains_key("size"));
        assert_eq!(value["size"], 2);
        assert_eq!(value["autoscaling"], false);
    }

    #[test]
    fn test_root_volume_type_uses_api_field_name() {
        let value = serde_json::to_value(minimal_payload()).unwrap();
        assert_eq!(value["root_volume"]["type"], "l_ssd");
    }
}
