//! Spec projection.
//!
//! Turns a [`PoolSpec`] into the payload the control plane accepts.
//! Projection is pure: the same spec always yields the same payload, and the
//! payload is rebuilt from scratch on every reconciliation attempt.

use crate::domain::models::{PoolPayload, PoolSpec, RootVolume, Scaling};

/// Project a spec into the request body for create and patch calls.
///
/// Fields the spec leaves undeclared are omitted entirely so the backend
/// applies its own defaults. The scaling mode decides which sizing fields
/// appear: a fixed pool carries `size`, an autoscaled pool carries the
/// bounds, never both. The backend rejects mixed sizing, so the exclusion
/// is load-bearing, not cosmetic.
pub fn project(spec: &PoolSpec) -> PoolPayload {
    let (autoscaling, size, min_size, max_size) = match spec.scaling {
        Scaling::Fixed { size } => (false, size, None, None),
        Scaling::Autoscaling { min_size, max_size } => (true, None, min_size, max_size),
    };

    PoolPayload {
        name: spec.name.clone(),
        node_type: spec.node_type.clone(),
        container_runtime: spec.container_runtime.clone(),
        root_volume: RootVolume {
            volume_type: spec.root_volume_type.clone(),
            size: spec.root_volume_size,
        },
        autohealing: spec.autohealing,
        public_ip_disabled: spec.public_ip_disabled,
        project_id: spec.project_id.clone(),
        autoscaling,
        size,
        min_size,
        max_size,
        tags: if spec.tags.is_empty() {
            None
        } else {
            Some(spec.tags.clone())
        },
    }
}
