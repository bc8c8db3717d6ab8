//! Declarative node pool model.
//!
//! A [`PoolSpec`] is the caller's statement of intent: one pool, identified
//! by cluster and name, together with the sizing and runtime settings it
//! should converge to. Specs are built once per invocation and never mutated
//! afterwards.

use std::time::Duration;

/// Sizing mode for a pool.
///
/// The two modes are mutually exclusive by construction: a fixed-size pool
/// never carries autoscaler bounds and an autoscaled pool never carries a
/// fixed size. Sending both confuses the backend, so the type makes the
/// combination unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scaling {
    /// A fixed node count. `None` leaves the current count untouched.
    Fixed {
        /// Desired node count, when declared.
        size: Option<u64>,
    },
    /// Sizing delegated to the cluster autoscaler, within optional bounds.
    Autoscaling {
        /// Lower bound on node count, when declared.
        min_size: Option<u64>,
        /// Upper bound on node count, when declared.
        max_size: Option<u64>,
    },
}

impl Scaling {
    /// Whether this pool delegates sizing to the autoscaler.
    pub const fn is_autoscaling(&self) -> bool {
        matches!(self, Self::Autoscaling { .. })
    }
}

impl Default for Scaling {
    fn default() -> Self {
        Self::Fixed { size: None }
    }
}

/// The state the caller wants the pool to end up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// The pool should exist and match the spec.
    Present,
    /// The pool should not exist.
    Absent,
}

impl TargetState {
    /// Lowercase token for logs and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

/// Controls for the post-mutation convergence wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitSettings {
    /// Whether to wait at all. When false, mutations return immediately.
    pub enabled: bool,
    /// Total budget for the wait before giving up.
    pub timeout: Duration,
    /// Fixed pause between two status probes.
    pub interval: Duration,
    /// Attach a truncated snapshot sample to convergence errors.
    pub debug_observation: bool,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: Duration::from_secs(600),
            interval: Duration::from_secs(5),
            debug_observation: false,
        }
    }
}

/// Desired state of a single node pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSpec {
    /// Region the cluster lives in (e.g. `fr-par`).
    pub region: String,
    /// Project owning the pool. Sent on create, never diffed afterwards.
    pub project_id: String,
    /// Cluster the pool belongs to.
    pub cluster_id: String,
    /// Pool name, the identity used to locate the live resource.
    pub name: String,
    /// Commercial node type (e.g. `DEV1-M`).
    pub node_type: String,
    /// Fixed size or autoscaler bounds.
    pub scaling: Scaling,
    /// Container runtime for the nodes.
    pub container_runtime: String,
    /// Root volume class for the nodes.
    pub root_volume_type: String,
    /// Root volume size in gigabytes. `None` accepts the backend default.
    pub root_volume_size: Option<u64>,
    /// Whether the backend replaces unhealthy nodes automatically.
    pub autohealing: bool,
    /// Whether nodes are created without a public IP.
    pub public_ip_disabled: bool,
    /// Free-form labels. An empty list is treated as "not declared".
    pub tags: Vec<String>,
    /// Convergence wait controls.
    pub wait: WaitSettings,
}

impl PoolSpec {
    /// Builds a spec with the backend's documented defaults. Callers adjust
    /// the remaining public fields directly.
    pub fn new(
        region: impl Into<String>,
        project_id: impl Into<String>,
        cluster_id: impl Into<String>,
        name: impl Into<String>,
        node_type: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            project_id: project_id.into(),
            cluster_id: cluster_id.into(),
            name: name.into(),
            node_type: node_type.into(),
            scaling: Scaling::default(),
            container_runtime: "containerd".to_string(),
            root_volume_type: "l_ssd".to_string(),
            root_volume_size: None,
            autohealing: true,
            public_ip_disabled: false,
            tags: Vec::new(),
            wait: WaitSettings::default(),
        }
    }
}
