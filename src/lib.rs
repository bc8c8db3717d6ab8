//! poolctl - Declarative reconciler for Scaleway Kapsule node pools
//!
//! poolctl converges a single node pool toward a caller-supplied declarative
//! spec: it locates the live pool, issues the minimal create/patch/delete,
//! and polls the control plane until the asynchronous backend operation
//! reaches a terminal state.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, error taxonomy, and the `PoolApi`
//!   port the engine talks through
//! - **Service Layer** (`services`): the reconciliation engine — projector,
//!   diff, status heuristics, convergence waiter, and the control loop
//! - **Adapters** (`adapters`): the Scaleway HTTP client and a scripted mock
//! - **Infrastructure Layer** (`infrastructure`): settings loading
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use poolctl::{PoolSpec, Reconciler, TargetState};
//! use poolctl::adapters::scaleway::ScalewayClient;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ScalewayClient::new(
//!         "https://api.scaleway.com",
//!         std::env::var("SCW_SECRET_KEY")?,
//!         std::time::Duration::from_secs(30),
//!     )?;
//!     let spec = PoolSpec::new("fr-par", "project", "cluster", "workers", "DEV1-M");
//!     let report = Reconciler::new(Arc::new(client))
//!         .reconcile(&spec, TargetState::Present, false)
//!         .await?;
//!     println!("changed: {}", report.changed);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ReconcileError, ReconcileResult};
pub use domain::models::{
    ConvergenceOutcome, PoolPayload, PoolSnapshot, PoolSpec, ReconcileAction, ReconcileReport,
    Scaling, TargetState, WaitSettings, WaitVerdict,
};
pub use domain::ports::PoolApi;
pub use infrastructure::config::{ConfigError, ConfigLoader, Settings};
pub use services::{ConvergenceWaiter, Reconciler};
