//! Domain models for pool reconciliation.

pub mod outcome;
pub mod payload;
pub mod pool;
pub mod snapshot;

pub use outcome::{ConvergenceOutcome, ReconcileAction, ReconcileReport, WaitVerdict};
pub use payload::{PoolPayload, RootVolume};
pub use pool::{PoolSpec, Scaling, TargetState, WaitSettings};
pub use snapshot::PoolSnapshot;
