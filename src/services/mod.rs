//! The reconciliation engine.
//!
//! Pure pieces (`projector`, `diff`, `status`) plus the two drivers that
//! talk to the control plane (`waiter`, `reconciler`).

pub mod diff;
pub mod projector;
pub mod reconciler;
pub mod status;
pub mod waiter;

pub use reconciler::Reconciler;
pub use waiter::ConvergenceWaiter;
