//! Domain layer for the pool reconciler.
//!
//! This module contains the core data model, the error taxonomy, and the
//! port through which the reconciler talks to a control plane.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{ReconcileError, ReconcileResult};
