//! Adapters for external systems.

pub mod mock;
pub mod scaleway;
