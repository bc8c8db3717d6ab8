//! Infrastructure layer
//!
//! Settings loading and validation. The HTTP integration itself lives in
//! `adapters`, behind the domain's `PoolApi` port.

pub mod config;

pub use config::{ConfigError, ConfigLoader, Settings};
