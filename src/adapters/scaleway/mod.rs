//! Scaleway Kapsule control-plane adapter.

pub mod client;

pub use client::ScalewayClient;
