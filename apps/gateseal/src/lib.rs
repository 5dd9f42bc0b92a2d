//! # GateSeal Tooling Library
//!
//! This library exposes the tooling modules for testing and
//! integration. The main binary uses them through the `main.rs` entry
//! point.

pub mod cli;
pub mod env;
pub mod record;
pub mod store;

// Re-export gateseal_core for convenience
pub use gateseal_core;
