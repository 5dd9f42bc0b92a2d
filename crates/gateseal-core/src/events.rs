//! # Notification Events
//!
//! Structured records produced by state transitions. The core returns
//! them to the caller; the app layer decides whether to log, persist,
//! or ignore them.

use crate::primitives::{Address, Timestamp};
use serde::{Deserialize, Serialize};

/// Emitted by the factory for every new instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSealCreated {
    /// Address of the new GateSeal instance.
    pub gate_seal: Address,
}

/// Emitted once per sealed entry on a successful seal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sealed {
    /// The instance that consumed its authority.
    pub gate_seal: Address,
    /// The committee that triggered the seal.
    pub sealed_by: Address,
    /// Configured pause duration applied to the target.
    pub seal_duration_seconds: u64,
    /// The sealed target.
    pub sealable: Address,
    /// Commit timestamp of the seal call.
    pub sealed_at: Timestamp,
}
