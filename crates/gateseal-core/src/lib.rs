//! # GateSeal Core
//!
//! The deterministic engine behind the GateSeal emergency brake: a
//! committee-controlled, single-use, time-boxed seal over a fixed set
//! of pausable subsystems.
//!
//! ## Module Overview
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `primitives` | Address/Timestamp newtypes, protocol constants |
//! | `error` | Stable error taxonomy for every rejected operation |
//! | `sealable` | Pause capability traits, directory, reference mock |
//! | `events` | Notification events produced by state transitions |
//! | `seal` | The GateSeal state machine |
//! | `factory` | Blueprint-backed instance deployment |
//! | `blueprint` | Non-executable template wrapper encode/verify |
//!
//! ## Design
//!
//! The core is pure and synchronous: no wall clock (callers pass
//! `Timestamp` explicitly), no I/O, and no internal concurrency. The
//! single-use invariant makes one `seal` the only mutation an instance
//! ever processes. External sealables are untrusted; every pause call
//! is captured as a result and folded into the all-or-nothing seal
//! decision.

pub mod blueprint;
pub mod error;
pub mod events;
pub mod factory;
pub mod primitives;
pub mod seal;
pub mod sealable;

pub use error::{BlueprintError, FactoryError, GateSealError, PauseError};
pub use events::{GateSealCreated, Sealed};
pub use factory::GateSealFactory;
pub use primitives::{
    Address, AddressParseError, Timestamp, MAX_EXPIRY_PERIOD_SECONDS, MAX_SEALABLES,
    MAX_SEAL_DURATION_SECONDS, MIN_SEAL_DURATION_SECONDS,
};
pub use seal::{GateSeal, SealReceipt};
pub use sealable::{InMemoryDirectory, Sealable, SealableDirectory, SealableMock};
