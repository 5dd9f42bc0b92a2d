//! # Sealable Capability
//!
//! The pause capability consumed by the GateSeal state machine, plus
//! the directory abstraction through which a seal reaches its targets.
//!
//! Sealables are untrusted external collaborators. Every call-site
//! returns a result that the state machine captures per entry; nothing
//! a sealable does can abort a seal uncontrolled. The directory carries
//! checkpoint/restore so a failed seal rolls back every pause side
//! effect, which is what makes the all-or-nothing contract hold.

use crate::error::PauseError;
use crate::primitives::{Address, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// SEALABLE TRAIT
// =============================================================================

/// A subsystem that can be paused for a bounded duration.
///
/// Mirrors the external contract `pauseFor(duration)` / `isPaused()`.
/// A pause attempt only counts as successful if the call returns `Ok`
/// AND the target reports itself paused afterwards.
pub trait Sealable {
    /// Pause the target for `seconds`, starting at `now`.
    fn pause_for(&mut self, seconds: u64, now: Timestamp) -> Result<(), PauseError>;

    /// Whether the target reports itself paused at `now`.
    fn is_paused(&self, now: Timestamp) -> bool;
}

// =============================================================================
// SEALABLE DIRECTORY
// =============================================================================

/// Address-keyed access to live sealables.
///
/// `checkpoint`/`restore` bracket the pause attempts of a single seal:
/// the state machine takes a checkpoint before the first attempt and
/// restores it if any attempt fails, so no sealable ends up paused as
/// a side effect of a failed call.
pub trait SealableDirectory {
    /// Opaque snapshot of all sealable state.
    type Checkpoint;

    /// Snapshot the current state of every sealable.
    fn checkpoint(&self) -> Self::Checkpoint;

    /// Roll every sealable back to a previously taken checkpoint.
    fn restore(&mut self, checkpoint: Self::Checkpoint);

    /// Forward a pause call to the sealable at `address`.
    fn pause_for(
        &mut self,
        address: Address,
        seconds: u64,
        now: Timestamp,
    ) -> Result<(), PauseError>;

    /// Whether the sealable at `address` reports itself paused.
    ///
    /// An unknown address reports unpaused; the state machine then
    /// counts the attempt as failed.
    fn is_paused(&self, address: Address, now: Timestamp) -> bool;
}

// =============================================================================
// SEALABLE MOCK
// =============================================================================

/// Configurable reference sealable.
///
/// Pauses lapse naturally: the mock records `paused_until` and reports
/// paused while `now` is strictly before it. The failure knobs cover
/// the two distinct ways a real target can let a committee down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealableMock {
    /// Paused while `now < paused_until`.
    paused_until: Timestamp,

    /// Reject the pause call outright.
    fail_on_pause: bool,

    /// Accept the pause call but never actually pause.
    ignore_pause: bool,
}

impl SealableMock {
    /// A well-behaved sealable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A sealable whose pause call is rejected.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_on_pause: true,
            ..Self::default()
        }
    }

    /// A sealable that accepts the call but stays unpaused.
    #[must_use]
    pub fn ignoring() -> Self {
        Self {
            ignore_pause: true,
            ..Self::default()
        }
    }

    /// The instant this mock resumes.
    #[must_use]
    pub fn paused_until(&self) -> Timestamp {
        self.paused_until
    }
}

impl Sealable for SealableMock {
    fn pause_for(&mut self, seconds: u64, now: Timestamp) -> Result<(), PauseError> {
        if self.fail_on_pause {
            return Err(PauseError::Rejected);
        }
        if !self.ignore_pause {
            self.paused_until = now.saturating_add(seconds);
        }
        Ok(())
    }

    fn is_paused(&self, now: Timestamp) -> bool {
        now < self.paused_until
    }
}

// =============================================================================
// IN-MEMORY DIRECTORY
// =============================================================================

/// BTreeMap-backed directory of sealables.
///
/// The checkpoint is a full clone of the map. Sealable state here is
/// a handful of integers per entry, so cloning is the simplest rollback
/// that is provably complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryDirectory<S = SealableMock> {
    sealables: BTreeMap<Address, S>,
}

impl<S: Sealable + Clone> InMemoryDirectory<S> {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sealables: BTreeMap::new(),
        }
    }

    /// Register a sealable under `address`, replacing any previous one.
    pub fn register(&mut self, address: Address, sealable: S) {
        self.sealables.insert(address, sealable);
    }

    /// Register a default sealable if `address` is not yet known.
    pub fn register_default(&mut self, address: Address)
    where
        S: Default,
    {
        self.sealables.entry(address).or_default();
    }

    /// Look up a sealable.
    #[must_use]
    pub fn get(&self, address: Address) -> Option<&S> {
        self.sealables.get(&address)
    }

    /// Look up a sealable mutably.
    pub fn get_mut(&mut self, address: Address) -> Option<&mut S> {
        self.sealables.get_mut(&address)
    }

    /// Number of registered sealables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sealables.len()
    }

    /// Whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sealables.is_empty()
    }

    /// Registered addresses in deterministic order.
    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.sealables.keys().copied()
    }
}

impl<S: Sealable + Clone> SealableDirectory for InMemoryDirectory<S> {
    type Checkpoint = BTreeMap<Address, S>;

    fn checkpoint(&self) -> Self::Checkpoint {
        self.sealables.clone()
    }

    fn restore(&mut self, checkpoint: Self::Checkpoint) {
        self.sealables = checkpoint;
    }

    fn pause_for(
        &mut self,
        address: Address,
        seconds: u64,
        now: Timestamp,
    ) -> Result<(), PauseError> {
        let sealable = self
            .sealables
            .get_mut(&address)
            .ok_or(PauseError::UnknownSealable)?;
        sealable.pause_for(seconds, now)
    }

    fn is_paused(&self, address: Address, now: Timestamp) -> bool {
        self.sealables
            .get(&address)
            .is_some_and(|sealable| sealable.is_paused(now))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address([byte; 20])
    }

    #[test]
    fn mock_pauses_and_resumes() {
        let mut mock = SealableMock::new();
        let now = Timestamp(1_000);

        assert!(!mock.is_paused(now));
        assert!(mock.pause_for(60, now).is_ok());

        assert!(mock.is_paused(now));
        assert!(mock.is_paused(Timestamp(1_059)));
        // Resumes exactly at paused_until.
        assert!(!mock.is_paused(Timestamp(1_060)));
    }

    #[test]
    fn failing_mock_rejects_pause() {
        let mut mock = SealableMock::failing();
        let result = mock.pause_for(60, Timestamp(0));
        assert_eq!(result, Err(PauseError::Rejected));
        assert!(!mock.is_paused(Timestamp(0)));
    }

    #[test]
    fn ignoring_mock_accepts_but_stays_unpaused() {
        let mut mock = SealableMock::ignoring();
        assert!(mock.pause_for(60, Timestamp(0)).is_ok());
        assert!(!mock.is_paused(Timestamp(1)));
    }

    #[test]
    fn directory_pause_unknown_address_fails() {
        let mut directory: InMemoryDirectory = InMemoryDirectory::new();
        let result = directory.pause_for(addr(1), 60, Timestamp(0));
        assert_eq!(result, Err(PauseError::UnknownSealable));
        assert!(!directory.is_paused(addr(1), Timestamp(0)));
    }

    #[test]
    fn directory_checkpoint_restore_discards_pauses() {
        let mut directory: InMemoryDirectory = InMemoryDirectory::new();
        directory.register(addr(1), SealableMock::new());
        directory.register(addr(2), SealableMock::new());

        let checkpoint = directory.checkpoint();
        let now = Timestamp(100);

        assert!(directory.pause_for(addr(1), 60, now).is_ok());
        assert!(directory.is_paused(addr(1), now));

        directory.restore(checkpoint);
        assert!(!directory.is_paused(addr(1), now));
        assert!(!directory.is_paused(addr(2), now));
    }

    #[test]
    fn directory_addresses_in_deterministic_order() {
        let mut directory: InMemoryDirectory = InMemoryDirectory::new();
        directory.register(addr(3), SealableMock::new());
        directory.register(addr(1), SealableMock::new());
        directory.register(addr(2), SealableMock::new());

        let addresses: Vec<_> = directory.addresses().collect();
        assert_eq!(addresses, vec![addr(1), addr(2), addr(3)]);
    }
}
