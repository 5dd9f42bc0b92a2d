//! # GateSeal State Machine
//!
//! A single-use, time-boxed emergency brake. One committee, one seal,
//! one hard expiry deadline.
//!
//! The instance is armed at construction and reaches a terminal state
//! exactly once: either the committee seals (instant, permanent
//! expiry) or the deadline passes with no seal (lapse). Both terminal
//! states answer `is_expired` identically; expiry is a predicate over
//! the stored timestamp, never a scheduled transition.

use crate::error::GateSealError;
use crate::events::Sealed;
use crate::primitives::{
    Address, Timestamp, MAX_EXPIRY_PERIOD_SECONDS, MAX_SEALABLES, MAX_SEAL_DURATION_SECONDS,
    MIN_SEAL_DURATION_SECONDS,
};
use crate::sealable::SealableDirectory;
use serde::{Deserialize, Serialize};

// =============================================================================
// SEAL RECEIPT
// =============================================================================

/// Result of a committed seal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealReceipt {
    /// Commit timestamp; also the new (already passed) expiry.
    pub sealed_at: Timestamp,
    /// One event per sealed entry, in subset order.
    pub events: Vec<Sealed>,
}

// =============================================================================
// GATE SEAL
// =============================================================================

/// The GateSeal instance.
///
/// Configuration fields are write-once; only `current_expiry_timestamp`
/// and `sealed` ever change, both exactly once, inside a committed
/// [`GateSeal::seal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSeal {
    /// Address this instance lives at; named by every `Sealed` event.
    address: Address,

    /// The only identity allowed to seal.
    sealing_committee: Address,

    /// Pause duration applied to each sealed target.
    seal_duration_seconds: u64,

    /// Configured targets, ordered, duplicate-free.
    sealables: Vec<Address>,

    /// Configured hard deadline.
    expiry_timestamp: Timestamp,

    /// Live expiry; only ever moves earlier (to the seal timestamp).
    current_expiry_timestamp: Timestamp,

    /// Targets actually sealed; empty until the one successful seal.
    sealed: Vec<Address>,
}

impl GateSeal {
    /// Construct a fully validated instance.
    ///
    /// Validation order is part of the contract: when several
    /// violations coexist the earliest check decides the error.
    pub fn new(
        address: Address,
        sealing_committee: Address,
        seal_duration_seconds: u64,
        sealables: Vec<Address>,
        expiry_timestamp: Timestamp,
        now: Timestamp,
    ) -> Result<Self, GateSealError> {
        if sealing_committee.is_zero() {
            return Err(GateSealError::ZeroCommittee);
        }

        if seal_duration_seconds == 0 {
            return Err(GateSealError::ZeroSealDuration);
        }
        if seal_duration_seconds < MIN_SEAL_DURATION_SECONDS {
            return Err(GateSealError::SealDurationBelowMin);
        }
        if seal_duration_seconds > MAX_SEAL_DURATION_SECONDS {
            return Err(GateSealError::SealDurationExceedsMax);
        }

        if sealables.is_empty() {
            return Err(GateSealError::EmptySealables);
        }
        if sealables.len() > MAX_SEALABLES {
            return Err(GateSealError::TooManySealables);
        }
        if sealables.iter().any(Address::is_zero) {
            return Err(GateSealError::ZeroSealable);
        }
        if has_duplicates(&sealables) {
            return Err(GateSealError::DuplicateSealable);
        }

        if expiry_timestamp <= now {
            return Err(GateSealError::ExpiryNotInFuture);
        }
        if expiry_timestamp > now.saturating_add(MAX_EXPIRY_PERIOD_SECONDS) {
            return Err(GateSealError::ExpiryExceedsMax);
        }

        Ok(Self {
            address,
            sealing_committee,
            seal_duration_seconds,
            sealables,
            expiry_timestamp,
            current_expiry_timestamp: expiry_timestamp,
            sealed: Vec::new(),
        })
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Address of this instance.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The committee authorized to seal.
    #[must_use]
    pub fn sealing_committee(&self) -> Address {
        self.sealing_committee
    }

    /// Configured pause duration in seconds.
    #[must_use]
    pub fn seal_duration_seconds(&self) -> u64 {
        self.seal_duration_seconds
    }

    /// Protocol-wide lower bound on seal durations.
    #[must_use]
    pub fn min_seal_duration_seconds(&self) -> u64 {
        MIN_SEAL_DURATION_SECONDS
    }

    /// Configured sealables, in construction order.
    #[must_use]
    pub fn sealables(&self) -> &[Address] {
        &self.sealables
    }

    /// Current expiry: the configured deadline until a seal commits,
    /// then the seal timestamp forever.
    #[must_use]
    pub fn expiry_timestamp(&self) -> Timestamp {
        self.current_expiry_timestamp
    }

    /// Targets actually sealed; empty while armed.
    #[must_use]
    pub fn sealed(&self) -> &[Address] {
        &self.sealed
    }

    /// Whether the instance is terminal at `now`.
    ///
    /// False at `expiry - 1`, true at `expiry`. Sealing and lapsing
    /// are indistinguishable through this query.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.current_expiry_timestamp
    }

    // -------------------------------------------------------------------------
    // Seal
    // -------------------------------------------------------------------------

    /// Consume the single-use authority: pause `subset` and expire.
    ///
    /// All structural checks precede any external call. Pause attempts
    /// run in subset order against `directory`; each attempt counts as
    /// failed unless the call succeeds AND the target then reports
    /// itself paused. Any failed attempt voids the whole call: the
    /// directory is rolled back to its pre-seal checkpoint and the
    /// error carries every failing index.
    pub fn seal<D: SealableDirectory>(
        &mut self,
        caller: Address,
        subset: &[Address],
        directory: &mut D,
        now: Timestamp,
    ) -> Result<SealReceipt, GateSealError> {
        if caller != self.sealing_committee {
            return Err(GateSealError::NotCommittee);
        }
        if self.is_expired(now) {
            return Err(GateSealError::Expired);
        }
        if subset.is_empty() {
            return Err(GateSealError::EmptySubset);
        }
        if has_duplicates(subset) {
            return Err(GateSealError::DuplicateSubset);
        }
        if subset
            .iter()
            .any(|entry| !self.sealables.contains(entry))
        {
            return Err(GateSealError::NonSealable);
        }

        let checkpoint = directory.checkpoint();
        let mut failed = Vec::new();

        for (index, &sealable) in subset.iter().enumerate() {
            let call_ok = directory
                .pause_for(sealable, self.seal_duration_seconds, now)
                .is_ok();
            if !call_ok || !directory.is_paused(sealable, now) {
                failed.push(index);
            }
        }

        if !failed.is_empty() {
            directory.restore(checkpoint);
            return Err(GateSealError::PartialPause { failed });
        }

        self.current_expiry_timestamp = now;
        self.sealed = subset.to_vec();

        let events = subset
            .iter()
            .map(|&sealable| Sealed {
                gate_seal: self.address,
                sealed_by: caller,
                seal_duration_seconds: self.seal_duration_seconds,
                sealable,
                sealed_at: now,
            })
            .collect();

        Ok(SealReceipt {
            sealed_at: now,
            events,
        })
    }
}

/// Pairwise distinctness over a short list.
///
/// Lists are bounded by `MAX_SEALABLES`, so the quadratic scan is
/// cheaper than building a set.
fn has_duplicates(entries: &[Address]) -> bool {
    entries
        .iter()
        .enumerate()
        .any(|(i, entry)| entries[..i].contains(entry))
}

// =============================================================================
// TESTS
// =============================================================================
