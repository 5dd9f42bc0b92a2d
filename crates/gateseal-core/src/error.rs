//! # Error Taxonomy
//!
//! Every rejected operation in the core maps to one stable, distinct
//! variant here. Messages reuse the original protocol's diagnostic
//! strings so existing tooling that greps for them keeps working.
//!
//! All errors are synchronous and atomic: a failed call leaves no
//! partial state behind.

use thiserror::Error;

// =============================================================================
// GATE SEAL ERRORS
// =============================================================================

/// Rejected construction or seal outcomes for a [`crate::GateSeal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateSealError {
    // --- construction ---
    #[error("sealing committee: zero address")]
    ZeroCommittee,

    #[error("seal duration: zero")]
    ZeroSealDuration,

    #[error("seal duration: below min")]
    SealDurationBelowMin,

    #[error("seal duration: exceeds max")]
    SealDurationExceedsMax,

    #[error("sealables: empty list")]
    EmptySealables,

    #[error("sealables: list exceeds max length")]
    TooManySealables,

    #[error("sealables: includes zero address")]
    ZeroSealable,

    #[error("sealables: includes duplicates")]
    DuplicateSealable,

    #[error("expiry timestamp: must be in the future")]
    ExpiryNotInFuture,

    #[error("expiry timestamp: exceeds max expiry period")]
    ExpiryExceedsMax,

    // --- seal ---
    #[error("sender: not SEALING_COMMITTEE")]
    NotCommittee,

    #[error("gate seal: expired")]
    Expired,

    #[error("sealables: empty subset")]
    EmptySubset,

    #[error("sealables: subset includes duplicates")]
    DuplicateSubset,

    #[error("sealables: includes a non-sealable")]
    NonSealable,

    /// Some pause attempts did not take effect; nothing was committed.
    ///
    /// The payload encodes every failing subset index, highest first,
    /// concatenated as decimal digits with no separator. Callers may
    /// parse it to retry with a narrower subset.
    #[error("failed to seal: {}", encode_failed_indices(failed))]
    PartialPause { failed: Vec<usize> },
}

impl GateSealError {
    /// Machine-readable payload for [`GateSealError::PartialPause`].
    ///
    /// `None` for every other variant.
    #[must_use]
    pub fn partial_pause_payload(&self) -> Option<String> {
        match self {
            GateSealError::PartialPause { failed } => Some(encode_failed_indices(failed)),
            _ => None,
        }
    }
}

/// Encode failing subset indices as the diagnostic payload.
///
/// Indices are sorted descending and concatenated as decimal digits
/// with no separator: {1, 3} encodes to `"31"`. This is an exact
/// contract, not free-form text.
#[must_use]
pub fn encode_failed_indices(failed: &[usize]) -> String {
    let mut indices = failed.to_vec();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();

    let mut payload = String::new();
    for index in indices {
        payload.push_str(&index.to_string());
    }
    payload
}

// =============================================================================
// FACTORY ERRORS
// =============================================================================

/// Rejected [`crate::GateSealFactory`] construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FactoryError {
    #[error("blueprint: zero address")]
    ZeroBlueprint,
}

// =============================================================================
// BLUEPRINT ERRORS
// =============================================================================

/// Rejected blueprint encode/verify outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlueprintError {
    #[error("blueprint: too short")]
    TooShort,

    #[error("blueprint: bad execution-halt byte")]
    BadExecutionHalt,

    #[error("blueprint: bad identifier byte")]
    BadIdentifier,

    #[error("blueprint: reserved version bits set")]
    ReservedBits,

    #[error("blueprint: deploy stub malformed")]
    BadStub,

    #[error("blueprint: length field mismatch (expected {expected}, got {actual})")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("blueprint: payload exceeds 2-byte length field")]
    LengthOverflow,
}

// =============================================================================
// PAUSE ERRORS
// =============================================================================

/// Failure reported by a sealable's pause capability.
///
/// The core never propagates these: each is captured per-entry and
/// folded into the [`GateSealError::PartialPause`] index list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PauseError {
    #[error("sealable: unknown address")]
    UnknownSealable,

    #[error("sealable: pause call rejected")]
    Rejected,
}

// =============================================================================
// TESTS
// =============================================================================
