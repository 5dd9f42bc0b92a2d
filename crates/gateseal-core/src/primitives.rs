//! # Core Primitives
//!
//! Address and timestamp newtypes plus the protocol-wide constants
//! that bound every GateSeal configuration.
//!
//! All arithmetic is saturating integer arithmetic. The core never
//! reads a wall clock: callers pass the current [`Timestamp`] into
//! every time-dependent operation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// PROTOCOL CONSTANTS
// =============================================================================

/// Minimum allowed seal duration: 1 hour.
///
/// Exposed through `GateSeal::min_seal_duration_seconds` so committees
/// can discover the lower bound without consulting the source.
pub const MIN_SEAL_DURATION_SECONDS: u64 = 60 * 60;

/// Maximum allowed seal duration: 14 days.
pub const MAX_SEAL_DURATION_SECONDS: u64 = 60 * 60 * 24 * 14;

/// Maximum number of sealables a single GateSeal may guard.
pub const MAX_SEALABLES: usize = 8;

/// Maximum distance between deployment time and expiry: 1 year.
pub const MAX_EXPIRY_PERIOD_SECONDS: u64 = 60 * 60 * 24 * 365;

// =============================================================================
// ADDRESS
// =============================================================================

/// A 20-byte account/contract identity.
///
/// Rendered as a lowercase `0x`-prefixed hex string; parsed
/// case-insensitively. The all-zero address is the null identity and
/// is rejected everywhere a real participant is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null identity.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Check whether this is the null identity.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Derive an address from arbitrary bytes via BLAKE3.
    ///
    /// Takes the first 20 bytes of the digest. Used for deterministic
    /// blueprint/factory/instance address assignment.
    #[must_use]
    pub fn derive(domain: &str, material: &[u8]) -> Address {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain.as_bytes());
        hasher.update(material);
        let digest = hasher.finalize();
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest.as_bytes()[..20]);
        Address(out)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Error produced when parsing an [`Address`] from a string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AddressParseError {
    #[error("address: invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("address: expected 20 bytes, got {0}")]
    BadLength(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        let bytes = hex::decode(stripped)?;
        let array: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressParseError::BadLength(bytes.len()))?;
        Ok(Address(array))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TIMESTAMP
// =============================================================================

/// Seconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Advance by `seconds`, saturating at the maximum.
    #[must_use]
    pub fn saturating_add(self, seconds: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(seconds))
    }

    /// Seconds from `self` until `later`, zero if `later` is earlier.
    #[must_use]
    pub fn seconds_until(self, later: Timestamp) -> u64 {
        later.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address([1u8; 20]).is_zero());
    }

    #[test]
    fn address_display_roundtrip() {
        let address = Address([0xAB; 20]);
        let text = address.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 42);
        assert_eq!(text.parse::<Address>(), Ok(address));
    }

    #[test]
    fn address_parse_accepts_mixed_case_and_bare_hex() {
        let lower = "0xabababababababababababababababababababab";
        let upper = "0xABABABABABABABABABABABABABABABABABABABAB";
        let bare = "abababababababababababababababababababab";

        let expected = Address([0xAB; 20]);
        assert_eq!(lower.parse::<Address>(), Ok(expected));
        assert_eq!(upper.parse::<Address>(), Ok(expected));
        assert_eq!(bare.parse::<Address>(), Ok(expected));
    }

    #[test]
    fn address_parse_rejects_bad_length() {
        let result = "0x0102".parse::<Address>();
        assert_eq!(result, Err(AddressParseError::BadLength(2)));
    }

    #[test]
    fn address_parse_rejects_bad_hex() {
        assert!("0xzz".parse::<Address>().is_err());
    }

    #[test]
    fn derive_is_deterministic_and_domain_separated() {
        let a = Address::derive("gateseal:create", b"material");
        let b = Address::derive("gateseal:create", b"material");
        let c = Address::derive("gateseal:blueprint", b"material");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_zero());
    }

    #[test]
    fn timestamp_saturating_add() {
        assert_eq!(Timestamp(10).saturating_add(5), Timestamp(15));
        assert_eq!(Timestamp(u64::MAX).saturating_add(1), Timestamp(u64::MAX));
    }

    #[test]
    fn timestamp_seconds_until() {
        assert_eq!(Timestamp(10).seconds_until(Timestamp(25)), 15);
        assert_eq!(Timestamp(25).seconds_until(Timestamp(10)), 0);
    }

}
