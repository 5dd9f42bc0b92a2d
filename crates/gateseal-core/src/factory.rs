//! # GateSeal Factory
//!
//! Deploys new GateSeal instances from one audited blueprint, so every
//! instance runs bytecode-identical logic and differs only in
//! configuration.
//!
//! The factory adds no validation of its own: every configuration
//! check lives in `GateSeal::new` and fires identically whether an
//! instance is created here or constructed directly.

use crate::error::{FactoryError, GateSealError};
use crate::events::GateSealCreated;
use crate::primitives::{Address, Timestamp};
use crate::seal::GateSeal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Factory bound to a single blueprint address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSealFactory {
    /// The verified template every instance is deployed from.
    blueprint: Address,

    /// Monotonic creation counter; feeds address derivation.
    nonce: u64,

    /// Instances created by this factory, address-keyed.
    created: BTreeMap<Address, GateSeal>,
}

impl GateSealFactory {
    /// Bind a factory to a previously deployed, verified blueprint.
    pub fn new(blueprint: Address) -> Result<Self, FactoryError> {
        if blueprint.is_zero() {
            return Err(FactoryError::ZeroBlueprint);
        }
        Ok(Self {
            blueprint,
            nonce: 0,
            created: BTreeMap::new(),
        })
    }

    /// The blueprint address this factory deploys from.
    ///
    /// Callers verify the blueprint content independently before
    /// trusting any instance this factory produces.
    #[must_use]
    pub fn blueprint(&self) -> Address {
        self.blueprint
    }

    /// Deploy a new GateSeal instance.
    ///
    /// Validation is delegated entirely to [`GateSeal::new`]. The new
    /// address is derived deterministically from the blueprint address
    /// and the creation nonce; the nonce only advances on success, so
    /// a rejected configuration leaves the factory untouched.
    pub fn create_gate_seal(
        &mut self,
        sealing_committee: Address,
        seal_duration_seconds: u64,
        sealables: Vec<Address>,
        expiry_timestamp: Timestamp,
        now: Timestamp,
    ) -> Result<(Address, GateSealCreated), GateSealError> {
        let address = self.next_address();
        let gate_seal = GateSeal::new(
            address,
            sealing_committee,
            seal_duration_seconds,
            sealables,
            expiry_timestamp,
            now,
        )?;

        self.nonce = self.nonce.saturating_add(1);
        self.created.insert(address, gate_seal);

        Ok((address, GateSealCreated { gate_seal: address }))
    }

    /// Look up a created instance.
    #[must_use]
    pub fn gate_seal(&self, address: Address) -> Option<&GateSeal> {
        self.created.get(&address)
    }

    /// Look up a created instance mutably (to seal it).
    pub fn gate_seal_mut(&mut self, address: Address) -> Option<&mut GateSeal> {
        self.created.get_mut(&address)
    }

    /// Addresses of every created instance, in deterministic order.
    pub fn created(&self) -> impl Iterator<Item = Address> + '_ {
        self.created.keys().copied()
    }

    /// Number of instances created so far.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    fn next_address(&self) -> Address {
        let mut material = Vec::with_capacity(28);
        material.extend_from_slice(&self.blueprint.0);
        material.extend_from_slice(&self.nonce.to_be_bytes());
        Address::derive("gateseal:create", &material)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GateSealError;
    use crate::sealable::{InMemoryDirectory, SealableMock};

    const WEEK: u64 = 60 * 60 * 24 * 7;
    const YEAR: u64 = 60 * 60 * 24 * 365;

    fn addr(byte: u8) -> Address {
        Address([byte; 20])
    }

    fn factory() -> GateSealFactory {
        GateSealFactory::new(addr(0xBB)).expect("nonzero blueprint")
    }

    #[test]
    fn factory_rejects_zero_blueprint() {
        assert_eq!(
            GateSealFactory::new(Address::ZERO),
            Err(FactoryError::ZeroBlueprint)
        );
    }

    #[test]
    fn factory_reports_blueprint() {
        assert_eq!(factory().blueprint(), addr(0xBB));
    }

    #[test]
    fn create_gate_seal_returns_address_and_event() {
        let mut factory = factory();
        let now = Timestamp(1_000);

        let (address, event) = factory
            .create_gate_seal(
                addr(0xCC),
                WEEK,
                vec![addr(1), addr(2)],
                now.saturating_add(YEAR),
                now,
            )
            .expect("valid config");

        assert_eq!(event.gate_seal, address);
        assert!(!address.is_zero());

        let gate_seal = factory.gate_seal(address).expect("instance stored");
        assert_eq!(gate_seal.address(), address);
        assert_eq!(gate_seal.sealing_committee(), addr(0xCC));
        assert_eq!(gate_seal.sealables(), &[addr(1), addr(2)]);
        assert_eq!(factory.created_count(), 1);
    }

    #[test]
    fn create_delegates_validation_to_instance() {
        let mut factory = factory();
        let now = Timestamp(1_000);

        let result = factory.create_gate_seal(
            Address::ZERO,
            WEEK,
            vec![addr(1)],
            now.saturating_add(YEAR),
            now,
        );
        assert_eq!(result, Err(GateSealError::ZeroCommittee));

        // A rejected configuration creates nothing and burns no nonce.
        assert_eq!(factory.created_count(), 0);
        let (first, _) = factory
            .create_gate_seal(addr(0xCC), WEEK, vec![addr(1)], now.saturating_add(YEAR), now)
            .expect("valid config");

        let mut fresh = GateSealFactory::new(addr(0xBB)).expect("nonzero blueprint");
        let (unburned, _) = fresh
            .create_gate_seal(addr(0xCC), WEEK, vec![addr(1)], now.saturating_add(YEAR), now)
            .expect("valid config");
        assert_eq!(first, unburned);
    }

    #[test]
    fn created_addresses_never_collide() {
        let mut factory = factory();
        let now = Timestamp(1_000);

        for _ in 0..5 {
            factory
                .create_gate_seal(addr(0xCC), WEEK, vec![addr(1)], now.saturating_add(YEAR), now)
                .expect("valid config");
        }
        assert_eq!(factory.created_count(), 5);
        assert_eq!(factory.created().count(), 5);
    }

    #[test]
    fn instances_are_independent() {
        let mut factory = factory();
        let now = Timestamp(1_000);
        let sealables = vec![addr(1)];

        let mut directory = InMemoryDirectory::new();
        directory.register(addr(1), SealableMock::new());

        let (first, _) = factory
            .create_gate_seal(addr(0xCC), WEEK, sealables.clone(), now.saturating_add(YEAR), now)
            .expect("valid config");
        let (second, _) = factory
            .create_gate_seal(addr(0xCC), WEEK, sealables.clone(), now.saturating_add(YEAR), now)
            .expect("valid config");
        assert_ne!(first, second);

        factory
            .gate_seal_mut(first)
            .expect("instance stored")
            .seal(addr(0xCC), &sealables, &mut directory, now)
            .expect("seal must commit");

        assert!(factory.gate_seal(first).is_some_and(|g| g.is_expired(now)));
        assert!(factory.gate_seal(second).is_some_and(|g| !g.is_expired(now)));
    }
}
