//! # CLI Commands
//!
//! One function per subcommand, each callable directly from
//! integration tests with explicit parameters. Environment-sourced
//! wrappers sit next to them for the binary entry point.
//!
//! The deploy commands write per-address JSON records for external
//! audit; the check commands re-derive everything independently and
//! compare against those records, then run a full seal-flow simulation
//! on a throwaway copy of the world state.

use crate::env::{self, EnvError};
use crate::record::{
    deployed_filename, digest, load_record, save_record, FactoryRecord, GateSealParams,
    GateSealRecord, RecordError,
};
use crate::store::{Store, StoreError};
use gateseal_core::blueprint;
use gateseal_core::{
    Address, BlueprintError, FactoryError, GateSeal, GateSealError, GateSealFactory,
    SealableDirectory, SealableMock, Timestamp, MAX_EXPIRY_PERIOD_SECONDS,
};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Seal duration used by the check-flow simulations: 1 week.
const SIMULATION_SEAL_DURATION: u64 = 60 * 60 * 24 * 7;

// =============================================================================
// ERRORS
// =============================================================================

/// Failures surfaced by any CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    GateSeal(#[from] GateSealError),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error(transparent)]
    Blueprint(#[from] BlueprintError),

    #[error("bytecode file: {0}")]
    Io(#[from] std::io::Error),

    #[error("bytecode file: invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("no gate seal deployed at {0}")]
    UnknownGateSeal(Address),

    #[error("FACTORY does not match deployed factory (expected {expected}, got {actual})")]
    FactoryMismatch { expected: Address, actual: Address },

    #[error("stored blueprint does not re-derive to {0}")]
    BlueprintMismatch(Address),

    #[error("simulation: {0}")]
    Simulation(String),

    #[error("system clock before Unix epoch")]
    Clock,
}

/// Current wall-clock time as a core timestamp.
pub fn system_now() -> Result<Timestamp, CliError> {
    let elapsed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|_| CliError::Clock)?;
    Ok(Timestamp(elapsed.as_secs()))
}

// =============================================================================
// DEPLOY FACTORY
// =============================================================================

/// Deploy the blueprint and factory from a compiled bytecode file.
///
/// The bytecode file holds hex (with or without a `0x` prefix,
/// whitespace tolerated). The deploy bytecode is constructed, verified
/// preamble-first, deployed into the store, and recorded.
pub fn cmd_deploy_factory(
    root: &Path,
    network: &str,
    bytecode_path: &Path,
    deployer: Address,
) -> Result<Address, CliError> {
    let raw = fs::read_to_string(bytecode_path)?;
    let cleaned: String = raw.split_whitespace().collect();
    let bytecode = hex::decode(cleaned.strip_prefix("0x").unwrap_or(&cleaned))?;

    let initcode = blueprint::deploy_bytecode(&bytecode)?;
    blueprint::verify_deploy_bytecode(&initcode)?;
    blueprint::verify_blueprint(blueprint::blueprint_payload(&initcode)?)?;

    let blueprint_address = Address::derive("gateseal:blueprint", &initcode);
    let factory_address = Address::derive("gateseal:factory", &blueprint_address.0);
    let factory = GateSealFactory::new(blueprint_address)?;
    info!("Blueprint deployed: {blueprint_address}");

    let mut store = Store::load_or_new(root, network)?;
    store.blueprint_deploy_bytecode = Some(format!("0x{}", hex::encode(&initcode)));
    store.blueprint_address = Some(blueprint_address);
    store.factory_address = Some(factory_address);
    store.factory = Some(factory);
    store.save(root)?;

    let record = FactoryRecord {
        factory: factory_address,
        blueprint: blueprint_address,
        tx_hash: digest(&initcode),
        deployer,
    };
    let path = deployed_filename(root, network, "factory", factory_address);
    save_record(&path, &record)?;

    info!("Factory deployed: {factory_address}");
    Ok(factory_address)
}

/// Environment wrapper: `DEPLOYER` + bytecode path.
pub fn cmd_deploy_factory_from_env(
    root: &Path,
    network: &str,
    bytecode_path: &Path,
) -> Result<Address, CliError> {
    let deployer = env::load_address("DEPLOYER")?;
    cmd_deploy_factory(root, network, bytecode_path, deployer)
}

// =============================================================================
// CREATE GATE SEAL
// =============================================================================

/// Create a GateSeal through the deployed factory.
///
/// Validation is entirely the instance constructor's; this command
/// only wires parameters through, registers simulator mocks for any
/// unknown sealable, and records the result.
pub fn cmd_create_gate_seal(
    root: &Path,
    network: &str,
    deployer: Address,
    sealing_committee: Address,
    seal_duration_seconds: u64,
    sealables: Vec<Address>,
    expiry_timestamp: Timestamp,
    now: Timestamp,
) -> Result<Address, CliError> {
    let mut store = Store::load_or_new(root, network)?;
    let factory_address = store.factory_address.ok_or(StoreError::NoFactory)?;

    let (gate_seal_address, event) = store.factory_mut()?.create_gate_seal(
        sealing_committee,
        seal_duration_seconds,
        sealables.clone(),
        expiry_timestamp,
        now,
    )?;
    for &sealable in &sealables {
        store.directory.register_default(sealable);
    }
    store.save(root)?;

    let params = GateSealParams {
        sealing_committee,
        seal_duration_seconds,
        sealables,
        expiry_timestamp,
    };
    let record = GateSealRecord {
        gate_seal: gate_seal_address,
        factory: factory_address,
        tx_hash: digest(serde_json::to_string(&params).map_err(RecordError::Json)?.as_bytes()),
        deployer,
        params,
    };
    let path = deployed_filename(root, network, "gateseal", gate_seal_address);
    save_record(&path, &record)?;

    info!("GateSeal deployed to {}", event.gate_seal);
    Ok(gate_seal_address)
}

/// Environment wrapper: `FACTORY`, `SEALING_COMMITTEE`,
/// `SEAL_DURATION_SECONDS`, `SEALABLES`, `EXPIRY_TIMESTAMP`,
/// `DEPLOYER`.
pub fn cmd_create_gate_seal_from_env(
    root: &Path,
    network: &str,
    now: Timestamp,
) -> Result<Address, CliError> {
    let deployer = env::load_address("DEPLOYER")?;
    let factory = env::load_address("FACTORY")?;
    let sealing_committee = env::load_address("SEALING_COMMITTEE")?;
    let seal_duration_seconds = env::load_u64("SEAL_DURATION_SECONDS")?;
    let sealables = env::load_address_list("SEALABLES")?;
    let expiry_timestamp = env::load_timestamp("EXPIRY_TIMESTAMP")?;

    let store = Store::load_or_new(root, network)?;
    let deployed = store.factory_address.ok_or(StoreError::NoFactory)?;
    if factory != deployed {
        return Err(CliError::FactoryMismatch {
            expected: deployed,
            actual: factory,
        });
    }

    cmd_create_gate_seal(
        root,
        network,
        deployer,
        sealing_committee,
        seal_duration_seconds,
        sealables,
        expiry_timestamp,
        now,
    )
}

// =============================================================================
// CHECK FACTORY
// =============================================================================

/// Re-verify the deployed factory against its record and blueprint,
/// then run a create → seal → resume simulation on a throwaway copy.
pub fn cmd_check_factory(root: &Path, network: &str, now: Timestamp) -> Result<(), CliError> {
    let mut store = Store::load_or_new(root, network)?;
    let factory_address = store.factory_address.ok_or(StoreError::NoFactory)?;
    let blueprint_address = store.blueprint_address.ok_or(StoreError::NoFactory)?;

    let path = deployed_filename(root, network, "factory", factory_address);
    let record: FactoryRecord = load_record(&path)?;
    if record.blueprint != store.factory()?.blueprint() {
        return Err(RecordError::Mismatch { field: "blueprint" }.into());
    }
    info!("blueprint matches!");

    // Re-derive the blueprint from the stored deploy bytecode and check
    // it still verifies and lands at the recorded address.
    let stored = store
        .blueprint_deploy_bytecode
        .as_deref()
        .ok_or(StoreError::NoFactory)?;
    let initcode = hex::decode(stored.strip_prefix("0x").unwrap_or(stored))?;
    blueprint::verify_deploy_bytecode(&initcode)?;
    if Address::derive("gateseal:blueprint", &initcode) != blueprint_address {
        return Err(CliError::BlueprintMismatch(blueprint_address));
    }
    info!("blueprint bytecode verifies!");

    // Simulation on the loaded copy; never saved back.
    let sealable = Address::derive("gateseal:simulation", &factory_address.0);
    store.directory.register(sealable, SealableMock::new());
    let committee = record.deployer;
    let expiry = now.saturating_add(MAX_EXPIRY_PERIOD_SECONDS);

    let (gate_seal_address, _) = store.factory_mut()?.create_gate_seal(
        committee,
        SIMULATION_SEAL_DURATION,
        vec![sealable],
        expiry,
        now,
    )?;
    let gate_seal = store
        .factory
        .as_mut()
        .and_then(|f| f.gate_seal_mut(gate_seal_address))
        .ok_or(CliError::UnknownGateSeal(gate_seal_address))?;

    run_seal_simulation(gate_seal, &mut store.directory, committee, now)?;
    info!("Factory is good to go!");
    Ok(())
}

// =============================================================================
// CHECK GATE SEAL
// =============================================================================

/// Compare a deployed GateSeal against its record field-by-field, then
/// simulate the full seal flow on a throwaway copy of the world.
pub fn cmd_check_gate_seal(
    root: &Path,
    network: &str,
    gate_seal_address: Address,
    now: Timestamp,
) -> Result<(), CliError> {
    let mut store = Store::load_or_new(root, network)?;

    let path = deployed_filename(root, network, "gateseal", gate_seal_address);
    let record: GateSealRecord = load_record(&path)?;

    {
        let gate_seal = store
            .factory()?
            .gate_seal(gate_seal_address)
            .ok_or(CliError::UnknownGateSeal(gate_seal_address))?;
        record.verify_against(gate_seal)?;
    }
    info!("sealing_committee matches!");
    info!("seal_duration_seconds matches!");
    info!("sealables matches!");
    info!("expiry_timestamp matches!");

    // Simulation on the loaded copy; never saved back.
    info!("simulating GateSeal flow");
    let committee = record.params.sealing_committee;
    let gate_seal = store
        .factory
        .as_mut()
        .and_then(|f| f.gate_seal_mut(gate_seal_address))
        .ok_or(CliError::UnknownGateSeal(gate_seal_address))?;

    run_seal_simulation(gate_seal, &mut store.directory, committee, now)?;
    info!("GateSeal is good to go!");
    Ok(())
}

/// Environment wrapper: `GATE_SEAL`.
pub fn cmd_check_gate_seal_from_env(
    root: &Path,
    network: &str,
    now: Timestamp,
) -> Result<(), CliError> {
    let gate_seal = env::load_address("GATE_SEAL")?;
    cmd_check_gate_seal(root, network, gate_seal, now)
}

// =============================================================================
// SIMULATION
// =============================================================================

/// Seal everything, assert terminal expiry and paused targets, then
/// advance past the seal duration and assert the targets resumed.
fn run_seal_simulation<D: SealableDirectory>(
    gate_seal: &mut GateSeal,
    directory: &mut D,
    committee: Address,
    now: Timestamp,
) -> Result<(), CliError> {
    let sealables = gate_seal.sealables().to_vec();
    let duration = gate_seal.seal_duration_seconds();

    let receipt = gate_seal.seal(committee, &sealables, directory, now)?;
    info!("Sealed");

    if !gate_seal.is_expired(now) || gate_seal.expiry_timestamp() != receipt.sealed_at {
        return Err(CliError::Simulation(
            "instance not expired after seal".to_string(),
        ));
    }
    info!("Expired");

    for &sealable in &sealables {
        if !directory.is_paused(sealable, now) {
            return Err(CliError::Simulation(format!("{sealable} not paused")));
        }
    }
    info!("Sealables paused");

    let resumed_at = now.saturating_add(duration);
    for &sealable in &sealables {
        if directory.is_paused(sealable, resumed_at) {
            return Err(CliError::Simulation(format!(
                "{sealable} still paused after {duration}s"
            )));
        }
    }
    info!("Sealables unpaused in {duration}");
    Ok(())
}
