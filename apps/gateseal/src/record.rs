//! # Deployment Records
//!
//! Per-address JSON records written at deployment time and re-checked
//! by the verification commands. Records live under
//! `deployed/<network>/<kind>/<address>.json` with lowercase address
//! file names, so external audit tooling can locate them without any
//! index.
//!
//! The core never reads these files; they exist strictly for audit.

use gateseal_core::{Address, GateSeal, Timestamp};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Record I/O and comparison failures.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record: {0}")]
    Io(#[from] std::io::Error),

    #[error("record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record mismatch: {field}")]
    Mismatch { field: &'static str },
}

/// The configuration tuple persisted for a GateSeal instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSealParams {
    pub sealing_committee: Address,
    pub seal_duration_seconds: u64,
    pub sealables: Vec<Address>,
    pub expiry_timestamp: Timestamp,
}

/// Record written when the factory (and its blueprint) is deployed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryRecord {
    pub factory: Address,
    pub blueprint: Address,
    /// BLAKE3 digest of the deploy bytecode; stands in for a tx hash.
    pub tx_hash: String,
    pub deployer: Address,
}

/// Record written when a GateSeal instance is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSealRecord {
    pub gate_seal: Address,
    pub factory: Address,
    /// BLAKE3 digest of the canonical params JSON; stands in for a tx hash.
    pub tx_hash: String,
    pub deployer: Address,
    pub params: GateSealParams,
}

impl GateSealRecord {
    /// Compare every recorded parameter against a live instance,
    /// naming the first mismatching field.
    pub fn verify_against(&self, gate_seal: &GateSeal) -> Result<(), RecordError> {
        if self.params.sealing_committee != gate_seal.sealing_committee() {
            return Err(RecordError::Mismatch {
                field: "sealing_committee",
            });
        }
        if self.params.seal_duration_seconds != gate_seal.seal_duration_seconds() {
            return Err(RecordError::Mismatch {
                field: "seal_duration_seconds",
            });
        }
        if self.params.sealables != gate_seal.sealables() {
            return Err(RecordError::Mismatch { field: "sealables" });
        }
        if self.params.expiry_timestamp != gate_seal.expiry_timestamp() {
            return Err(RecordError::Mismatch {
                field: "expiry_timestamp",
            });
        }
        Ok(())
    }
}

/// Hex BLAKE3 digest over arbitrary bytes, used as the stand-in tx hash.
#[must_use]
pub fn digest(material: &[u8]) -> String {
    format!("0x{}", blake3::hash(material).to_hex())
}

/// `deployed/<network>/<kind>/<address>.json`, lowercase address.
#[must_use]
pub fn deployed_filename(root: &Path, network: &str, kind: &str, address: Address) -> PathBuf {
    root.join("deployed")
        .join(network)
        .join(kind)
        .join(format!("{address}.json"))
}

/// Serialize a record to its deployment path, creating directories.
pub fn save_record<T: Serialize>(path: &Path, record: &T) -> Result<(), RecordError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(record)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a record from its deployment path.
pub fn load_record<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, RecordError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn addr(byte: u8) -> Address {
        Address([byte; 20])
    }

    fn sample_record() -> GateSealRecord {
        GateSealRecord {
            gate_seal: addr(0x65),
            factory: addr(0xFA),
            tx_hash: digest(b"params"),
            deployer: addr(0xDE),
            params: GateSealParams {
                sealing_committee: addr(0xCC),
                seal_duration_seconds: 604_800,
                sealables: vec![addr(1), addr(2)],
                expiry_timestamp: Timestamp(2_000_000),
            },
        }
    }

    #[test]
    fn filename_is_lowercase_and_network_scoped() {
        let path = deployed_filename(Path::new("/tmp/x"), "local", "gateseal", addr(0xAB));
        let text = path.to_string_lossy().into_owned();
        assert!(text.ends_with(
            "deployed/local/gateseal/0xabababababababababababababababababababab.json"
        ));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().expect("temp dir");
        let path = deployed_filename(temp.path(), "local", "gateseal", addr(0x65));

        let record = sample_record();
        save_record(&path, &record).expect("save");
        let loaded: GateSealRecord = load_record(&path).expect("load");
        assert_eq!(loaded, record);
    }

    #[test]
    fn verify_against_matching_instance() {
        let record = sample_record();
        let now = Timestamp(1_000_000);
        let gate_seal = GateSeal::new(
            record.gate_seal,
            record.params.sealing_committee,
            record.params.seal_duration_seconds,
            record.params.sealables.clone(),
            record.params.expiry_timestamp,
            now,
        )
        .expect("valid config");

        assert!(record.verify_against(&gate_seal).is_ok());
    }

    #[test]
    fn verify_names_mismatching_field() {
        let record = sample_record();
        let now = Timestamp(1_000_000);
        let gate_seal = GateSeal::new(
            record.gate_seal,
            record.params.sealing_committee,
            record.params.seal_duration_seconds,
            vec![addr(1), addr(3)], // differs from the record
            record.params.expiry_timestamp,
            now,
        )
        .expect("valid config");

        let error = record.verify_against(&gate_seal).expect_err("must mismatch");
        assert!(error.to_string().contains("sealables"));
    }

    #[test]
    fn digest_is_stable() {
        assert_eq!(digest(b"abc"), digest(b"abc"));
        assert_ne!(digest(b"abc"), digest(b"abd"));
        assert!(digest(b"abc").starts_with("0x"));
    }
}
