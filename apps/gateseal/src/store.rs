//! # Local Deployment Store
//!
//! JSON-persisted world state for the local simulator: the blueprint
//! bytes, the factory with its created instances, and the mock
//! sealable directory. Separate CLI invocations compose by loading,
//! mutating, and saving this one file.
//!
//! This is a simulator substrate, not a chain: it exists so the
//! deploy/create/check commands can be exercised end to end without
//! any network.

use gateseal_core::{Address, GateSealFactory, InMemoryDirectory, SealableMock};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Store load/save failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store: {0}")]
    Io(#[from] std::io::Error),

    #[error("store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store: no factory deployed yet")]
    NoFactory,
}

/// The persisted world state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    /// Network name; scopes the deployment record paths.
    pub network: String,

    /// Hex deploy bytecode of the blueprint, as deployed.
    pub blueprint_deploy_bytecode: Option<String>,

    /// Address the blueprint was deployed at.
    pub blueprint_address: Option<Address>,

    /// Address the factory was deployed at.
    pub factory_address: Option<Address>,

    /// The factory, if deployed, with every created instance inside.
    pub factory: Option<GateSealFactory>,

    /// Mock sealables the simulator seals against.
    pub directory: InMemoryDirectory<SealableMock>,
}

impl Store {
    /// Fresh store for a network.
    #[must_use]
    pub fn new(network: &str) -> Self {
        Self {
            network: network.to_string(),
            ..Self::default()
        }
    }

    /// Path of the store file under `root`.
    #[must_use]
    pub fn path(root: &Path) -> PathBuf {
        root.join("state.json")
    }

    /// Load the store from `root`, or start fresh if none exists.
    pub fn load_or_new(root: &Path, network: &str) -> Result<Self, StoreError> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(Self::new(network));
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Persist the store under `root`.
    pub fn save(&self, root: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(root)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(Self::path(root), json)?;
        Ok(())
    }

    /// The deployed factory, or an error if none exists yet.
    pub fn factory_mut(&mut self) -> Result<&mut GateSealFactory, StoreError> {
        self.factory.as_mut().ok_or(StoreError::NoFactory)
    }

    /// Immutable factory access.
    pub fn factory(&self) -> Result<&GateSealFactory, StoreError> {
        self.factory.as_ref().ok_or(StoreError::NoFactory)
    }
}

// =============================================================================
// TESTS
// =============================================================================
