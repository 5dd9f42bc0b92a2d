//! # Environment Loading
//!
//! Deployment parameters arrive through environment variables, one per
//! parameter, matching the names the deployment runbooks use. The
//! loader only fetches and parses; every semantic check lives in the
//! core constructors.

use gateseal_core::{Address, Timestamp};
use thiserror::Error;
use tracing::{error, info};

/// Failures while loading or parsing environment input.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("`{0}` not found in environment")]
    Missing(String),

    #[error("`{name}`: {message}")]
    Invalid { name: String, message: String },
}

/// Fetch a required environment variable, logging the outcome.
pub fn load_env_variable(name: &str) -> Result<String, EnvError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => {
            info!("`{name}` loaded: {value}");
            Ok(value)
        }
        _ => {
            error!("`{name}` not found");
            Err(EnvError::Missing(name.to_string()))
        }
    }
}

/// Fetch and parse a required address variable.
pub fn load_address(name: &str) -> Result<Address, EnvError> {
    let raw = load_env_variable(name)?;
    raw.parse().map_err(|e| EnvError::Invalid {
        name: name.to_string(),
        message: format!("{e}"),
    })
}

/// Fetch and parse a comma-separated address list.
pub fn load_address_list(name: &str) -> Result<Vec<Address>, EnvError> {
    let raw = load_env_variable(name)?;
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse().map_err(|e| EnvError::Invalid {
                name: name.to_string(),
                message: format!("{e}"),
            })
        })
        .collect()
}

/// Fetch and parse a required integer-seconds variable.
pub fn load_u64(name: &str) -> Result<u64, EnvError> {
    let raw = load_env_variable(name)?;
    raw.parse().map_err(|e| EnvError::Invalid {
        name: name.to_string(),
        message: format!("{e}"),
    })
}

/// Fetch and parse a required timestamp variable.
pub fn load_timestamp(name: &str) -> Result<Timestamp, EnvError> {
    Ok(Timestamp(load_u64(name)?))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Env var tests run serially enough in practice; each test uses a
    // unique variable name to avoid cross-talk.

    #[test]
    fn missing_variable_names_the_variable() {
        let result = load_env_variable("GATESEAL_TEST_DOES_NOT_EXIST");
        let message = result.expect_err("must be missing").to_string();
        assert!(message.contains("GATESEAL_TEST_DOES_NOT_EXIST"));
    }

    #[test]
    fn loads_address_list() {
        // SAFETY: test-local variable name, not read elsewhere.
        unsafe {
            std::env::set_var(
                "GATESEAL_TEST_SEALABLES",
                "0x0101010101010101010101010101010101010101, \
                 0x0202020202020202020202020202020202020202",
            );
        }
        let list = load_address_list("GATESEAL_TEST_SEALABLES").expect("valid list");
        assert_eq!(
            list,
            vec![Address([0x01; 20]), Address([0x02; 20])]
        );
    }

    #[test]
    fn rejects_malformed_address() {
        unsafe {
            std::env::set_var("GATESEAL_TEST_BAD_ADDRESS", "0x1234");
        }
        let result = load_address("GATESEAL_TEST_BAD_ADDRESS");
        assert!(result.is_err());
    }

    #[test]
    fn loads_u64_seconds() {
        unsafe {
            std::env::set_var("GATESEAL_TEST_DURATION", "604800");
        }
        assert_eq!(load_u64("GATESEAL_TEST_DURATION").ok(), Some(604_800));
    }
}
