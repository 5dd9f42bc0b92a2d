//! # Blueprint Codec
//!
//! Pure byte transforms for the non-executable template wrapper.
//!
//! A blueprint is compiled instance bytecode prefixed with a marker
//! triplet so the stored template halts immediately if invoked as a
//! live instance. The deploy wrapper prepends a minimal stub that
//! copies the marked payload to memory and returns it verbatim as the
//! deployed code.
//!
//! Wire layout:
//!
//! ```text
//! deploy bytecode:
//!   0x61 <len_hi> <len_lo>      PUSH2 payload length (big-endian)
//!   0x3D 0x81 0x60 0x0A         RETURNDATASIZE DUP2 PUSH1 0x0A
//!   0x3D 0x39 0xF3              RETURNDATASIZE CODECOPY RETURN
//!   <payload>
//!
//! payload (the blueprint itself):
//!   0xFE                        execution-halt marker
//!   0x71                        blueprint identifier
//!   0x00                        format version (low 2 bits reserved)
//!   <instance bytecode>
//! ```
//!
//! Encode and verify are inverses over arbitrary bytecode; everything
//! here is testable on byte sequences alone.

use crate::error::BlueprintError;

// =============================================================================
// FORMAT CONSTANTS
// =============================================================================

/// First marker byte: halts execution if the template is invoked.
pub const EXECUTION_HALT: u8 = 0xFE;

/// Second marker byte: identifies the payload as a blueprint.
pub const BLUEPRINT_IDENTIFIER: u8 = 0x71;

/// Format version byte. The low 2 bits are reserved length-encoding
/// bits; the value with both set is invalid.
pub const VERSION: u8 = 0x00;

/// Mask of the reserved low bits of the version byte.
pub const RESERVED_BITS: u8 = 0b11;

/// The three-byte preamble prefixed to instance bytecode.
pub const PREAMBLE: [u8; 3] = [EXECUTION_HALT, BLUEPRINT_IDENTIFIER, VERSION];

/// PUSH2 opcode opening the deploy stub.
const PUSH2: u8 = 0x61;

/// Fixed copy-and-return tail of the deploy stub.
const STUB_TAIL: [u8; 7] = [0x3D, 0x81, 0x60, 0x0A, 0x3D, 0x39, 0xF3];

/// Total deploy stub length: PUSH2 + 2-byte length + tail.
const STUB_LEN: usize = 10;

// =============================================================================
// ENCODING
// =============================================================================

/// Wrap instance bytecode in the blueprint preamble.
#[must_use]
pub fn encode_blueprint(bytecode: &[u8]) -> Vec<u8> {
    let mut blueprint = Vec::with_capacity(PREAMBLE.len() + bytecode.len());
    blueprint.extend_from_slice(&PREAMBLE);
    blueprint.extend_from_slice(bytecode);
    blueprint
}

/// Build the full deploy bytecode for instance bytecode.
///
/// Fails with [`BlueprintError::LengthOverflow`] if the marked payload
/// does not fit the 2-byte length field.
pub fn deploy_bytecode(bytecode: &[u8]) -> Result<Vec<u8>, BlueprintError> {
    let payload = encode_blueprint(bytecode);
    let length = u16::try_from(payload.len()).map_err(|_| BlueprintError::LengthOverflow)?;

    let mut out = Vec::with_capacity(STUB_LEN + payload.len());
    out.push(PUSH2);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&STUB_TAIL);
    out.extend_from_slice(&payload);
    Ok(out)
}

// =============================================================================
// VERIFICATION
// =============================================================================

/// Verify deployed blueprint code (the post-stub payload).
///
/// Checks exactly the three marker bytes and the reserved-bit
/// constraint; the instance bytecode behind them is opaque here.
pub fn verify_blueprint(code: &[u8]) -> Result<(), BlueprintError> {
    if code.len() < PREAMBLE.len() {
        return Err(BlueprintError::TooShort);
    }
    if code[0] != EXECUTION_HALT {
        return Err(BlueprintError::BadExecutionHalt);
    }
    if code[1] != BLUEPRINT_IDENTIFIER {
        return Err(BlueprintError::BadIdentifier);
    }
    if code[2] & RESERVED_BITS == RESERVED_BITS {
        return Err(BlueprintError::ReservedBits);
    }
    Ok(())
}

/// Verify full deploy bytecode field-by-field.
///
/// Reconstructs the expected stub layout from raw bytes: the PUSH2
/// opcode, the big-endian length field against the actual payload
/// length, the fixed copy-and-return tail, then the embedded blueprint
/// preamble.
pub fn verify_deploy_bytecode(initcode: &[u8]) -> Result<(), BlueprintError> {
    if initcode.len() < STUB_LEN + PREAMBLE.len() {
        return Err(BlueprintError::TooShort);
    }
    if initcode[0] != PUSH2 {
        return Err(BlueprintError::BadStub);
    }
    if initcode[3..STUB_LEN] != STUB_TAIL {
        return Err(BlueprintError::BadStub);
    }

    let declared = u16::from_be_bytes([initcode[1], initcode[2]]) as usize;
    let actual = initcode.len() - STUB_LEN;
    if declared != actual {
        return Err(BlueprintError::LengthMismatch {
            expected: declared,
            actual,
        });
    }

    verify_blueprint(&initcode[STUB_LEN..])
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Extract the blueprint payload (preamble + bytecode) from verified
/// deploy bytecode.
pub fn blueprint_payload(initcode: &[u8]) -> Result<&[u8], BlueprintError> {
    verify_deploy_bytecode(initcode)?;
    Ok(&initcode[STUB_LEN..])
}

/// Extract the raw instance bytecode from verified blueprint code.
pub fn bytecode(code: &[u8]) -> Result<&[u8], BlueprintError> {
    verify_blueprint(code)?;
    Ok(&code[PREAMBLE.len()..])
}

// =============================================================================
// TESTS
// =============================================================================
