//! Payload framing: bytes to one big integer and back.

use super::bigint::PayloadInteger;
use crate::error::StegoError;
use serde::{Deserialize, Serialize};

/// Width of the length header in bytes.
pub const HEADER_LEN: usize = 4;

/// Closes a length-prefixed payload. Being the most significant byte, it
/// fixes the exact byte length of the packed integer.
pub const TERMINATOR: u8 = 0x01;

/// How payload bytes are packed into the integer the walk consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framing {
    /// `u32` little-endian byte count, the payload, then [`TERMINATOR`],
    /// read as one little-endian integer.
    #[default]
    LengthPrefixed,
    /// Payload bytes alone as a little-endian integer. Trailing zero bytes
    /// do not survive.
    Bare,
}

impl Framing {
    /// Build the integer for `payload`.
    pub fn pack(self, payload: &[u8]) -> Result<PayloadInteger, StegoError> {
        match self {
            Framing::Bare => Ok(PayloadInteger::from_le_bytes(payload)),
            Framing::LengthPrefixed => {
                let len = u32::try_from(payload.len())
                    .map_err(|_| StegoError::PayloadTooLarge(payload.len()))?;
                let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len() + 1);
                bytes.extend_from_slice(&len.to_le_bytes());
                bytes.extend_from_slice(payload);
                bytes.push(TERMINATOR);
                Ok(PayloadInteger::from_le_bytes(&bytes))
            }
        }
    }

    /// Recover the payload from a reconstructed integer.
    pub fn unpack(self, value: &PayloadInteger) -> Result<Vec<u8>, StegoError> {
        let mut bytes = value.to_le_bytes();
        match self {
            Framing::Bare => Ok(bytes),
            Framing::LengthPrefixed => {
                if bytes.len() <= HEADER_LEN {
                    return Err(StegoError::MalformedPayload(format!(
                        "{} significant bytes cannot hold a length header",
                        bytes.len()
                    )));
                }
                let mut header = [0u8; HEADER_LEN];
                header.copy_from_slice(&bytes[..HEADER_LEN]);
                let len = u32::from_le_bytes(header) as usize;

                // Header, body and terminator must account for every byte
                if bytes.len() - HEADER_LEN != len.saturating_add(1) {
                    return Err(StegoError::MalformedPayload(format!(
                        "header announces {len} bytes but {} follow",
                        bytes.len() - HEADER_LEN - 1
                    )));
                }
                if bytes.pop() != Some(TERMINATOR) {
                    return Err(StegoError::MalformedPayload(
                        "missing payload terminator".into(),
                    ));
                }
                Ok(bytes.split_off(HEADER_LEN))
            }
        }
    }
}
