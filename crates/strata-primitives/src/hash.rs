//! Fixed-size hash types (H256, H160)

use std::fmt;
use thiserror::Error;

/// Hash parsing error
#[derive(Debug, Error)]
pub enum HashError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid hash length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected byte count
        expected: usize,
        /// Actual byte count
        got: usize,
    },
}

fn copy_exact<const N: usize>(slice: &[u8]) -> Result<[u8; N], HashError> {
    if slice.len() != N {
        return Err(HashError::InvalidLength {
            expected: N,
            got: slice.len(),
        });
    }
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(slice);
    Ok(bytes)
}

fn decode_hex(s: &str) -> Result<Vec<u8>, HashError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| HashError::InvalidHex(e.to_string()))
}

/// 256-bit hash (32 bytes)
///
/// Used for transaction identifiers and block references.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct H256([u8; 32]);

/// Alias for H256
pub type Hash = H256;

impl H256 {
    /// Size in bytes
    pub const LEN: usize = 32;

    /// Zero hash
    pub const ZERO: H256 = H256([0u8; 32]);

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, HashError> {
        copy_exact(slice).map(H256)
    }

    /// Parse from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        Self::from_slice(&decode_hex(s)?)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Convert to bare hex string, the form the ledger RPC uses for ids
    pub fn to_plain_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self.to_hex())
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }
}

impl AsRef<[u8]> for H256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// 160-bit value (20 bytes)
///
/// The account-id part of a ledger address, as seen by contract code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct H160([u8; 20]);

impl H160 {
    /// Size in bytes
    pub const LEN: usize = 20;

    /// Zero value
    pub const ZERO: H160 = H160([0u8; 20]);

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        H160(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, HashError> {
        copy_exact(slice).map(H160)
    }

    /// Parse from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        Self::from_slice(&decode_hex(s)?)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for H160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H160({})", self.to_hex())
    }
}

impl From<[u8; 20]> for H160 {
    fn from(bytes: [u8; 20]) -> Self {
        H160(bytes)
    }
}

impl AsRef<[u8]> for H160 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// RLP implementations (behind feature flag)
#[cfg(feature = "rlp")]
mod rlp_impl {
    use super::*;
    use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

    impl Encodable for H256 {
        fn rlp_append(&self, s: &mut RlpStream) {
            s.encoder().encode_value(&self.0);
        }
    }

    impl Decodable for H256 {
        fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
            rlp.decoder().decode_value(|bytes| {
                copy_exact(bytes).map(H256).map_err(|_| DecoderError::RlpInvalidLength)
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h256_from_hex() {
        let hash = H256::from_hex(
            "0x0000000000000000000000000000000000000000000000000000000000000001",
        )
        .unwrap();
        assert!(!hash.is_zero());
        assert_eq!(hash.as_bytes()[31], 1);
    }

    #[test]
    fn test_h256_plain_hex_has_no_prefix() {
        let hash = H256::from_bytes([0xab; 32]);
        assert_eq!(hash.to_plain_hex(), "ab".repeat(32));
        assert_eq!(hash.to_hex(), format!("0x{}", "ab".repeat(32)));
    }

    #[test]
    fn test_h256_wrong_length() {
        match H256::from_slice(&[0u8; 31]) {
            Err(HashError::InvalidLength { expected, got }) => {
                assert_eq!(expected, 32);
                assert_eq!(got, 31);
            }
            other => panic!("expected InvalidLength, got {:?}", other),
        }
    }

    #[test]
    fn test_h256_invalid_chars() {
        let result = H256::from_hex(&"g".repeat(64));
        assert!(matches!(result, Err(HashError::InvalidHex(_))));
    }

    #[test]
    fn test_h160_roundtrip_hex() {
        let value = H160::from_hex("0x742d35cc6634c0532925a3b844bc9e7595f0ab3d").unwrap();
        assert_eq!(value.to_hex(), "0x742d35cc6634c0532925a3b844bc9e7595f0ab3d");
    }
}
