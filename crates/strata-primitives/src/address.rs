//! Ledger address type (21 bytes)
//!
//! A ledger address is a one-byte network prefix followed by the 20-byte
//! account id. Its text form is base58 with a 4-byte double-sha256 checksum.

use sha2::{Digest, Sha256};
use std::fmt;
use thiserror::Error;

use crate::hash::H160;

/// Network prefix byte of every mainnet address
pub const ADDRESS_PREFIX: u8 = 0x41;

const CHECKSUM_LEN: usize = 4;

/// Address parsing error
#[derive(Debug, Error)]
pub enum AddressError {
    /// Not a base58 string
    #[error("invalid base58 string: {0}")]
    InvalidBase58(String),
    /// Checksum does not match payload
    #[error("invalid address checksum")]
    InvalidChecksum,
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid address length: expected 21 bytes, got {0}")]
    InvalidLength(usize),
    /// First byte is not the network prefix
    #[error("invalid address prefix: 0x{0:02x}")]
    InvalidPrefix(u8),
}

/// 21-byte ledger address (`0x41` prefix + account id)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 21]);

impl Address {
    /// Size of address in bytes
    pub const LEN: usize = 21;

    /// Build an address from a 20-byte account id
    pub fn from_account_id(id: H160) -> Self {
        let mut bytes = [0u8; 21];
        bytes[0] = ADDRESS_PREFIX;
        bytes[1..].copy_from_slice(id.as_bytes());
        Address(bytes)
    }

    /// Create address from slice, checking length and prefix
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        if slice.len() != Self::LEN {
            return Err(AddressError::InvalidLength(slice.len()));
        }
        if slice[0] != ADDRESS_PREFIX {
            return Err(AddressError::InvalidPrefix(slice[0]));
        }
        let mut bytes = [0u8; 21];
        bytes.copy_from_slice(slice);
        Ok(Address(bytes))
    }

    /// Parse address from hex string (with or without 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Parse the base58check text form (e.g. `TRu2DruRJDjVsqno7CwXMzJb7vQTpVaKmL`)
    pub fn from_base58(s: &str) -> Result<Self, AddressError> {
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::InvalidBase58(e.to_string()))?;
        if decoded.len() <= CHECKSUM_LEN {
            return Err(AddressError::InvalidLength(decoded.len()));
        }
        let (payload, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
        if checksum_of(payload) != checksum {
            return Err(AddressError::InvalidChecksum);
        }
        Self::from_slice(payload)
    }

    /// Encode to the base58check text form
    pub fn to_base58(&self) -> String {
        let mut data = self.0.to_vec();
        data.extend_from_slice(&checksum_of(&self.0));
        bs58::encode(data).into_string()
    }

    /// Get as byte array
    pub fn as_bytes(&self) -> &[u8; 21] {
        &self.0
    }

    /// The trailing 20 bytes, without the network prefix
    pub fn account_id(&self) -> H160 {
        let mut id = [0u8; 20];
        id.copy_from_slice(&self.0[1..]);
        H160::from_bytes(id)
    }

    /// Convert to hex string (no 0x prefix, as the ledger RPC expects)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

fn checksum_of(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&second[..CHECKSUM_LEN]);
    out
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// RLP implementation (behind feature flag)
#[cfg(feature = "rlp")]
mod rlp_impl {
    use super::*;
    use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

    impl Encodable for Address {
        fn rlp_append(&self, s: &mut RlpStream) {
            s.encoder().encode_value(&self.0);
        }
    }

    impl Decodable for Address {
        fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
            rlp.decoder().decode_value(|bytes| {
                Address::from_slice(bytes).map_err(|_| DecoderError::Custom("invalid address"))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "TRu2DruRJDjVsqno7CwXMzJb7vQTpVaKmL";
    const SAMPLE_HEX: &str = "41aeb759c19724572e31d4bc8f7d9d5f3161b056ca";

    #[test]
    fn test_address_from_base58() {
        let addr = Address::from_base58(SAMPLE).unwrap();
        assert_eq!(addr.to_hex(), SAMPLE_HEX);
        assert_eq!(addr.as_bytes()[0], ADDRESS_PREFIX);
    }

    #[test]
    fn test_address_to_base58() {
        let addr = Address::from_hex(SAMPLE_HEX).unwrap();
        assert_eq!(addr.to_base58(), SAMPLE);
        assert_eq!(addr.to_string(), SAMPLE);
    }

    #[test]
    fn test_zero_account_address() {
        let addr = Address::from_account_id(H160::ZERO);
        assert_eq!(addr.to_base58(), "T9yD14Nj9j7xAB4dbGeiX9h8unkKHxuWwb");
    }

    #[test]
    fn test_account_id_drops_prefix() {
        let addr = Address::from_base58("TLZVYZskxoJt4M4bYHPJm5hdM4PUWSGNPr").unwrap();
        assert_eq!(
            addr.account_id().to_hex(),
            "0x742d35cc6634c0532925a3b844bc9e7595f0ab3d"
        );
    }

    #[test]
    fn test_address_bad_checksum() {
        // Last character changed
        let result = Address::from_base58("TRu2DruRJDjVsqno7CwXMzJb7vQTpVaKmM");
        assert!(matches!(result, Err(AddressError::InvalidChecksum)));
    }

    #[test]
    fn test_address_not_base58() {
        // '0' and 'l' are outside the base58 alphabet
        let result = Address::from_base58("T0l");
        assert!(matches!(result, Err(AddressError::InvalidBase58(_))));
    }

    #[test]
    fn test_address_wrong_prefix() {
        // Valid base58check of a 21-byte payload with prefix 0xa0
        let result = Address::from_base58("27QdkUSyiWsqeSSrLKRP9Z52zcQqixUBbF3");
        assert!(matches!(result, Err(AddressError::InvalidPrefix(0xa0))));
    }

    #[test]
    fn test_address_wrong_length() {
        let result = Address::from_hex("41aeb759");
        assert!(matches!(result, Err(AddressError::InvalidLength(4))));
    }

    #[test]
    fn test_address_from_str() {
        let addr: Address = SAMPLE.parse().unwrap();
        assert_eq!(addr.to_hex(), SAMPLE_HEX);
    }
}
