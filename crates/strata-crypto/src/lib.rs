//! # strata-crypto
//!
//! Cryptographic primitives for the Strata ledger SDK.
//!
//! - Keccak-256 hashing (contract method selectors, address derivation)
//! - SHA-256 hashing (transaction identifiers)
//! - ECDSA signing/verification (secp256k1)
//! - Public key recovery
//! - Address derivation

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod signature;

pub use error::CryptoError;
pub use hash::{keccak256, sha256};
pub use signature::{
    public_key_to_address, recover_public_key, sign, verify, PrivateKey, PublicKey, Signature,
};
