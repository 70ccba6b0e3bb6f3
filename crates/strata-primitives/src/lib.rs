//! # strata-primitives
//!
//! Primitive types for the Strata ledger SDK.
//!
//! This crate provides the 21-byte ledger [`Address`] with its base58check
//! text form, fixed-size hashes and the re-exported [`U256`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;

pub use address::{Address, AddressError, ADDRESS_PREFIX};
pub use error::PrimitiveError;
pub use hash::{Hash, HashError, H160, H256};

// Re-export primitive-types for U256
pub use primitive_types::U256;
