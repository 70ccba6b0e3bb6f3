//! # strata-types
//!
//! Ledger transaction types for the Strata SDK.
//!
//! This crate provides:
//! - [`Transaction`](transaction::Transaction) - raw data plus signatures
//! - [`TransactionExtension`](transaction::TransactionExtension) - a server-prepared transaction with its id
//! - [`TransactionInfo`](receipt::TransactionInfo) - the on-chain execution record

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
pub mod receipt;
pub mod transaction;

pub use error::TypesError;
pub use receipt::{ContractResult, Log, ResourceReceipt, TransactionInfo};
pub use transaction::{
    transaction_id_hash, RawData, Return, ReturnCode, Transaction, TransactionExtension,
    TriggerSmartContract,
};
