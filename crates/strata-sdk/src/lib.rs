//! # strata-sdk
//!
//! Rust SDK for invoking smart contracts on the Strata ledger.
//!
//! ## Features
//!
//! - **ABI**: type resolution, JSON value coercion, call payload packing
//! - **LedgerClient**: RPC client with per-call timeouts
//! - **Wallet**: secp256k1 signing of transaction ids
//! - **ContractCaller**: builds contract calls and has the node prepare them
//! - **Controller**: signs, broadcasts and confirms a transaction
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strata_sdk::{
//!     Behavior, ClientConfig, ContractCaller, Controller, LedgerClient, TriggerRequest, Wallet,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LedgerClient::connect(&ClientConfig::new("http://127.0.0.1:8090/jsonrpc"));
//!     let wallet = Wallet::from_private_key_hex(
//!         "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
//!     )?;
//!
//!     let request = TriggerRequest::new(
//!         wallet.address().to_base58(),
//!         "TBXSw8fM4jpQkGc6zZjsVABFpVN7UvXPdV",
//!         "transfer(address,uint256)",
//!     )
//!     .params(r#"[{"address":"TLZVYZskxoJt4M4bYHPJm5hdM4PUWSGNPr"},{"uint256":"1000"}]"#)
//!     .fee_limit(10_000_000);
//!
//!     let prepared = ContractCaller::new(&client).trigger_contract(&request).await?;
//!
//!     let mut controller = Controller::new(
//!         &client,
//!         Some(&wallet),
//!         prepared.transaction,
//!         Behavior::with_confirmation(),
//!     );
//!     controller.execute().await?;
//!     if let Some(err) = controller.result_error() {
//!         eprintln!("failed on chain: {}", err);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
mod client;
mod config;
pub mod contract;
mod controller;
mod error;
mod transport;
pub mod types;
mod wallet;

// Re-export main types
pub use client::{methods, LedgerClient, LedgerRpc};
pub use config::{ClientConfig, DEFAULT_RPC_TIMEOUT_MS, DEFAULT_RPC_URL};
pub use contract::{ContractCaller, MethodRef, TriggerRequest};
pub use controller::{Behavior, Controller, ExecutionOutcome, SigningMode, DEFAULT_CONFIRMATION_WAIT};
pub use error::SdkError;
pub use transport::{MockTransport, RecordedCall};
pub use wallet::{Signer, Wallet};

/// Re-export Transport trait for custom implementations
pub use transport::Transport;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use strata_primitives::{Address, H160, H256, U256};
pub use strata_types::{
    transaction_id_hash, RawData, Return, ReturnCode, Transaction, TransactionExtension,
    TransactionInfo, TriggerSmartContract,
};
