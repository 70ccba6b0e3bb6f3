//! CLI error types

use strata_sdk::SdkError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// SDK error
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// Transaction failed on chain after being accepted
    #[error("Transaction {txid} failed on chain: {reason}")]
    OnChain {
        /// Transaction id
        txid: String,
        /// Failure reported by the receipt
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::Config(format!("{:#}", err))
    }
}
