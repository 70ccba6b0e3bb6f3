//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// RPC error from node
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// An RPC call exceeded the client-side timeout
    #[error("{operation} timed out after {millis} ms")]
    Timeout {
        /// RPC operation name
        operation: String,
        /// Configured timeout
        millis: u64,
    },

    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Unparsable ABI type descriptor
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// Malformed parameter list or parameter object
    #[error("Invalid param: {0}")]
    InvalidParam(String),

    /// Integer literal that does not parse or does not fit its type
    #[error("Cannot parse {value:?} as {ty}: {reason}")]
    NumericParse {
        /// Offending literal
        value: String,
        /// Target ABI type
        ty: String,
        /// Parser message
        reason: String,
    },

    /// JSON value of the wrong shape for its declared type
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// ABI encoding error
    #[error("ABI encoding error: {0}")]
    AbiEncode(String),

    /// ABI decoding error
    #[error("ABI decoding error: {0}")]
    AbiDecode(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Broadcast rejected by the node
    #[error("bad transaction: {0}")]
    BadTransaction(String),

    /// Contract trigger rejected by the node
    #[error("Trigger failed: {0}")]
    TriggerFailed(String),

    /// Receipt not found within the confirmation budget
    #[error("could not confirm transaction after {seconds} seconds")]
    ConfirmationTimeout {
        /// Configured wait
        seconds: u32,
    },

    /// Transaction was executed but rejected by chain logic
    #[error("On-chain failure ({code}): {message}")]
    OnChain {
        /// Receipt result code
        code: i32,
        /// Receipt message
        message: String,
    },

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<hex::FromHexError> for SdkError {
    fn from(e: hex::FromHexError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<strata_crypto::CryptoError> for SdkError {
    fn from(e: strata_crypto::CryptoError) -> Self {
        SdkError::SigningFailed(e.to_string())
    }
}

impl From<strata_primitives::AddressError> for SdkError {
    fn from(e: strata_primitives::AddressError) -> Self {
        SdkError::InvalidAddress(e.to_string())
    }
}

impl From<strata_primitives::HashError> for SdkError {
    fn from(e: strata_primitives::HashError) -> Self {
        SdkError::InvalidHex(e.to_string())
    }
}

impl From<strata_types::TypesError> for SdkError {
    fn from(e: strata_types::TypesError) -> Self {
        SdkError::Serialization(e.to_string())
    }
}
