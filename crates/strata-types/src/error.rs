//! Type decoding errors

use thiserror::Error;

/// Error decoding a serialized ledger type
#[derive(Debug, Error)]
pub enum TypesError {
    /// Malformed RLP payload
    #[error("rlp decode error: {0}")]
    Rlp(#[from] rlp::DecoderError),
}
