//! Transaction id computation

use clap::Args;
use strata_types::Transaction;

use crate::{output::Output, CliError};

/// Compute the id of a hex-encoded transaction
#[derive(Debug, Args)]
pub struct TxidArgs {
    /// Transaction as hex RLP
    #[arg(long)]
    pub tx: String,
    /// Replace the fee limit before hashing
    #[arg(long)]
    pub fee_limit: Option<u64>,
}

impl TxidArgs {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let encoded = self.tx.strip_prefix("0x").unwrap_or(&self.tx);
        let bytes = hex::decode(encoded).map_err(|e| CliError::InvalidHex(e.to_string()))?;
        let mut tx = Transaction::decode(&bytes)
            .map_err(|e| CliError::InvalidInput(format!("transaction: {}", e)))?;

        if let Some(fee_limit) = self.fee_limit {
            tx.raw_data.fee_limit = fee_limit;
        }
        let txid = tx.txid().to_plain_hex();

        Output::new(json)
            .field("txid", &txid)
            .field_u64("fee_limit", tx.raw_data.fee_limit)
            .field_u64("signatures", tx.signatures.len() as u64)
            .line(txid)
            .print();
        Ok(())
    }
}
