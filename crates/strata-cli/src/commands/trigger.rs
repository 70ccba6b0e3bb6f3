//! Contract invocation: assemble, sign, broadcast, confirm

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use strata_sdk::{
    Behavior, ContractCaller, Controller, LedgerClient, TransactionInfo, TriggerRequest, Wallet,
};
use tracing::info;

use super::resolve_method;
use crate::{
    config::Config,
    output::{decoded_to_json, Output},
    CliError,
};

/// Call a contract method
#[derive(Debug, Args)]
pub struct TriggerArgs {
    /// Contract address (base58)
    #[arg(short, long)]
    pub contract: String,
    /// Method signature, or method name when --abi is given
    #[arg(short, long)]
    pub method: String,
    /// Parameter list JSON, e.g. '[{"address":"T..."},{"uint256":"1"}]'
    #[arg(short, long, default_value = "")]
    pub params: String,
    /// Contract ABI JSON file
    #[arg(long)]
    pub abi: Option<PathBuf>,
    /// Private key (hex)
    #[arg(short, long, env = "STRATA_PRIVATE_KEY", hide_env_values = true)]
    pub key: String,
    /// Fee limit; overrides the configured one
    #[arg(long)]
    pub fee_limit: Option<u64>,
    /// Native value to send
    #[arg(long, default_value_t = 0)]
    pub call_value: u64,
    /// Token id to send
    #[arg(long, default_value = "")]
    pub token_id: String,
    /// Token amount to send
    #[arg(long, default_value_t = 0)]
    pub token_amount: u64,
    /// Sign only, do not broadcast
    #[arg(long)]
    pub dry_run: bool,
    /// Seconds to wait for the receipt; overrides the configured wait
    #[arg(long)]
    pub wait: Option<u32>,
}

impl TriggerArgs {
    pub async fn execute(self, config: &Config, json: bool) -> Result<(), CliError> {
        let wallet =
            Wallet::from_private_key_hex(&self.key).map_err(|e| CliError::InvalidKey(e.to_string()))?;
        let method = resolve_method(&self.method, self.abi.as_deref())?;
        let from = wallet.address().to_base58();

        let request = TriggerRequest::new(from.clone(), self.contract.clone(), method.clone())
            .params(self.params)
            .fee_limit(self.fee_limit.unwrap_or(config.fee_limit))
            .call_value(self.call_value)
            .token(self.token_id, self.token_amount);

        let client = LedgerClient::connect(&config.client_config());
        let prepared = ContractCaller::new(&client).trigger_contract(&request).await?;
        let constant = ContractCaller::decode_constant_result(&method, &prepared);

        let behavior = Behavior::default()
            .dry_run(self.dry_run)
            .confirmation_wait(self.wait.unwrap_or(config.confirmation_wait));
        let mut controller = Controller::new(&client, Some(&wallet), prepared.transaction, behavior);
        controller.execute().await?;

        let txid = controller.transaction_hash().to_plain_hex();
        if let Some(err) = controller.result_error() {
            return Err(CliError::OnChain {
                txid,
                reason: err.to_string(),
            });
        }
        info!(%txid, "Contract call finished");

        let mut out = Output::new(json)
            .field("txid", &txid)
            .field("from", &from)
            .field("contract", &self.contract)
            .field_value("dry_run", Value::Bool(self.dry_run));
        if let Some(decoded) = &constant {
            out = out.field_value("constant_result", decoded_to_json(decoded));
        }

        out = if self.dry_run {
            let signed = hex::encode(controller.transaction().encode());
            out.field("transaction", &signed)
                .line(format!("Signed transaction {} (not broadcast)", txid))
                .line(signed)
        } else {
            match controller.receipt() {
                Some(receipt) if *receipt != TransactionInfo::default() => out
                    .field_u64("block_number", receipt.block_number)
                    .field_u64("fee", receipt.fee)
                    .field_u64("energy_usage_total", receipt.receipt.energy_usage_total)
                    .line(format!(
                        "Transaction {} confirmed in block {}",
                        txid, receipt.block_number
                    )),
                _ => out.line(format!("Transaction {} broadcast", txid)),
            }
        };
        if let Some(decoded) = &constant {
            out = out.line(format!("Constant result: {}", decoded_to_json(decoded)));
        }
        out.print();
        Ok(())
    }
}
