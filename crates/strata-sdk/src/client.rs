//! LedgerClient - RPC client for a ledger node

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use strata_primitives::H256;
use strata_types::{Return, Transaction, TransactionExtension, TransactionInfo, TriggerSmartContract};
use tracing::debug;

use crate::config::ClientConfig;
use crate::transport::{deserialize_response, Transport};
use crate::types::{ReturnJson, TransactionExtensionJson, TransactionInfoJson, TriggerSmartContractJson};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// RPC method names
pub mod methods {
    /// Prepare a contract call transaction
    pub const TRIGGER_SMART_CONTRACT: &str = "wallet_triggersmartcontract";
    /// Submit a signed transaction
    pub const BROADCAST_TRANSACTION: &str = "wallet_broadcasttransaction";
    /// Look up an execution record
    pub const GET_TRANSACTION_INFO_BY_ID: &str = "wallet_gettransactioninfobyid";
}

/// The node operations the SDK depends on
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Have the node prepare an unsigned contract call
    async fn trigger_contract(
        &self,
        contract: &TriggerSmartContract,
    ) -> Result<TransactionExtension, SdkError>;

    /// Submit a transaction; the returned record carries the node's verdict
    async fn broadcast_transaction(&self, tx: &Transaction) -> Result<Return, SdkError>;

    /// Fetch the execution record of a transaction, `None` if not (yet) known
    async fn get_transaction_info_by_id(&self, id: &H256)
        -> Result<Option<TransactionInfo>, SdkError>;
}

/// Ledger client over a [`Transport`]
///
/// Every call is bounded by the configured timeout.
pub struct LedgerClient {
    transport: Box<dyn Transport>,
    timeout: Duration,
}

impl LedgerClient {
    /// Create a client with HTTP transport
    #[cfg(feature = "http")]
    pub fn connect(config: &ClientConfig) -> Self {
        Self {
            transport: Box::new(HttpTransport::new(&config.rpc_url)),
            timeout: config.rpc_timeout(),
        }
    }

    /// Create a client with a custom transport and the default timeout
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            timeout: ClientConfig::default().rpc_timeout(),
        }
    }

    /// Replace the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        let value = self
            .bounded(method, self.transport.request_json(method, params))
            .await?;
        deserialize_response(value)
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, SdkError>>,
    ) -> Result<T, SdkError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| SdkError::Timeout {
                operation: operation.to_string(),
                millis: saturating_millis(self.timeout),
            })?
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl LedgerRpc for LedgerClient {
    async fn trigger_contract(
        &self,
        contract: &TriggerSmartContract,
    ) -> Result<TransactionExtension, SdkError> {
        let body = serde_json::to_value(TriggerSmartContractJson::from(contract))?;
        let response: TransactionExtensionJson =
            self.request(methods::TRIGGER_SMART_CONTRACT, vec![body]).await?;
        response.into_extension(contract)
    }

    async fn broadcast_transaction(&self, tx: &Transaction) -> Result<Return, SdkError> {
        let encoded = hex::encode(tx.encode());
        let response: ReturnJson = self
            .request(methods::BROADCAST_TRANSACTION, vec![Value::String(encoded)])
            .await?;
        Ok(response.into())
    }

    async fn get_transaction_info_by_id(
        &self,
        id: &H256,
    ) -> Result<Option<TransactionInfo>, SdkError> {
        let response: TransactionInfoJson = self
            .request(
                methods::GET_TRANSACTION_INFO_BY_ID,
                vec![Value::String(id.to_plain_hex())],
            )
            .await?;

        if response.id.is_empty() {
            return Ok(None);
        }
        let info = TransactionInfo::try_from(response)?;
        if info.id != *id {
            debug!(requested = %id, returned = %info.id, "Transaction info id mismatch");
            return Ok(None);
        }
        Ok(Some(info))
    }
}
