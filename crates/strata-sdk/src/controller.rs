//! Transaction execution: sign, broadcast, confirm

use std::time::Duration;

use strata_primitives::H256;
use strata_types::{transaction_id_hash, Return, Transaction, TransactionInfo};
use tracing::{debug, info, warn};

use crate::client::LedgerRpc;
use crate::wallet::Signer;
use crate::SdkError;

/// Confirmation wait applied by [`Behavior::with_confirmation`], in seconds
pub const DEFAULT_CONFIRMATION_WAIT: u32 = 20;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Where signatures come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningMode {
    /// Sign with the controller's [`Signer`]
    #[default]
    Software,
    /// The transaction arrives already signed; skip signing
    Offline,
}

/// Controller options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Behavior {
    /// Sign only; never broadcast or confirm
    pub dry_run: bool,
    /// Signing source
    pub signing: SigningMode,
    /// Seconds to poll for the receipt after broadcast; 0 skips confirmation
    pub confirmation_wait: u32,
}

impl Behavior {
    /// Defaults plus the standard confirmation wait
    pub fn with_confirmation() -> Self {
        Self {
            confirmation_wait: DEFAULT_CONFIRMATION_WAIT,
            ..Default::default()
        }
    }

    /// Set dry-run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the signing source
    pub fn signing(mut self, signing: SigningMode) -> Self {
        self.signing = signing;
        self
    }

    /// Set the confirmation wait in seconds
    pub fn confirmation_wait(mut self, seconds: u32) -> Self {
        self.confirmation_wait = seconds;
        self
    }
}

/// Everything a finished controller knows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Final transaction (signed unless offline)
    pub transaction: Transaction,
    /// Local failure: signing, transport, rejection, or confirmation timeout
    pub execution_error: Option<SdkError>,
    /// On-chain failure reported by the receipt
    pub result_error: Option<SdkError>,
    /// Broadcast acknowledgment
    pub result: Option<Return>,
    /// Receipt, or an empty placeholder when confirmation was not requested
    pub receipt: Option<TransactionInfo>,
}

/// Drives one transaction through sign, send and confirm
///
/// Each step is skipped once an execution error is recorded. An on-chain
/// failure is kept apart in the result error, so a transaction can be sent
/// successfully and still fail on chain. Not meant to be shared between
/// tasks.
pub struct Controller<'a> {
    rpc: &'a dyn LedgerRpc,
    signer: Option<&'a dyn Signer>,
    behavior: Behavior,
    transaction: Transaction,
    execution_error: Option<SdkError>,
    result_error: Option<SdkError>,
    result: Option<Return>,
    receipt: Option<TransactionInfo>,
}

impl<'a> Controller<'a> {
    /// Create a controller for `transaction`
    ///
    /// `signer` may be `None` only with [`SigningMode::Offline`].
    pub fn new(
        rpc: &'a dyn LedgerRpc,
        signer: Option<&'a dyn Signer>,
        transaction: Transaction,
        behavior: Behavior,
    ) -> Self {
        Self {
            rpc,
            signer,
            behavior,
            transaction,
            execution_error: None,
            result_error: None,
            result: None,
            receipt: None,
        }
    }

    /// Run the pipeline; the returned error mirrors [`Self::execution_error`]
    pub async fn execute(&mut self) -> Result<(), SdkError> {
        if self.behavior.signing == SigningMode::Software {
            self.sign();
        }
        self.send().await;
        self.confirm().await;

        match &self.execution_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn sign(&mut self) {
        if self.execution_error.is_some() {
            return;
        }
        let Some(signer) = self.signer else {
            self.fail(SdkError::SigningFailed("no signer configured".to_string()));
            return;
        };

        // Signing consumes the transaction; keep a copy for the failure path
        match signer.sign_transaction(self.transaction.clone()) {
            Ok(signed) => {
                debug!(txid = %self.transaction_hash(), signer = %signer.address(), "Signed transaction");
                self.transaction = signed;
            }
            Err(e) => self.fail(e),
        }
    }

    async fn send(&mut self) {
        if self.execution_error.is_some() || self.behavior.dry_run {
            return;
        }

        let result = match self.rpc.broadcast_transaction(&self.transaction).await {
            Ok(result) => result,
            Err(e) => {
                self.fail(e);
                return;
            }
        };

        if result.is_error() || !result.result {
            self.fail(SdkError::BadTransaction(result.message.clone()));
        } else {
            info!(txid = %self.transaction_hash(), "Broadcast transaction");
        }
        self.result = Some(result);
    }

    async fn confirm(&mut self) {
        if self.execution_error.is_some() || self.behavior.dry_run {
            return;
        }

        let wait = self.behavior.confirmation_wait;
        if wait == 0 {
            self.receipt = Some(TransactionInfo::default());
            return;
        }

        let txid = self.transaction_hash();
        // One lookup per second, the first immediately: wait + 1 in all
        for attempt in 0..=wait {
            if attempt > 0 {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
            match self.rpc.get_transaction_info_by_id(&txid).await {
                Ok(Some(info)) => {
                    if info.is_failed() {
                        warn!(%txid, code = info.result, message = %info.res_message, "Transaction failed on chain");
                        self.result_error = Some(SdkError::OnChain {
                            code: info.result,
                            message: info.res_message.clone(),
                        });
                    } else {
                        info!(%txid, block = info.block_number, "Transaction confirmed");
                    }
                    self.receipt = Some(info);
                    return;
                }
                Ok(None) => debug!(%txid, attempt, "Transaction not yet confirmed"),
                Err(e) => debug!(%txid, attempt, error = %e, "Transaction info lookup failed"),
            }
        }

        self.fail(SdkError::ConfirmationTimeout { seconds: wait });
    }

    fn fail(&mut self, error: SdkError) {
        warn!(error = %error, "Transaction execution failed");
        self.execution_error = Some(error);
    }

    /// Transaction id: SHA-256 over the current raw data
    pub fn transaction_hash(&self) -> H256 {
        transaction_id_hash(&self.transaction.raw_data)
    }

    /// Serialized raw data
    pub fn raw_data_bytes(&self) -> Vec<u8> {
        self.transaction.raw_data.encode()
    }

    /// Options in effect
    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// The transaction as it currently stands
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Local failure, if any
    pub fn execution_error(&self) -> Option<&SdkError> {
        self.execution_error.as_ref()
    }

    /// On-chain failure, if any
    pub fn result_error(&self) -> Option<&SdkError> {
        self.result_error.as_ref()
    }

    /// Broadcast acknowledgment
    pub fn result(&self) -> Option<&Return> {
        self.result.as_ref()
    }

    /// Receipt
    pub fn receipt(&self) -> Option<&TransactionInfo> {
        self.receipt.as_ref()
    }

    /// Consume the controller
    pub fn into_outcome(self) -> ExecutionOutcome {
        ExecutionOutcome {
            transaction: self.transaction,
            execution_error: self.execution_error,
            result_error: self.result_error,
            result: self.result,
            receipt: self.receipt,
        }
    }
}
