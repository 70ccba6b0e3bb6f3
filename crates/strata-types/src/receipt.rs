//! On-chain execution records

use bytes::Bytes;
use strata_primitives::{Address, H160, H256};

/// Contract-level outcome recorded in a resource receipt
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ContractResult {
    /// Not reported
    #[default]
    Default,
    /// Executed successfully
    Success,
    /// Reverted by contract code
    Revert,
    /// Ran out of energy
    OutOfEnergy,
    /// Any other failure, with the node's label
    Failed,
}

impl ContractResult {
    /// Parse the node's label (e.g. `"SUCCESS"`, `"REVERT"`)
    pub fn from_label(label: &str) -> Self {
        match label {
            "" | "DEFAULT" => ContractResult::Default,
            "SUCCESS" => ContractResult::Success,
            "REVERT" => ContractResult::Revert,
            "OUT_OF_ENERGY" => ContractResult::OutOfEnergy,
            _ => ContractResult::Failed,
        }
    }
}

/// Resources consumed by a transaction
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ResourceReceipt {
    /// Energy consumed from the caller's staked balance
    pub energy_usage: u64,
    /// Fee paid for energy
    pub energy_fee: u64,
    /// Energy paid by the contract origin
    pub origin_energy_usage: u64,
    /// Total energy
    pub energy_usage_total: u64,
    /// Bandwidth consumed
    pub net_usage: u64,
    /// Fee paid for bandwidth
    pub net_fee: u64,
    /// Contract outcome
    pub result: ContractResult,
}

/// Event log emitted during contract execution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    /// Emitting contract (account id)
    pub address: H160,
    /// Indexed topics
    pub topics: Vec<H256>,
    /// Non-indexed data
    pub data: Bytes,
}

impl Log {
    /// First topic, usually the event signature hash
    pub fn topic0(&self) -> Option<&H256> {
        self.topics.first()
    }
}

/// Transaction info as returned by the "transaction info by id" lookup
///
/// `TransactionInfo::default()` is the empty placeholder attached when no
/// confirmation was requested.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TransactionInfo {
    /// Transaction id
    pub id: H256,
    /// Total fee charged
    pub fee: u64,
    /// Block that included the transaction
    pub block_number: u64,
    /// Block timestamp (ms)
    pub block_timestamp: u64,
    /// Contract return data
    pub contract_result: Vec<Bytes>,
    /// Created contract, for deployments
    pub contract_address: Option<Address>,
    /// Resource usage
    pub receipt: ResourceReceipt,
    /// Emitted logs
    pub logs: Vec<Log>,
    /// 0 on success, non-zero on on-chain failure
    pub result: i32,
    /// Failure description
    pub res_message: String,
}

impl TransactionInfo {
    /// Whether the chain rejected the transaction
    pub fn is_failed(&self) -> bool {
        self.result != 0
    }
}
