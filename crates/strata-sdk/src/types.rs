//! JSON wire shapes exchanged with a ledger node
//!
//! Binary fields travel as hex strings without `0x`; transactions travel as
//! hex-encoded RLP.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strata_primitives::{Address, H160, H256};
use strata_types::{
    ContractResult, Log, ResourceReceipt, Return, ReturnCode, Transaction, TransactionExtension,
    TransactionInfo, TriggerSmartContract,
};

use crate::SdkError;

/// Contract trigger request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSmartContractJson {
    /// Caller address (hex)
    pub owner_address: String,
    /// Contract address (hex)
    pub contract_address: String,
    /// Call payload (hex)
    pub data: String,
    /// Native value
    #[serde(default, skip_serializing_if = "is_zero")]
    pub call_value: u64,
    /// Token amount
    #[serde(default, skip_serializing_if = "is_zero")]
    pub call_token_value: u64,
    /// Token id
    #[serde(default, skip_serializing_if = "is_zero")]
    pub token_id: u64,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl From<&TriggerSmartContract> for TriggerSmartContractJson {
    fn from(contract: &TriggerSmartContract) -> Self {
        Self {
            owner_address: contract.owner_address.to_hex(),
            contract_address: contract.contract_address.to_hex(),
            data: hex::encode(&contract.data),
            call_value: contract.call_value,
            call_token_value: contract.call_token_value,
            token_id: contract.token_id,
        }
    }
}

/// Node acknowledgment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnJson {
    /// Acceptance flag
    #[serde(default)]
    pub result: bool,
    /// Response code
    #[serde(default)]
    pub code: i32,
    /// Message
    #[serde(default)]
    pub message: String,
}

impl From<ReturnJson> for Return {
    fn from(json: ReturnJson) -> Self {
        Return {
            result: json.result,
            code: ReturnCode::from(json.code),
            message: json.message,
        }
    }
}

/// Prepared transaction returned by a trigger call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionExtensionJson {
    /// Preparation outcome
    #[serde(default)]
    pub result: ReturnJson,
    /// Transaction id (hex)
    #[serde(default)]
    pub txid: String,
    /// Transaction (hex RLP), absent when preparation failed
    #[serde(default)]
    pub transaction: Option<String>,
    /// Constant call results (hex)
    #[serde(default)]
    pub constant_result: Vec<String>,
}

impl TransactionExtensionJson {
    /// Convert to the domain type
    ///
    /// A rejected call may come without a transaction; it gets an unsigned
    /// one wrapping `request` so the caller can still inspect the result
    /// code. An accepted call without a transaction is an error.
    pub fn into_extension(
        self,
        request: &TriggerSmartContract,
    ) -> Result<TransactionExtension, SdkError> {
        let transaction = match self.transaction.as_deref() {
            Some(encoded) if !encoded.is_empty() => {
                Transaction::decode(&parse_hex_bytes(encoded)?)?
            }
            _ if self.result.code != 0 => {
                Transaction::new(strata_types::RawData::new(request.clone()))
            }
            _ if !self.result.message.is_empty() => {
                return Err(SdkError::TriggerFailed(self.result.message));
            }
            _ => {
                return Err(SdkError::TriggerFailed("node returned no transaction".to_string()));
            }
        };

        let mut extension = TransactionExtension::new(transaction, self.result.into());
        // Keep the node's id as issued
        if !self.txid.is_empty() {
            extension.txid = H256::from_hex(&self.txid)?;
        }
        extension.constant_result = self
            .constant_result
            .iter()
            .map(|r| parse_hex_bytes(r).map(Bytes::from))
            .collect::<Result<_, _>>()?;
        Ok(extension)
    }
}

/// Resource usage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceReceiptJson {
    /// Energy from stake
    pub energy_usage: u64,
    /// Energy fee
    pub energy_fee: u64,
    /// Energy paid by the contract origin
    pub origin_energy_usage: u64,
    /// Total energy
    pub energy_usage_total: u64,
    /// Bandwidth
    pub net_usage: u64,
    /// Bandwidth fee
    pub net_fee: u64,
    /// Contract outcome label
    pub result: String,
}

/// Event log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogJson {
    /// Emitting contract account id (hex)
    pub address: String,
    /// Topics (hex)
    pub topics: Vec<String>,
    /// Data (hex)
    pub data: String,
}

/// Transaction info lookup response; an empty object means not found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionInfoJson {
    /// Transaction id (hex)
    pub id: String,
    /// Fee
    pub fee: u64,
    /// Block number
    pub block_number: u64,
    /// Block timestamp
    pub block_timestamp: u64,
    /// Contract return data (hex)
    pub contract_result: Vec<String>,
    /// Created contract address (hex)
    pub contract_address: Option<String>,
    /// Resource usage
    pub receipt: ResourceReceiptJson,
    /// Logs
    pub log: Vec<LogJson>,
    /// 0 on success
    pub result: i32,
    /// Failure message
    pub res_message: String,
}

impl TryFrom<TransactionInfoJson> for TransactionInfo {
    type Error = SdkError;

    fn try_from(json: TransactionInfoJson) -> Result<Self, SdkError> {
        let contract_address = match json.contract_address.as_deref() {
            Some(hex) if !hex.is_empty() => Some(Address::from_hex(hex)?),
            _ => None,
        };
        let logs = json
            .log
            .into_iter()
            .map(|log| {
                Ok(Log {
                    address: H160::from_hex(&log.address)?,
                    topics: log
                        .topics
                        .iter()
                        .map(|t| H256::from_hex(t))
                        .collect::<Result<_, _>>()?,
                    data: parse_hex_bytes(&log.data)?.into(),
                })
            })
            .collect::<Result<_, SdkError>>()?;

        Ok(TransactionInfo {
            id: H256::from_hex(&json.id)?,
            fee: json.fee,
            block_number: json.block_number,
            block_timestamp: json.block_timestamp,
            contract_result: json
                .contract_result
                .iter()
                .map(|r| parse_hex_bytes(r).map(Bytes::from))
                .collect::<Result<_, _>>()?,
            contract_address,
            receipt: ResourceReceipt {
                energy_usage: json.receipt.energy_usage,
                energy_fee: json.receipt.energy_fee,
                origin_energy_usage: json.receipt.origin_energy_usage,
                energy_usage_total: json.receipt.energy_usage_total,
                net_usage: json.receipt.net_usage,
                net_fee: json.receipt.net_fee,
                result: ContractResult::from_label(&json.receipt.result),
            },
            logs,
            result: json.result,
            res_message: json.res_message,
        })
    }
}

/// Decode hex with or without `0x`
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strata_types::RawData;

    fn sample_contract() -> TriggerSmartContract {
        TriggerSmartContract::new(
            Address::from_account_id(H160::from_bytes([0x11; 20])),
            Address::from_account_id(H160::ZERO),
            vec![0xa9, 0x05, 0x9c, 0xbb],
        )
    }

    #[test]
    fn test_trigger_json_omits_zero_values() {
        let json = serde_json::to_value(TriggerSmartContractJson::from(&sample_contract())).unwrap();
        assert_eq!(
            json,
            json!({
                "owner_address": "411111111111111111111111111111111111111111",
                "contract_address": "410000000000000000000000000000000000000000",
                "data": "a9059cbb",
            })
        );
    }

    #[test]
    fn test_extension_keeps_node_txid() {
        let tx = Transaction::new(RawData::new(sample_contract()));
        let wire = TransactionExtensionJson {
            result: ReturnJson { result: true, code: 0, message: String::new() },
            txid: "ab".repeat(32),
            transaction: Some(hex::encode(tx.encode())),
            constant_result: vec!["0001".to_string()],
        };

        let ext = wire.into_extension(&sample_contract()).unwrap();
        assert_eq!(ext.transaction, tx);
        assert_eq!(ext.txid, H256::from_bytes([0xab; 32]));
        assert_eq!(ext.constant_result, vec![Bytes::from_static(&[0, 1])]);
        assert!(ext.result.result);
    }

    #[test]
    fn test_extension_without_transaction() {
        let wire: TransactionExtensionJson = serde_json::from_value(json!({
            "result": {"result": false, "code": 2, "message": "contract validate error"}
        }))
        .unwrap();

        let ext = wire.into_extension(&sample_contract()).unwrap();
        assert!(ext.result.is_error());
        assert_eq!(ext.transaction.raw_data.contract, sample_contract());
    }

    #[test]
    fn test_accepted_extension_requires_transaction() {
        let wire: TransactionExtensionJson =
            serde_json::from_value(json!({"result": {"result": true}})).unwrap();
        assert_eq!(
            wire.into_extension(&sample_contract()).unwrap_err(),
            SdkError::TriggerFailed("node returned no transaction".to_string())
        );

        let wire: TransactionExtensionJson = serde_json::from_value(json!({
            "result": {"result": false, "message": "owner account does not exist"}
        }))
        .unwrap();
        assert_eq!(
            wire.into_extension(&sample_contract()).unwrap_err(),
            SdkError::TriggerFailed("owner account does not exist".to_string())
        );
    }

    #[test]
    fn test_transaction_info_from_json() {
        let wire: TransactionInfoJson = serde_json::from_value(json!({
            "id": "11".repeat(32),
            "fee": 345,
            "block_number": 10,
            "receipt": {"energy_usage_total": 1200, "result": "REVERT"},
            "log": [{"address": "22".repeat(20), "topics": ["33".repeat(32)], "data": ""}],
            "result": 1,
            "res_message": "REVERT opcode executed"
        }))
        .unwrap();

        let info = TransactionInfo::try_from(wire).unwrap();
        assert_eq!(info.id, H256::from_bytes([0x11; 32]));
        assert_eq!(info.receipt.result, ContractResult::Revert);
        assert_eq!(info.logs[0].topics.len(), 1);
        assert!(info.is_failed());
    }
}
