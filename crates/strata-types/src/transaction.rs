//! Transaction types for the Strata ledger

use bytes::Bytes;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};
use strata_crypto::sha256;
use strata_primitives::{Address, H256};

use crate::TypesError;

/// Smart-contract invocation carried by a transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerSmartContract {
    /// Caller address
    pub owner_address: Address,
    /// Target contract address
    pub contract_address: Address,
    /// ABI call payload (selector + packed arguments)
    pub data: Bytes,
    /// Native value sent with the call
    pub call_value: u64,
    /// Fungible-token amount sent with the call
    pub call_token_value: u64,
    /// Fungible-token id, 0 when no token is attached
    pub token_id: u64,
}

impl TriggerSmartContract {
    /// Create a call with no value or token attached
    pub fn new(owner_address: Address, contract_address: Address, data: impl Into<Bytes>) -> Self {
        Self {
            owner_address,
            contract_address,
            data: data.into(),
            call_value: 0,
            call_token_value: 0,
            token_id: 0,
        }
    }

    /// Whether a token transfer is attached
    pub fn has_token_transfer(&self) -> bool {
        self.token_id > 0 && self.call_token_value > 0
    }
}

/// Unsigned part of a transaction. Its hash is the transaction id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawData {
    /// Low bytes of the reference block height
    pub ref_block_bytes: Bytes,
    /// Slice of the reference block hash
    pub ref_block_hash: Bytes,
    /// Expiration time (ms since epoch)
    pub expiration: u64,
    /// Creation time (ms since epoch)
    pub timestamp: u64,
    /// Resource cost ceiling for contract execution
    pub fee_limit: u64,
    /// The contract call
    pub contract: TriggerSmartContract,
}

impl RawData {
    /// Create raw data for a contract call with empty block reference
    pub fn new(contract: TriggerSmartContract) -> Self {
        Self {
            ref_block_bytes: Bytes::new(),
            ref_block_hash: Bytes::new(),
            expiration: 0,
            timestamp: 0,
            fee_limit: 0,
            contract,
        }
    }

    /// Canonical serialization, the input of [`transaction_id_hash`]
    pub fn encode(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }
}

/// Transaction id: SHA-256 over the serialized raw data
///
/// Must be recomputed whenever raw data changes.
pub fn transaction_id_hash(raw_data: &RawData) -> H256 {
    sha256(&raw_data.encode())
}

/// A transaction: raw data plus zero or more 65-byte signatures
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Signed content
    pub raw_data: RawData,
    /// Signatures over the transaction id
    pub signatures: Vec<Bytes>,
}

impl Transaction {
    /// Create an unsigned transaction
    pub fn new(raw_data: RawData) -> Self {
        Self {
            raw_data,
            signatures: Vec::new(),
        }
    }

    /// Transaction id derived from the current raw data
    pub fn txid(&self) -> H256 {
        transaction_id_hash(&self.raw_data)
    }

    /// Whether any signature is attached
    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Serialize for broadcast
    pub fn encode(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }

    /// Parse a serialized transaction
    pub fn decode(data: &[u8]) -> Result<Self, TypesError> {
        Ok(rlp::decode(data)?)
    }
}

/// Node response code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReturnCode {
    /// Accepted
    #[default]
    Success,
    /// Signature rejected
    SigError,
    /// Contract validation failed
    ContractValidateError,
    /// Contract execution failed
    ContractExeError,
    /// Not enough bandwidth
    BandwidthError,
    /// Already known
    DupTransactionError,
    /// Reference block mismatch
    TaposError,
    /// Transaction too large
    TooBigTransactionError,
    /// Expired
    TransactionExpirationError,
    /// Node overloaded
    ServerBusy,
    /// Node has no peers
    NoConnection,
    /// Not enough peers
    NotEnoughEffectiveConnection,
    /// Any other code
    Other(i32),
}

impl From<i32> for ReturnCode {
    fn from(code: i32) -> Self {
        match code {
            0 => ReturnCode::Success,
            1 => ReturnCode::SigError,
            2 => ReturnCode::ContractValidateError,
            3 => ReturnCode::ContractExeError,
            4 => ReturnCode::BandwidthError,
            5 => ReturnCode::DupTransactionError,
            6 => ReturnCode::TaposError,
            7 => ReturnCode::TooBigTransactionError,
            8 => ReturnCode::TransactionExpirationError,
            9 => ReturnCode::ServerBusy,
            10 => ReturnCode::NoConnection,
            11 => ReturnCode::NotEnoughEffectiveConnection,
            other => ReturnCode::Other(other),
        }
    }
}

impl From<ReturnCode> for i32 {
    fn from(code: ReturnCode) -> Self {
        match code {
            ReturnCode::Success => 0,
            ReturnCode::SigError => 1,
            ReturnCode::ContractValidateError => 2,
            ReturnCode::ContractExeError => 3,
            ReturnCode::BandwidthError => 4,
            ReturnCode::DupTransactionError => 5,
            ReturnCode::TaposError => 6,
            ReturnCode::TooBigTransactionError => 7,
            ReturnCode::TransactionExpirationError => 8,
            ReturnCode::ServerBusy => 9,
            ReturnCode::NoConnection => 10,
            ReturnCode::NotEnoughEffectiveConnection => 11,
            ReturnCode::Other(other) => other,
        }
    }
}

/// Node acknowledgment for trigger and broadcast calls
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Return {
    /// Overall acceptance flag
    pub result: bool,
    /// Response code
    pub code: ReturnCode,
    /// Node message (usually an error description)
    pub message: String,
}

impl Return {
    /// An accepted response
    pub fn success() -> Self {
        Self {
            result: true,
            code: ReturnCode::Success,
            message: String::new(),
        }
    }

    /// Whether the code is non-zero
    pub fn is_error(&self) -> bool {
        self.code != ReturnCode::Success
    }
}

/// Transaction prepared by the node, with its id and call result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionExtension {
    /// Prepared (unsigned) transaction
    pub transaction: Transaction,
    /// Transaction id as last computed
    pub txid: H256,
    /// Preparation outcome
    pub result: Return,
    /// Constant call results, if the node executed the call
    pub constant_result: Vec<Bytes>,
}

impl TransactionExtension {
    /// Wrap a transaction, computing its id
    pub fn new(transaction: Transaction, result: Return) -> Self {
        let txid = transaction.txid();
        Self {
            transaction,
            txid,
            result,
            constant_result: Vec::new(),
        }
    }

    /// Recompute `txid` from the current raw data
    pub fn update_hash(&mut self) -> H256 {
        self.txid = self.transaction.txid();
        self.txid
    }

    /// Override the fee limit locally and recompute the id
    pub fn override_fee_limit(&mut self, fee_limit: u64) -> H256 {
        self.transaction.raw_data.fee_limit = fee_limit;
        self.update_hash()
    }

    /// Whether the stored id matches the raw data
    pub fn is_hash_current(&self) -> bool {
        self.txid == self.transaction.txid()
    }
}

// ==================== RLP ====================

impl Encodable for TriggerSmartContract {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(6);
        s.append(&self.owner_address);
        s.append(&self.contract_address);
        s.append(&self.data);
        s.append(&self.call_value);
        s.append(&self.call_token_value);
        s.append(&self.token_id);
    }
}

impl Decodable for TriggerSmartContract {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 6 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            owner_address: rlp.val_at(0)?,
            contract_address: rlp.val_at(1)?,
            data: rlp.val_at(2)?,
            call_value: rlp.val_at(3)?,
            call_token_value: rlp.val_at(4)?,
            token_id: rlp.val_at(5)?,
        })
    }
}

impl Encodable for RawData {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(6);
        s.append(&self.ref_block_bytes);
        s.append(&self.ref_block_hash);
        s.append(&self.expiration);
        s.append(&self.timestamp);
        s.append(&self.fee_limit);
        s.append(&self.contract);
    }
}

impl Decodable for RawData {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 6 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            ref_block_bytes: rlp.val_at(0)?,
            ref_block_hash: rlp.val_at(1)?,
            expiration: rlp.val_at(2)?,
            timestamp: rlp.val_at(3)?,
            fee_limit: rlp.val_at(4)?,
            contract: rlp.val_at(5)?,
        })
    }
}

impl Encodable for Transaction {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(2);
        s.append(&self.raw_data);
        s.append_list::<Bytes, Bytes>(&self.signatures);
    }
}

impl Decodable for Transaction {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 2 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            raw_data: rlp.val_at(0)?,
            signatures: rlp.list_at(1)?,
        })
    }
}
