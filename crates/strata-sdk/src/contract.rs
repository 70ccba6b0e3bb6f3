//! Contract invocation assembly

use strata_primitives::Address;
use strata_types::{TransactionExtension, TriggerSmartContract};
use tracing::{debug, warn};

use crate::abi::{decode_output, pack, Decoded, Method};
use crate::client::LedgerRpc;
use crate::SdkError;

/// Method to call: signature text or an already parsed [`Method`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodRef {
    /// Signature such as `transfer(address,uint256)`
    Signature(String),
    /// Parsed method, e.g. from a contract ABI
    Parsed(Method),
}

impl MethodRef {
    /// Resolve to a [`Method`]
    pub fn resolve(&self) -> Result<Method, SdkError> {
        match self {
            MethodRef::Signature(signature) => Method::parse(signature),
            MethodRef::Parsed(method) => Ok(method.clone()),
        }
    }
}

impl From<&str> for MethodRef {
    fn from(signature: &str) -> Self {
        MethodRef::Signature(signature.to_string())
    }
}

impl From<String> for MethodRef {
    fn from(signature: String) -> Self {
        MethodRef::Signature(signature)
    }
}

impl From<Method> for MethodRef {
    fn from(method: Method) -> Self {
        MethodRef::Parsed(method)
    }
}

/// A contract call as the caller describes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    /// Caller address (base58)
    pub from: String,
    /// Contract address (base58)
    pub contract: String,
    /// Method to call
    pub method: MethodRef,
    /// Parameter list JSON, e.g. `[{"uint256":"1"}]`; empty for none
    pub params_json: String,
    /// Fee limit to set locally; 0 keeps the node's
    pub fee_limit: u64,
    /// Native value to send
    pub call_value: u64,
    /// Token id as a decimal string; empty for none
    pub token_id: String,
    /// Token amount to send
    pub token_amount: u64,
}

impl TriggerRequest {
    /// Request with no parameters, value or fee override
    pub fn new(
        from: impl Into<String>,
        contract: impl Into<String>,
        method: impl Into<MethodRef>,
    ) -> Self {
        Self {
            from: from.into(),
            contract: contract.into(),
            method: method.into(),
            params_json: String::new(),
            fee_limit: 0,
            call_value: 0,
            token_id: String::new(),
            token_amount: 0,
        }
    }

    /// Set the parameter JSON
    pub fn params(mut self, json: impl Into<String>) -> Self {
        self.params_json = json.into();
        self
    }

    /// Set the fee limit
    pub fn fee_limit(mut self, fee_limit: u64) -> Self {
        self.fee_limit = fee_limit;
        self
    }

    /// Set the native value
    pub fn call_value(mut self, value: u64) -> Self {
        self.call_value = value;
        self
    }

    /// Attach a token transfer
    pub fn token(mut self, token_id: impl Into<String>, amount: u64) -> Self {
        self.token_id = token_id.into();
        self.token_amount = amount;
        self
    }
}

/// Builds contract calls and has the node prepare them
pub struct ContractCaller<'a> {
    rpc: &'a dyn LedgerRpc,
}

impl<'a> ContractCaller<'a> {
    /// Create a caller over `rpc`
    pub fn new(rpc: &'a dyn LedgerRpc) -> Self {
        Self { rpc }
    }

    /// Build the invocation for `request` without contacting the node
    ///
    /// Addresses are checked first, then the call payload is packed.
    pub fn build(&self, request: &TriggerRequest) -> Result<TriggerSmartContract, SdkError> {
        let owner = parse_address("from", &request.from)?;
        let contract_address = parse_address("contract", &request.contract)?;

        let method = request.method.resolve()?;
        let data = pack(&method, &request.params_json)?;

        let mut contract = TriggerSmartContract::new(owner, contract_address, data);
        if request.call_value > 0 {
            contract.call_value = request.call_value;
        }
        if !request.token_id.is_empty() && request.token_amount > 0 {
            contract.call_token_value = request.token_amount;
            contract.token_id = request.token_id.parse().map_err(|e| {
                SdkError::InvalidParam(format!("token id {:?}: {}", request.token_id, e))
            })?;
        }
        Ok(contract)
    }

    /// Have the node prepare the call and apply the local fee limit
    ///
    /// A non-zero result code is an error carrying the node's message. When
    /// `fee_limit` is set the transaction id is recomputed.
    pub async fn trigger_contract(
        &self,
        request: &TriggerRequest,
    ) -> Result<TransactionExtension, SdkError> {
        let contract = self.build(request)?;
        debug!(
            owner = %contract.owner_address,
            contract = %contract.contract_address,
            data_len = contract.data.len(),
            "Triggering contract"
        );

        let mut extension = self.rpc.trigger_contract(&contract).await?;
        let result = &extension.result;
        if result.is_error() || (!result.result && !result.message.is_empty()) {
            warn!(code = i32::from(result.code), message = %result.message, "Contract trigger rejected");
            return Err(SdkError::TriggerFailed(result.message.clone()));
        }

        if request.fee_limit > 0 {
            let txid = extension.override_fee_limit(request.fee_limit);
            debug!(fee_limit = request.fee_limit, %txid, "Applied local fee limit");
        }
        Ok(extension)
    }

    /// Decode the first constant result of a prepared call
    pub fn decode_constant_result(method: &Method, extension: &TransactionExtension) -> Option<Decoded> {
        extension
            .constant_result
            .first()
            .map(|data| decode_output(method, data))
    }
}

fn parse_address(role: &str, s: &str) -> Result<Address, SdkError> {
    Address::from_base58(s).map_err(|e| SdkError::InvalidAddress(format!("{} {}: {}", role, s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{ParamType, Token};
    use crate::client::LedgerClient;
    use crate::transport::MockTransport;
    use bytes::Bytes;
    use strata_primitives::{H160, U256};

    const FROM: &str = "TRu2DruRJDjVsqno7CwXMzJb7vQTpVaKmL";
    const CONTRACT: &str = "TBXSw8fM4jpQkGc6zZjsVABFpVN7UvXPdV";

    fn caller_request() -> TriggerRequest {
        TriggerRequest::new(FROM, CONTRACT, "transfer(address,uint256)")
            .params(r#"[{"address":"T9yD14Nj9j7xAB4dbGeiX9h8unkKHxuWwb"},{"uint256":"5"}]"#)
    }

    #[test]
    fn test_build_sets_addresses_and_data() {
        let client = LedgerClient::with_transport(MockTransport::new());
        let contract = ContractCaller::new(&client).build(&caller_request()).unwrap();

        assert_eq!(contract.owner_address.to_base58(), FROM);
        assert_eq!(
            contract.contract_address,
            Address::from_account_id(H160::from_bytes([0x11; 20]))
        );
        assert_eq!(contract.data.len(), 68);
        assert_eq!(contract.call_value, 0);
        assert!(!contract.has_token_transfer());
    }

    #[test]
    fn test_token_fields_need_id_and_amount() {
        let client = LedgerClient::with_transport(MockTransport::new());
        let caller = ContractCaller::new(&client);

        let only_id = caller.build(&caller_request().token("1000001", 0)).unwrap();
        assert_eq!(only_id.token_id, 0);

        let only_amount = caller.build(&caller_request().token("", 10)).unwrap();
        assert_eq!(only_amount.call_token_value, 0);

        let both = caller.build(&caller_request().token("1000001", 10).call_value(3)).unwrap();
        assert_eq!(both.token_id, 1_000_001);
        assert_eq!(both.call_token_value, 10);
        assert_eq!(both.call_value, 3);

        assert!(matches!(
            caller.build(&caller_request().token("abc", 10)),
            Err(SdkError::InvalidParam(_))
        ));
    }

    #[test]
    fn test_parsed_method_spec() {
        let client = LedgerClient::with_transport(MockTransport::new());
        let method = Method::parse("balanceOf(address)").unwrap();
        let request = TriggerRequest::new(FROM, CONTRACT, method)
            .params(format!(r#"[{{"address":"{}"}}]"#, FROM));

        let contract = ContractCaller::new(&client).build(&request).unwrap();
        assert_eq!(&contract.data[..4], &[0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn test_decode_constant_result() {
        let method = Method::new("balanceOf", vec![ParamType::Address], vec![ParamType::Uint(256)]);
        let mut word = [0u8; 32];
        word[31] = 42;

        let mut extension = TransactionExtension::new(
            strata_types::Transaction::new(strata_types::RawData::new(TriggerSmartContract::new(
                Address::from_account_id(H160::ZERO),
                Address::from_account_id(H160::ZERO),
                Vec::new(),
            ))),
            strata_types::Return::success(),
        );
        assert_eq!(ContractCaller::decode_constant_result(&method, &extension), None);

        extension.constant_result.push(Bytes::copy_from_slice(&word));
        assert_eq!(
            ContractCaller::decode_constant_result(&method, &extension),
            Some(Decoded::Tokens(vec![Token::Uint(U256::from(42))]))
        );
    }
}
