//! ABI encoding

use serde_json::Value as Json;
use strata_primitives::U256;
use tracing::debug;

use super::coerce::{check_arity, coerce, Value};
use super::method::Method;
use super::resolve::resolve_type;
use super::types::{ParamType, Token, I256};
use crate::SdkError;

/// Compute function selector (first 4 bytes of keccak256(signature))
///
/// Not to be confused with the transaction id, which is a SHA-256 over
/// the raw transaction data.
pub fn selector_hash(signature: &str) -> [u8; 4] {
    let hash = strata_crypto::keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

/// Parse a parameter list such as `[{"address":"T..."},{"uint256":"1000"}]`
///
/// An empty string is an empty list.
pub fn load_params(json: &str) -> Result<Vec<Json>, SdkError> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: Json = serde_json::from_str(json)?;
    match parsed {
        Json::Array(params) => Ok(params),
        other => Err(SdkError::InvalidParam(format!(
            "expected a JSON array of parameters, got {}",
            other
        ))),
    }
}

/// Selector followed by the packed arguments
pub fn pack(method: &Method, params_json: &str) -> Result<Vec<u8>, SdkError> {
    let params = load_params(params_json)?;
    let packed = padded_params(method, &params)?;

    let mut data = method.selector().to_vec();
    data.extend(packed);
    debug!(
        method = %method.signature(),
        params = params.len(),
        bytes = data.len(),
        "Packed contract call"
    );
    Ok(data)
}

/// Pack a parameter list against a method's declared inputs
///
/// Every parameter must be an object with exactly one key, the type of the
/// value, which must agree with the declared input at the same position.
/// Shape errors are reported before any value is coerced, and no bytes are
/// returned unless every argument encodes.
pub fn padded_params(method: &Method, params: &[Json]) -> Result<Vec<u8>, SdkError> {
    if params.len() != method.inputs.len() {
        return Err(SdkError::InvalidParam(format!(
            "{} takes {} params, got {}",
            method.signature(),
            method.inputs.len(),
            params.len()
        )));
    }

    let mut entries = Vec::with_capacity(params.len());
    for param in params {
        match param.as_object() {
            Some(obj) if obj.len() == 1 => entries.extend(obj.iter()),
            _ => return Err(SdkError::InvalidParam(param.to_string())),
        }
    }

    let mut tokens = Vec::with_capacity(entries.len());
    for (index, (declared, (key, value))) in method.inputs.iter().zip(entries).enumerate() {
        let ty = resolve_type(key)?;
        if &ty != declared {
            return Err(SdkError::TypeMismatch(format!(
                "param {} of {} is {}, got {}",
                index,
                method.name,
                declared,
                key
            )));
        }
        let coerced = coerce(&ty, value)?;
        tokens.push(to_token(&ty, &coerced)?);
    }

    encode_params(&method.inputs, &tokens)
}

/// Convert a coerced value into a token of type `ty`
pub fn to_token(ty: &ParamType, value: &Value) -> Result<Token, SdkError> {
    match (ty, value) {
        (ParamType::Address, Value::Address(id)) => Ok(Token::Address(*id)),
        (ParamType::Uint(_), Value::UInt64(v)) => Ok(Token::Uint(U256::from(*v))),
        (ParamType::Uint(_), Value::BigInt(v)) if !v.negative => Ok(Token::Uint(v.abs)),
        (ParamType::Int(_), Value::Int64(v)) => Ok(Token::Int(I256::from_i128(*v as i128))),
        (ParamType::Int(bits), Value::UInt64(v)) => {
            let value = I256::new(U256::from(*v), false);
            if !value.fits_signed(*bits) {
                return Err(SdkError::AbiEncode(format!("{} does not fit {}", v, ty)));
            }
            Ok(Token::Int(value))
        }
        (ParamType::Int(_), Value::BigInt(v)) => Ok(Token::Int(*v)),
        (ParamType::Array(inner), Value::List(items)) => {
            list_tokens(inner, items).map(Token::Array)
        }
        (ParamType::FixedArray(inner, size), Value::List(items)) => {
            check_arity(ty, *size, items.len())?;
            list_tokens(inner, items).map(Token::FixedArray)
        }
        (_, Value::Raw(json)) => raw_token(ty, json),
        _ => Err(SdkError::TypeMismatch(format!("cannot encode {} as {}", value, ty))),
    }
}

fn list_tokens(inner: &ParamType, items: &[Value]) -> Result<Vec<Token>, SdkError> {
    items.iter().map(|item| to_token(inner, item)).collect()
}

/// Validate a pass-through JSON value
fn raw_token(ty: &ParamType, json: &Json) -> Result<Token, SdkError> {
    let mismatch = || SdkError::TypeMismatch(format!("{} is not a valid {}", json, ty));
    match ty {
        ParamType::Bool => match json {
            Json::Bool(b) => Ok(Token::Bool(*b)),
            Json::String(s) if s == "true" => Ok(Token::Bool(true)),
            Json::String(s) if s == "false" => Ok(Token::Bool(false)),
            _ => Err(mismatch()),
        },
        ParamType::String => json
            .as_str()
            .map(|s| Token::String(s.to_string()))
            .ok_or_else(mismatch),
        ParamType::Bytes => {
            let s = json.as_str().ok_or_else(mismatch)?;
            Ok(Token::Bytes(decode_hex(s)?))
        }
        ParamType::FixedBytes(size) => {
            let s = json.as_str().ok_or_else(mismatch)?;
            let mut data = decode_hex(s)?;
            if data.len() > *size {
                return Err(SdkError::AbiEncode(format!(
                    "{} bytes do not fit {}",
                    data.len(),
                    ty
                )));
            }
            data.resize(*size, 0);
            Ok(Token::FixedBytes(data))
        }
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => {
            let items = json.as_array().ok_or_else(mismatch)?;
            if let ParamType::FixedArray(_, size) = ty {
                check_arity(ty, *size, items.len())?;
            }
            let tokens = items
                .iter()
                .map(|item| to_token(inner, &coerce(inner, item)?))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(match ty {
                ParamType::Array(_) => Token::Array(tokens),
                _ => Token::FixedArray(tokens),
            })
        }
        _ => to_token(ty, &coerce(ty, json)?),
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, SdkError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

/// Encode tokens according to their declared types
///
/// Each token must match its type, as built by [`to_token`]; a mismatch is
/// an [`SdkError::AbiEncode`].
pub fn encode_params(types: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, SdkError> {
    if types.len() != tokens.len() {
        return Err(SdkError::AbiEncode(format!(
            "{} types for {} tokens",
            types.len(),
            tokens.len()
        )));
    }

    // Calculate head size (fixed part)
    let head_size = types.iter().try_fold(0usize, |acc, ty| {
        acc.checked_add(head_length(ty)?)
            .ok_or_else(|| SdkError::AbiEncode("head too large".to_string()))
    })?;

    let mut head = Vec::new();
    let mut tail = Vec::new();

    for (param_type, token) in types.iter().zip(tokens.iter()) {
        if param_type.is_dynamic() {
            let offset = head_size + tail.len();
            head.extend(encode_u256(&U256::from(offset)));
            tail.extend(encode_token(param_type, token)?);
        } else {
            head.extend(encode_token(param_type, token)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Get the head length for a type
fn head_length(param_type: &ParamType) -> Result<usize, SdkError> {
    match param_type {
        ParamType::FixedArray(inner, size) if !inner.is_dynamic() => head_length(inner)?
            .checked_mul(*size)
            .ok_or_else(|| SdkError::AbiEncode(format!("{} is too large", param_type))),
        _ => Ok(32),
    }
}

fn encode_token(param_type: &ParamType, token: &Token) -> Result<Vec<u8>, SdkError> {
    let encoded = match (param_type, token) {
        (ParamType::Address, Token::Address(id)) => {
            let mut buf = [0u8; 32];
            buf[12..32].copy_from_slice(id.as_bytes());
            buf.to_vec()
        }
        (ParamType::Uint(_), Token::Uint(value)) => encode_u256(value),
        (ParamType::Int(_), Token::Int(value)) => value.to_be_bytes().to_vec(),
        (ParamType::Bool, Token::Bool(b)) => {
            let mut buf = [0u8; 32];
            buf[31] = u8::from(*b);
            buf.to_vec()
        }
        (ParamType::FixedBytes(size), Token::FixedBytes(data)) if data.len() <= *size => {
            let mut buf = [0u8; 32];
            buf[..data.len()].copy_from_slice(data);
            buf.to_vec()
        }
        (ParamType::Bytes, Token::Bytes(data)) => encode_bytes(data),
        (ParamType::String, Token::String(s)) => encode_bytes(s.as_bytes()),
        (ParamType::Array(inner), Token::Array(tokens)) => {
            let mut result = encode_u256(&U256::from(tokens.len()));
            let inner_types = vec![(**inner).clone(); tokens.len()];
            result.extend(encode_params(&inner_types, tokens)?);
            result
        }
        (ParamType::FixedArray(inner, size), Token::FixedArray(tokens)) if tokens.len() == *size => {
            let inner_types = vec![(**inner).clone(); tokens.len()];
            encode_params(&inner_types, tokens)?
        }
        _ => {
            return Err(SdkError::AbiEncode(format!(
                "token {:?} does not match {}",
                token, param_type
            )))
        }
    };
    Ok(encoded)
}

fn encode_u256(value: &U256) -> Vec<u8> {
    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    bytes.to_vec()
}

/// Length word followed by the data, right-padded to a word boundary
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = encode_u256(&U256::from(data.len()));

    let padded_len = data.len().div_ceil(32) * 32;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    result.extend(padded);

    result
}
