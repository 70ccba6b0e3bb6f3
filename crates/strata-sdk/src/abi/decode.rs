//! ABI decoding

use strata_primitives::{H160, U256};

use super::method::Method;
use super::types::{ParamType, Token, I256};
use crate::SdkError;

/// Decoded return data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Values decoded by the declared output types
    Tokens(Vec<Token>),
    /// Data that did not decode, as lossy UTF-8 text
    Raw(String),
}

/// Decode tokens from ABI-encoded data
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, SdkError> {
    decode_block(types, data, 0)
}

/// Decode a method's return data
///
/// Falls back to the raw text when the data does not match the declared
/// outputs; this never fails.
pub fn decode_output(method: &Method, data: &[u8]) -> Decoded {
    match decode(&method.outputs, data) {
        Ok(tokens) => Decoded::Tokens(tokens),
        Err(_) => Decoded::Raw(String::from_utf8_lossy(data).into_owned()),
    }
}

/// Decode a head/tail block starting at `base`; tail offsets are relative to it
fn decode_block(types: &[ParamType], data: &[u8], base: usize) -> Result<Vec<Token>, SdkError> {
    let mut offset = base;
    let mut tokens = Vec::with_capacity(types.len());

    for param_type in types {
        let token = if param_type.is_dynamic() {
            let tail = base + read_usize(data, offset)?;
            decode_dynamic(param_type, data, tail)?
        } else {
            decode_static(param_type, data, offset)?
        };
        tokens.push(token);
        offset += head_size(param_type)?;
    }

    Ok(tokens)
}

fn head_size(param_type: &ParamType) -> Result<usize, SdkError> {
    match param_type {
        ParamType::FixedArray(inner, size) if !inner.is_dynamic() => head_size(inner)?
            .checked_mul(*size)
            .ok_or_else(|| SdkError::AbiDecode(format!("{} is too large", param_type))),
        _ => Ok(32),
    }
}

/// Element types of a fixed array whose heads start at `offset`
///
/// The heads must fit in the data before anything is allocated.
fn fixed_array_types(
    inner: &ParamType,
    size: usize,
    data: &[u8],
    offset: usize,
) -> Result<Vec<ParamType>, SdkError> {
    let span = head_size(inner)?
        .checked_mul(size)
        .and_then(|span| span.checked_add(offset))
        .ok_or_else(|| SdkError::AbiDecode(format!("{}[{}] is too large", inner, size)))?;
    check_length(data, span)?;
    Ok(vec![inner.clone(); size])
}

fn decode_static(param_type: &ParamType, data: &[u8], offset: usize) -> Result<Token, SdkError> {
    match param_type {
        ParamType::Address => {
            let word = read_word(data, offset)?;
            let id = H160::from_slice(&word[12..])?;
            Ok(Token::Address(id))
        }
        ParamType::Uint(_) => Ok(Token::Uint(U256::from_big_endian(read_word(data, offset)?))),
        ParamType::Int(_) => {
            let mut word = [0u8; 32];
            word.copy_from_slice(read_word(data, offset)?);
            Ok(Token::Int(I256::from_be_bytes(&word)))
        }
        ParamType::Bool => {
            let word = read_word(data, offset)?;
            Ok(Token::Bool(word[31] != 0))
        }
        ParamType::FixedBytes(size) => {
            let word = read_word(data, offset)?;
            Ok(Token::FixedBytes(word[..*size].to_vec()))
        }
        ParamType::FixedArray(inner, size) => {
            let types = fixed_array_types(inner, *size, data, offset)?;
            decode_block(&types, data, offset).map(Token::FixedArray)
        }
        _ => Err(SdkError::AbiDecode(format!("{} is not a static type", param_type))),
    }
}

fn decode_dynamic(param_type: &ParamType, data: &[u8], offset: usize) -> Result<Token, SdkError> {
    match param_type {
        ParamType::Bytes => decode_bytes(data, offset).map(Token::Bytes),
        ParamType::String => {
            let bytes = decode_bytes(data, offset)?;
            let s = String::from_utf8(bytes)
                .map_err(|e| SdkError::AbiDecode(format!("Invalid UTF-8: {}", e)))?;
            Ok(Token::String(s))
        }
        ParamType::Array(inner) => {
            let len = read_usize(data, offset)?;
            // Each element takes at least one word
            check_length(data, offset + 32 + len.saturating_mul(32))?;
            let types = vec![(**inner).clone(); len];
            decode_block(&types, data, offset + 32).map(Token::Array)
        }
        ParamType::FixedArray(inner, size) => {
            let types = fixed_array_types(inner, *size, data, offset)?;
            decode_block(&types, data, offset).map(Token::FixedArray)
        }
        _ => Err(SdkError::AbiDecode(format!("{} is not a dynamic type", param_type))),
    }
}

fn decode_bytes(data: &[u8], offset: usize) -> Result<Vec<u8>, SdkError> {
    let len = read_usize(data, offset)?;
    let start = offset + 32;
    let end = start
        .checked_add(len)
        .ok_or_else(|| SdkError::AbiDecode("length overflow".to_string()))?;
    check_length(data, end)?;
    Ok(data[start..end].to_vec())
}

fn read_word(data: &[u8], offset: usize) -> Result<&[u8], SdkError> {
    check_length(data, offset + 32)?;
    Ok(&data[offset..offset + 32])
}

/// Read a word holding an offset or length
fn read_usize(data: &[u8], offset: usize) -> Result<usize, SdkError> {
    let value = U256::from_big_endian(read_word(data, offset)?);
    if value > U256::from(data.len()) {
        return Err(SdkError::AbiDecode(format!("offset or length {} out of range", value)));
    }
    Ok(value.as_usize())
}

/// Check that data has at least `required` bytes
fn check_length(data: &[u8], required: usize) -> Result<(), SdkError> {
    if data.len() < required {
        return Err(SdkError::AbiDecode(format!(
            "Insufficient data: need {} bytes, have {}",
            required,
            data.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::encode::encode_params;

    #[test]
    fn test_decode_address() {
        let id = H160::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        let mut encoded = [0u8; 32];
        encoded[12..32].copy_from_slice(id.as_bytes());

        let tokens = decode(&[ParamType::Address], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Address(id)]);
    }

    #[test]
    fn test_decode_uint_and_bool() {
        let mut encoded = [0u8; 64];
        encoded[31] = 100;
        encoded[63] = 1;

        let tokens = decode(&[ParamType::Uint(256), ParamType::Bool], &encoded).unwrap();
        assert_eq!(tokens, vec![Token::Uint(U256::from(100)), Token::Bool(true)]);
    }

    #[test]
    fn test_decode_int_negative() {
        let tokens = decode(&[ParamType::Int(256)], &[0xffu8; 32]).unwrap();
        assert_eq!(tokens[0], Token::Int(I256::from_i128(-1)));
    }

    #[test]
    fn test_decode_string() {
        let mut encoded = vec![0u8; 96];
        encoded[31] = 32;
        encoded[63] = 5;
        encoded[64..69].copy_from_slice(b"hello");

        let tokens = decode(&[ParamType::String], &encoded).unwrap();
        assert_eq!(tokens[0], Token::String("hello".to_string()));
    }

    #[test]
    fn test_decode_mixed_layout() {
        let types = vec![
            ParamType::Uint(256),
            ParamType::Array(Box::new(ParamType::String)),
            ParamType::FixedArray(Box::new(ParamType::Uint(8)), 2),
            ParamType::Bytes,
        ];
        let tokens = vec![
            Token::Uint(U256::from(9)),
            Token::Array(vec![Token::String("a".into()), Token::String("bc".into())]),
            Token::FixedArray(vec![Token::Uint(U256::from(1)), Token::Uint(U256::from(2))]),
            Token::Bytes(vec![0xca, 0xfe]),
        ];
        let encoded = encode_params(&types, &tokens).unwrap();
        assert_eq!(decode(&types, &encoded).unwrap(), tokens);
    }

    #[test]
    fn test_decode_insufficient_data() {
        assert!(matches!(
            decode(&[ParamType::Uint(256)], &[0u8; 16]),
            Err(SdkError::AbiDecode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_huge_offset() {
        let encoded = [0xffu8; 32];
        assert!(matches!(
            decode(&[ParamType::Bytes], &encoded),
            Err(SdkError::AbiDecode(_))
        ));
    }

    #[test]
    fn test_decode_huge_fixed_array_errors() {
        let types = [ParamType::FixedArray(Box::new(ParamType::Uint(256)), 1 << 60)];
        assert!(matches!(decode(&types, &[0u8; 32]), Err(SdkError::AbiDecode(_))));

        let dynamic = [ParamType::FixedArray(Box::new(ParamType::String), usize::MAX)];
        let mut encoded = [0u8; 32];
        encoded[31] = 32;
        assert!(matches!(decode(&dynamic, &encoded), Err(SdkError::AbiDecode(_))));
    }

    #[test]
    fn test_decode_output_with_oversized_abi_output() {
        let abi = r#"[{"type":"function","name":"f","inputs":[],
            "outputs":[{"type":"uint256[1000000000000000000]"}]}]"#;
        let method = Method::from_abi_json(abi, "f").unwrap();

        let data = [0u8; 32];
        assert_eq!(
            decode_output(&method, &data),
            Decoded::Raw(String::from_utf8_lossy(&data).into_owned())
        );
    }

    #[test]
    fn test_decode_output_falls_back_to_text() {
        let method = Method::new("name", vec![], vec![ParamType::Uint(256)]);
        assert_eq!(
            decode_output(&method, b"REVERT opcode executed"),
            Decoded::Raw("REVERT opcode executed".to_string())
        );

        let mut word = [0u8; 32];
        word[31] = 7;
        assert_eq!(
            decode_output(&method, &word),
            Decoded::Tokens(vec![Token::Uint(U256::from(7))])
        );
    }
}
