//! JSON value coercion into typed ABI values

use std::fmt;

use serde_json::Value as Json;
use strata_primitives::{Address, H160, U256};

use super::types::{ParamType, I256};
use crate::SdkError;

/// A caller-supplied value converted to the shape its declared type needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed integer of at most 64 bits
    Int64(i64),
    /// Unsigned integer of at most 64 bits
    UInt64(u64),
    /// Integer wider than 64 bits
    BigInt(I256),
    /// Account id of a decoded ledger address
    Address(H160),
    /// Coerced array elements, in order
    List(Vec<Value>),
    /// Left as-is for the encoder to validate (bool, string, bytes)
    Raw(Json),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::Address(id) => write!(f, "{}", Address::from_account_id(*id)),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Raw(json) => write!(f, "{}", json),
        }
    }
}

/// Coerce a JSON value into the typed value `ty` requires
///
/// Addresses are base58check-decoded and reduced to their account id.
/// Integers must be decimal strings. Types without a coercion rule pass
/// through as [`Value::Raw`].
pub fn coerce(ty: &ParamType, value: &Json) -> Result<Value, SdkError> {
    match ty {
        ParamType::Address => coerce_address(value).map(Value::Address),
        ParamType::Uint(bits) => {
            let s = numeral(ty, value)?;
            if *bits <= 64 {
                parse_unsigned(s, *bits, ty).map(Value::UInt64)
            } else {
                parse_big(s, *bits, false, ty).map(Value::BigInt)
            }
        }
        ParamType::Int(bits) => {
            let s = numeral(ty, value)?;
            if *bits <= 64 {
                parse_signed(s, *bits, ty).map(Value::Int64)
            } else {
                parse_big(s, *bits, true, ty).map(Value::BigInt)
            }
        }
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => {
            if !has_coercion(inner) {
                return Ok(Value::Raw(value.clone()));
            }
            let items = value
                .as_array()
                .ok_or_else(|| SdkError::TypeMismatch(format!("expected array for {}, got {}", ty, value)))?;
            if let ParamType::FixedArray(_, size) = ty {
                check_arity(ty, *size, items.len())?;
            }
            items
                .iter()
                .map(|item| coerce_element(inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
        }
        _ => Ok(Value::Raw(value.clone())),
    }
}

/// Array elements follow their own integer rule: narrow widths are always
/// read as unsigned.
fn coerce_element(ty: &ParamType, item: &Json) -> Result<Value, SdkError> {
    match ty {
        ParamType::Uint(bits) | ParamType::Int(bits) => {
            let s = item
                .as_str()
                .ok_or_else(|| SdkError::TypeMismatch(format!("{} element must be a string, got {}", ty, item)))?;
            if *bits <= 64 {
                parse_unsigned(s, *bits, ty).map(Value::UInt64)
            } else {
                let signed = matches!(ty, ParamType::Int(_));
                parse_big(s, *bits, signed, ty).map(Value::BigInt)
            }
        }
        _ => coerce(ty, item),
    }
}

fn has_coercion(ty: &ParamType) -> bool {
    match ty {
        ParamType::Address | ParamType::Uint(_) | ParamType::Int(_) => true,
        ParamType::Array(inner) | ParamType::FixedArray(inner, _) => has_coercion(inner),
        _ => false,
    }
}

pub(crate) fn check_arity(ty: &ParamType, expected: usize, got: usize) -> Result<(), SdkError> {
    if expected != got {
        return Err(SdkError::TypeMismatch(format!(
            "{} expects {} elements, got {}",
            ty, expected, got
        )));
    }
    Ok(())
}

fn coerce_address(value: &Json) -> Result<H160, SdkError> {
    let s = value
        .as_str()
        .ok_or_else(|| SdkError::InvalidAddress(format!("expected base58 string, got {}", value)))?;
    let address =
        Address::from_base58(s).map_err(|e| SdkError::InvalidAddress(format!("{}: {}", s, e)))?;
    Ok(address.account_id())
}

fn numeral<'a>(ty: &ParamType, value: &'a Json) -> Result<&'a str, SdkError> {
    value
        .as_str()
        .ok_or_else(|| SdkError::TypeMismatch(format!("{} expects a decimal string, got {}", ty, value)))
}

fn numeric_error(value: &str, ty: &ParamType, reason: impl fmt::Display) -> SdkError {
    SdkError::NumericParse {
        value: value.to_string(),
        ty: ty.to_string(),
        reason: reason.to_string(),
    }
}

/// Decimal digits with an optional leading minus when `signed`
fn check_digits(s: &str, signed: bool) -> Result<(), &'static str> {
    let digits = if signed { s.strip_prefix('-').unwrap_or(s) } else { s };
    if digits.is_empty() {
        return Err("empty numeral");
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("invalid digit found in string");
    }
    Ok(())
}

fn parse_unsigned(s: &str, bits: usize, ty: &ParamType) -> Result<u64, SdkError> {
    check_digits(s, false).map_err(|e| numeric_error(s, ty, e))?;
    let parsed = match bits {
        8 => s.parse::<u8>().map(u64::from),
        16 => s.parse::<u16>().map(u64::from),
        32 => s.parse::<u32>().map(u64::from),
        _ => s.parse::<u64>(),
    };
    let value = parsed.map_err(|e| numeric_error(s, ty, e))?;
    if bits < 64 && value >> bits != 0 {
        return Err(numeric_error(s, ty, "number too large to fit in target type"));
    }
    Ok(value)
}

fn parse_signed(s: &str, bits: usize, ty: &ParamType) -> Result<i64, SdkError> {
    check_digits(s, true).map_err(|e| numeric_error(s, ty, e))?;
    let parsed = match bits {
        8 => s.parse::<i8>().map(i64::from),
        16 => s.parse::<i16>().map(i64::from),
        32 => s.parse::<i32>().map(i64::from),
        _ => s.parse::<i64>(),
    };
    let value = parsed.map_err(|e| numeric_error(s, ty, e))?;
    if bits < 64 {
        let limit = 1i64 << (bits - 1);
        if value < -limit || value >= limit {
            return Err(numeric_error(s, ty, "number out of range for target type"));
        }
    }
    Ok(value)
}

fn parse_big(s: &str, bits: usize, signed: bool, ty: &ParamType) -> Result<I256, SdkError> {
    check_digits(s, signed).map_err(|e| numeric_error(s, ty, e))?;
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let abs = U256::from_dec_str(digits).map_err(|e| numeric_error(s, ty, e))?;
    let value = I256::new(abs, negative && !abs.is_zero());
    let fits = if signed {
        value.fits_signed(bits)
    } else {
        abs.bits() <= bits
    };
    if !fits {
        return Err(numeric_error(s, ty, "number out of range for target type"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDR: &str = "TLZVYZskxoJt4M4bYHPJm5hdM4PUWSGNPr";

    #[test]
    fn test_coerce_address_keeps_account_id() {
        let value = coerce(&ParamType::Address, &json!(ADDR)).unwrap();
        let Value::Address(id) = value else {
            panic!("expected address, got {value:?}");
        };
        assert_eq!(id.to_hex(), "0x742d35cc6634c0532925a3b844bc9e7595f0ab3d");
    }

    #[test]
    fn test_coerce_bad_address() {
        let err = coerce(&ParamType::Address, &json!("TNotAnAddress")).unwrap_err();
        assert!(matches!(err, SdkError::InvalidAddress(ref msg) if msg.contains("TNotAnAddress")));

        let err = coerce(&ParamType::Address, &json!(42)).unwrap_err();
        assert!(matches!(err, SdkError::InvalidAddress(_)));
    }

    #[test]
    fn test_coerce_address_array() {
        let ty = ParamType::FixedArray(Box::new(ParamType::Address), 2);
        let value = coerce(&ty, &json!([ADDR, "T9yD14Nj9j7xAB4dbGeiX9h8unkKHxuWwb"])).unwrap();
        let Value::List(items) = value else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], Value::Address(H160::ZERO));
    }

    #[test]
    fn test_coerce_fixed_array_arity() {
        let ty = ParamType::FixedArray(Box::new(ParamType::Address), 3);
        let err = coerce(&ty, &json!([ADDR])).unwrap_err();
        assert!(matches!(err, SdkError::TypeMismatch(_)));
    }

    #[test]
    fn test_coerce_native_widths() {
        assert_eq!(coerce(&ParamType::Uint(8), &json!("255")).unwrap(), Value::UInt64(255));
        assert_eq!(coerce(&ParamType::Int(8), &json!("-128")).unwrap(), Value::Int64(-128));
        assert_eq!(
            coerce(&ParamType::Uint(64), &json!("18446744073709551615")).unwrap(),
            Value::UInt64(u64::MAX)
        );
        assert_eq!(coerce(&ParamType::Uint(24), &json!("16777215")).unwrap(), Value::UInt64(16777215));
    }

    #[test]
    fn test_coerce_native_out_of_range() {
        for (ty, s) in [
            (ParamType::Uint(8), "256"),
            (ParamType::Int(8), "128"),
            (ParamType::Uint(24), "16777216"),
            (ParamType::Int(40), "-549755813889"),
            (ParamType::Uint(32), "-1"),
        ] {
            let err = coerce(&ty, &json!(s)).unwrap_err();
            assert!(matches!(err, SdkError::NumericParse { ref value, .. } if value == s), "{ty} {s}");
        }
    }

    #[test]
    fn test_coerce_rejects_non_numeric() {
        for s in ["", "abc", "1.5", "+1", " 1", "0x10"] {
            assert!(matches!(
                coerce(&ParamType::Uint(64), &json!(s)),
                Err(SdkError::NumericParse { .. })
            ));
            assert!(matches!(
                coerce(&ParamType::Uint(256), &json!(s)),
                Err(SdkError::NumericParse { .. })
            ));
        }
        assert!(matches!(
            coerce(&ParamType::Uint(256), &json!(1000)),
            Err(SdkError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_coerce_big_integers() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(
            coerce(&ParamType::Uint(256), &json!(max)).unwrap(),
            Value::BigInt(I256::new(U256::MAX, false))
        );
        assert_eq!(
            coerce(&ParamType::Int(256), &json!("-1000")).unwrap(),
            Value::BigInt(I256::from_i128(-1000))
        );
        assert_eq!(
            coerce(&ParamType::Uint(128), &json!("340282366920938463463374607431768211455")).unwrap(),
            Value::BigInt(I256::new(U256::from(u128::MAX), false))
        );
    }

    #[test]
    fn test_coerce_big_integer_overflow() {
        let too_big = "115792089237316195423570985008687907853269984665640564039457584007913129639936";
        assert!(matches!(
            coerce(&ParamType::Uint(256), &json!(too_big)),
            Err(SdkError::NumericParse { .. })
        ));
        assert!(matches!(
            coerce(&ParamType::Uint(128), &json!("340282366920938463463374607431768211456")),
            Err(SdkError::NumericParse { .. })
        ));
        assert!(matches!(
            coerce(&ParamType::Uint(256), &json!("-5")),
            Err(SdkError::NumericParse { .. })
        ));
    }

    #[test]
    fn test_coerce_integer_arrays() {
        let ty = ParamType::Array(Box::new(ParamType::Uint(256)));
        assert_eq!(
            coerce(&ty, &json!(["1", "2"])).unwrap(),
            Value::List(vec![
                Value::BigInt(I256::from_i128(1)),
                Value::BigInt(I256::from_i128(2)),
            ])
        );

        let ty = ParamType::FixedArray(Box::new(ParamType::Int(32)), 2);
        assert_eq!(
            coerce(&ty, &json!(["7", "9"])).unwrap(),
            Value::List(vec![Value::UInt64(7), Value::UInt64(9)])
        );
    }

    #[test]
    fn test_coerce_integer_array_non_string_element() {
        let ty = ParamType::Array(Box::new(ParamType::Uint(64)));
        let err = coerce(&ty, &json!(["1", 2])).unwrap_err();
        assert!(matches!(err, SdkError::TypeMismatch(ref msg) if msg.ends_with("got 2")));
    }

    #[test]
    fn test_raw_pass_through() {
        assert_eq!(coerce(&ParamType::Bool, &json!(true)).unwrap(), Value::Raw(json!(true)));
        assert_eq!(coerce(&ParamType::String, &json!("hi")).unwrap(), Value::Raw(json!("hi")));
        let ty = ParamType::Array(Box::new(ParamType::Bool));
        assert_eq!(coerce(&ty, &json!([true])).unwrap(), Value::Raw(json!([true])));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int64(-5).to_string(), "-5");
        assert_eq!(
            Value::List(vec![Value::UInt64(1), Value::UInt64(2)]).to_string(),
            "[1,2]"
        );
    }
}
