//! Type descriptor parsing

use super::types::ParamType;
use crate::SdkError;

/// Rewrite a bare `uint`/`int` to its 256-bit form, keeping any array suffix
///
/// `"uint"` becomes `"uint256"` and `"int[4]"` becomes `"int256[4]"`.
/// Anything else is returned trimmed and unchanged.
pub fn normalize_type(descriptor: &str) -> String {
    let s = descriptor.trim();
    for base in ["uint", "int"] {
        if let Some(rest) = s.strip_prefix(base) {
            if rest.is_empty() || rest.starts_with('[') {
                return format!("{}256{}", base, rest);
            }
        }
    }
    s.to_string()
}

/// Resolve a type descriptor such as `"uint256"`, `"address[4]"` or `"uint"`
pub fn resolve_type(descriptor: &str) -> Result<ParamType, SdkError> {
    let normalized = normalize_type(descriptor);
    parse_normalized(&normalized).ok_or_else(|| SdkError::InvalidType(descriptor.to_string()))
}

fn parse_normalized(s: &str) -> Option<ParamType> {
    // Array suffix binds last: "uint8[2][]" is a slice of uint8[2]
    if let Some(body) = s.strip_suffix(']') {
        let open = body.rfind('[')?;
        let inner = parse_normalized(&body[..open])?;
        let arity = &body[open + 1..];
        if arity.is_empty() {
            return Some(ParamType::Array(Box::new(inner)));
        }
        let size = parse_decimal(arity)?;
        if size == 0 {
            return None;
        }
        return Some(ParamType::FixedArray(Box::new(inner), size));
    }

    match s {
        "address" => return Some(ParamType::Address),
        "bool" => return Some(ParamType::Bool),
        "string" => return Some(ParamType::String),
        "bytes" => return Some(ParamType::Bytes),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("uint") {
        return integer_width(rest).map(ParamType::Uint);
    }
    if let Some(rest) = s.strip_prefix("int") {
        return integer_width(rest).map(ParamType::Int);
    }
    if let Some(rest) = s.strip_prefix("bytes") {
        let size = parse_decimal(rest)?;
        return (1..=32).contains(&size).then_some(ParamType::FixedBytes(size));
    }

    None
}

fn integer_width(s: &str) -> Option<usize> {
    let bits = parse_decimal(s)?;
    (bits > 0 && bits <= 256 && bits % 8 == 0).then_some(bits)
}

/// Plain decimal without sign or leading zeros
fn parse_decimal(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if s.len() > 1 && s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}
