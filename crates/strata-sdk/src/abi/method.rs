//! Contract method descriptions

use serde_json::Value as Json;

use super::encode::selector_hash;
use super::resolve::resolve_type;
use super::types::ParamType;
use crate::SdkError;

/// A contract method: name plus declared input and output types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Method name
    pub name: String,
    /// Declared input types, in order
    pub inputs: Vec<ParamType>,
    /// Declared output types, in order
    pub outputs: Vec<ParamType>,
}

impl Method {
    /// Create a method from resolved types
    pub fn new(name: impl Into<String>, inputs: Vec<ParamType>, outputs: Vec<ParamType>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Parse signature text such as `transfer(address,uint256)`
    ///
    /// Input types may use the bare `uint`/`int` aliases. The parsed method
    /// has no outputs.
    pub fn parse(signature: &str) -> Result<Self, SdkError> {
        let malformed = || SdkError::InvalidParam(format!("malformed method signature: {}", signature));

        let s = signature.trim();
        let open = s.find('(').ok_or_else(malformed)?;
        let args = s[open + 1..].strip_suffix(')').ok_or_else(malformed)?;
        let name = s[..open].trim();
        if !is_identifier(name) {
            return Err(malformed());
        }

        let inputs = if args.trim().is_empty() {
            Vec::new()
        } else {
            args.split(',')
                .map(|ty| resolve_type(ty.trim()))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self::new(name, inputs, Vec::new()))
    }

    /// Find a function in a contract ABI document
    ///
    /// Accepts the plain array form and the node's `{"entrys": [...]}`
    /// wrapper. `name` is either a bare method name (first match wins) or a
    /// full signature to pick one overload.
    pub fn from_abi_json(abi: &str, name: &str) -> Result<Self, SdkError> {
        let doc: Json = serde_json::from_str(abi)?;
        let entries = match &doc {
            Json::Array(entries) => entries,
            Json::Object(obj) => obj
                .get("entrys")
                .and_then(Json::as_array)
                .ok_or_else(|| SdkError::AbiDecode("ABI object has no \"entrys\" list".to_string()))?,
            _ => return Err(SdkError::AbiDecode("ABI must be an array or object".to_string())),
        };

        let wanted = name.split('(').next().unwrap_or(name);
        let mut unresolved = None;
        for entry in entries {
            if !is_function(entry) {
                continue;
            }
            match entry.get("name").and_then(Json::as_str) {
                Some(entry_name) if entry_name == wanted => {}
                _ => continue,
            }

            // Overloads with unsupported types are skipped, not fatal
            let resolved = entry_types(entry, "inputs").and_then(|inputs| {
                entry_types(entry, "outputs").map(|outputs| Self::new(wanted, inputs, outputs))
            });
            let method = match resolved {
                Ok(method) => method,
                Err(e) => {
                    unresolved.get_or_insert(e);
                    continue;
                }
            };
            if wanted == name || method.signature() == name {
                return Ok(method);
            }
        }

        Err(unresolved
            .unwrap_or_else(|| SdkError::AbiDecode(format!("method {} not found in ABI", name))))
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(ToString::to_string).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// 4-byte selector of the canonical signature
    pub fn selector(&self) -> [u8; 4] {
        selector_hash(&self.signature())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Entries without a type are functions
fn is_function(entry: &Json) -> bool {
    entry
        .get("type")
        .and_then(Json::as_str)
        .map_or(true, |ty| ty.eq_ignore_ascii_case("function"))
}

fn entry_types(entry: &Json, field: &str) -> Result<Vec<ParamType>, SdkError> {
    let Some(params) = entry.get(field).and_then(Json::as_array) else {
        return Ok(Vec::new());
    };
    params
        .iter()
        .map(|param| {
            let ty = param
                .get("type")
                .and_then(Json::as_str)
                .ok_or_else(|| SdkError::AbiDecode(format!("{} entry without type: {}", field, param)))?;
            resolve_type(ty)
        })
        .collect()
}
