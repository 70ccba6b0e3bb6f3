//! CLI command implementations

pub mod encode;
pub mod trigger;
pub mod txid;

use std::path::Path;

use strata_sdk::abi::Method;

use crate::CliError;

/// Resolve `method` as a signature, or as a name inside an ABI file
pub(crate) fn resolve_method(method: &str, abi: Option<&Path>) -> Result<Method, CliError> {
    match abi {
        Some(path) => {
            let document = std::fs::read_to_string(path)?;
            Ok(Method::from_abi_json(&document, method)?)
        }
        None => Ok(Method::parse(method)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_signature() {
        let method = resolve_method("transfer(address,uint256)", None).unwrap();
        assert_eq!(method.name, "transfer");
        assert_eq!(method.inputs.len(), 2);
    }

    #[test]
    fn test_resolve_from_abi_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"entrys":[{{"type":"Function","name":"balanceOf","inputs":[{{"type":"address"}}],"outputs":[{{"type":"uint256"}}]}}]}}"#
        )
        .unwrap();

        let method = resolve_method("balanceOf", Some(file.path())).unwrap();
        assert_eq!(method.signature(), "balanceOf(address)");
    }

    #[test]
    fn test_missing_abi_file() {
        let err = resolve_method("f", Some(Path::new("/nonexistent/abi.json"))).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
