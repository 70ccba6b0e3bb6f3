//! Call payload encoding

use std::path::PathBuf;

use clap::Args;
use strata_sdk::abi::pack;

use super::resolve_method;
use crate::{output::Output, CliError};

/// Print the call payload for a method and parameter list
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Method signature, or method name when --abi is given
    #[arg(short, long)]
    pub method: String,
    /// Parameter list JSON, e.g. '[{"uint256":"1"}]'
    #[arg(short, long, default_value = "")]
    pub params: String,
    /// Contract ABI JSON file
    #[arg(long)]
    pub abi: Option<PathBuf>,
}

impl EncodeArgs {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let method = resolve_method(&self.method, self.abi.as_deref())?;
        let data = pack(&method, &self.params)?;

        Output::new(json)
            .field("signature", &method.signature())
            .field("selector", &hex::encode(method.selector()))
            .field("data", &hex::encode(&data))
            .line(hex::encode(&data))
            .print();
        Ok(())
    }
}
