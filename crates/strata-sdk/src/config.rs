//! Client configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-call RPC timeout
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 5_000;

/// Default node endpoint
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8090/jsonrpc";

/// Connection settings for [`LedgerClient`](crate::LedgerClient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Node JSON-RPC endpoint
    pub rpc_url: String,
    /// Timeout applied to each RPC call
    pub rpc_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            rpc_timeout_ms: DEFAULT_RPC_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Config for `rpc_url` with the default timeout
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Default::default()
        }
    }

    /// Per-call timeout as a duration
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.rpc_timeout(), Duration::from_secs(5));
        assert_eq!(config.rpc_url, DEFAULT_RPC_URL);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"rpc_url":"http://node:8090"}"#).unwrap();
        assert_eq!(config.rpc_url, "http://node:8090");
        assert_eq!(config.rpc_timeout_ms, DEFAULT_RPC_TIMEOUT_MS);
    }
}
