//! CLI configuration management

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use strata_sdk::{ClientConfig, DEFAULT_CONFIRMATION_WAIT, DEFAULT_RPC_TIMEOUT_MS, DEFAULT_RPC_URL};

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Node JSON-RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Per-call RPC timeout in milliseconds
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    /// Fee limit applied to triggered calls; 0 keeps the node's
    #[serde(default)]
    pub fee_limit: u64,
    /// Seconds to wait for a receipt; 0 skips confirmation
    #[serde(default = "default_confirmation_wait")]
    pub confirmation_wait: u32,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_rpc_timeout_ms() -> u64 {
    DEFAULT_RPC_TIMEOUT_MS
}

fn default_confirmation_wait() -> u32 {
    DEFAULT_CONFIRMATION_WAIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            rpc_timeout_ms: default_rpc_timeout_ms(),
            fee_limit: 0,
            confirmation_wait: default_confirmation_wait(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".strata"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load from the default path; missing or unreadable files yield defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %format!("{:#}", e), "Ignoring config file");
                Self::default()
            }
        }
    }

    /// Load from `path`
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Save to the default path
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = Self::config_path().context("cannot determine config path")?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }

    /// Connection settings for the SDK client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            rpc_url: self.rpc_url.clone(),
            rpc_timeout_ms: self.rpc_timeout_ms,
        }
    }
}
