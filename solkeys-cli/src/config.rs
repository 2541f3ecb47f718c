//! CLI configuration

use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// JSON file holding the mnemonic and wallet ledger
    pub store_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_path: Self::default_store_path(),
        }
    }
}

impl CliConfig {
    /// Resolve the configuration from `--store` (or `SOLKEYS_STORE`)
    pub fn resolve(store: Option<PathBuf>) -> Self {
        match store {
            Some(store_path) => Self { store_path },
            None => Self::default(),
        }
    }

    /// `~/.solkeys/wallet.json`, or `./.solkeys/wallet.json` without a home
    pub fn default_store_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".solkeys")
            .join("wallet.json")
    }
}
