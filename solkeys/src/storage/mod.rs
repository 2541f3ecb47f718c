//! Key/value persistence for wallet state
//!
//! Values are plain strings, the shape a browser local store would hold. A
//! batch of operations is applied completely or not at all.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Key holding the active mnemonic phrase
pub const SEED_PHRASE_KEY: &str = "seed-phase";

/// Key holding the JSON array of wallet records
pub const WALLETS_KEY: &str = "wallets";

/// Key holding the next account index as a decimal string
pub const NEXT_PATH_INDEX_KEY: &str = "next-wallet-path-index";

/// A single write in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Put(String, String),
    Delete(String),
}

impl StoreOp {
    pub fn put(key: &str, value: impl Into<String>) -> Self {
        StoreOp::Put(key.to_string(), value.into())
    }

    pub fn delete(key: &str) -> Self {
        StoreOp::Delete(key.to_string())
    }

    /// Key touched by this operation
    pub fn key(&self) -> &str {
        match self {
            StoreOp::Put(key, _) | StoreOp::Delete(key) => key,
        }
    }
}

/// Storage medium for wallet state
pub trait KeyValueStore {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Apply every operation in `batch` atomically
    fn apply(&mut self, batch: Vec<StoreOp>) -> Result<()>;
}
