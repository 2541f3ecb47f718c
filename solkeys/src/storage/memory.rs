//! In-memory store

use std::collections::HashMap;

use super::{KeyValueStore, StoreOp};
use crate::error::Result;

/// A store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn apply(&mut self, batch: Vec<StoreOp>) -> Result<()> {
        for op in batch {
            match op {
                StoreOp::Put(key, value) => {
                    self.entries.insert(key, value);
                }
                StoreOp::Delete(key) => {
                    self.entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
