//! The wallet ledger: derived wallets plus the next unused account index

use bip39::Mnemonic;
use tracing::{debug, info};

use super::wallet::WalletRecord;
use crate::crypto::keys::DerivationPath;
use crate::error::Result;

/// Ordered record of derived wallets
///
/// Records keep insertion order. `next_path_index` only moves forward, except
/// on [`WalletLedger::clear_all`], so a removed wallet's index is never handed
/// out again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletLedger {
    records: Vec<WalletRecord>,
    next_path_index: u32,
}

impl WalletLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted parts
    pub fn from_parts(records: Vec<WalletRecord>, next_path_index: u32) -> Self {
        Self {
            records,
            next_path_index,
        }
    }

    /// Derive the wallet at the next account index and append it
    ///
    /// The ledger is left untouched if derivation fails.
    pub fn add_wallet(&mut self, mnemonic: &Mnemonic, coin_type: u32) -> Result<WalletRecord> {
        let index = self.next_path_index;
        let path = DerivationPath::solana_account(coin_type, index)?;
        let record = WalletRecord::derive(mnemonic, &path)?;

        self.records.push(record.clone());
        self.next_path_index = index + 1;

        info!(path = %record.path, public_key = %record.public_key, "Wallet added");
        Ok(record)
    }

    /// Remove the first wallet with the given public key
    pub fn remove_wallet(&mut self, public_key: &str) -> Option<WalletRecord> {
        let position = self.records.iter().position(|r| r.public_key == public_key)?;
        let removed = self.records.remove(position);

        info!(path = %removed.path, public_key = %removed.public_key, "Wallet removed");
        Some(removed)
    }

    /// Drop every wallet and reset the index counter to 0
    pub fn clear_all(&mut self) {
        info!(count = self.records.len(), "Clearing wallet ledger");
        self.records.clear();
        self.next_path_index = 0;
    }

    /// Issue every account index below `count` that was never handed out
    ///
    /// Derives `next_path_index..count` in order and appends the records. An
    /// index that was issued before, including one whose wallet was removed,
    /// is not derived again. Returns the appended records; the ledger is left
    /// untouched if any derivation fails.
    pub fn restore_wallets(
        &mut self,
        mnemonic: &Mnemonic,
        coin_type: u32,
        count: u32,
    ) -> Result<Vec<WalletRecord>> {
        let start = self.next_path_index;
        let restored = (start..count)
            .map(|index| {
                let path = DerivationPath::solana_account(coin_type, index)?;
                WalletRecord::derive(mnemonic, &path)
            })
            .collect::<Result<Vec<_>>>()?;

        if restored.is_empty() {
            debug!(next_path_index = start, count, "Nothing to restore");
        }

        self.records.extend(restored.iter().cloned());
        self.next_path_index = start.max(count);

        info!(restored = restored.len(), next_path_index = self.next_path_index, "Wallets restored");
        Ok(restored)
    }

    /// Find a wallet by public key
    pub fn find(&self, public_key: &str) -> Option<&WalletRecord> {
        self.records.iter().find(|r| r.public_key == public_key)
    }

    /// Read-only view of the records in insertion order
    pub fn list(&self) -> &[WalletRecord] {
        &self.records
    }

    /// The account index the next `add_wallet` will use
    pub fn next_path_index(&self) -> u32 {
        self.next_path_index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
