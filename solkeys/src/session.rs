//! Wallet session: the active mnemonic, the ledger and where they are stored
//!
//! A session is the one owner of mutable wallet state. Every mutation is
//! computed on a copy, written to the store as a single batch and only then
//! made visible, so a failed write leaves memory and storage in agreement.

use std::fmt;

use bip39::Mnemonic;
use tracing::{info, warn};

use crate::account::{WalletLedger, WalletRecord};
use crate::config::WalletConfig;
use crate::crypto::mnemonic::{generate_mnemonic, validate_mnemonic};
use crate::error::{Error, Result};
use crate::storage::{KeyValueStore, StoreOp, NEXT_PATH_INDEX_KEY, SEED_PHRASE_KEY, WALLETS_KEY};

/// Where a session sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing generated or imported yet, or everything was cleared
    NoMnemonic,
    /// A mnemonic is active but every wallet has been removed
    EmptyLedger,
    /// A mnemonic is active and at least one wallet exists
    NonEmptyLedger,
}

/// Result of generating or importing a mnemonic
#[derive(Clone)]
pub struct Onboarding {
    pub mnemonic: Mnemonic,
    pub first_wallet: WalletRecord,
}

impl fmt::Debug for Onboarding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Onboarding")
            .field("mnemonic", &"<redacted>")
            .field("first_wallet", &self.first_wallet)
            .finish()
    }
}

/// Owned wallet context backed by a key/value store
pub struct WalletSession<S> {
    store: S,
    config: WalletConfig,
    mnemonic: Option<Mnemonic>,
    ledger: WalletLedger,
}

impl<S: KeyValueStore> WalletSession<S> {
    /// Load the session persisted in `store`
    ///
    /// Corrupt entries are reported rather than reset.
    pub fn open(store: S, config: WalletConfig) -> Result<Self> {
        let mnemonic = store
            .get(SEED_PHRASE_KEY)?
            .map(|phrase| validate_mnemonic(&phrase))
            .transpose()?;

        let records: Vec<WalletRecord> = match store.get(WALLETS_KEY)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                Error::Persistence(format!("corrupt {:?} entry: {}", WALLETS_KEY, e))
            })?,
            None => Vec::new(),
        };

        let mut next_path_index = match store.get(NEXT_PATH_INDEX_KEY)? {
            Some(value) => value.trim().parse::<u32>().map_err(|e| {
                Error::Persistence(format!(
                    "corrupt {:?} entry {:?}: {}",
                    NEXT_PATH_INDEX_KEY, value, e
                ))
            })?,
            None => 0,
        };

        // Never hand out an index a surviving record already uses
        if let Some(highest) = records.iter().filter_map(|r| r.account_index()).max() {
            if highest >= next_path_index {
                warn!(
                    stored = next_path_index,
                    highest, "Stored path index is behind the ledger, advancing it"
                );
                next_path_index = highest.saturating_add(1);
            }
        }

        let ledger = WalletLedger::from_parts(records, next_path_index);
        info!(
            wallets = ledger.len(),
            next_path_index = ledger.next_path_index(),
            has_mnemonic = mnemonic.is_some(),
            "Wallet session opened"
        );

        Ok(Self {
            store,
            config,
            mnemonic,
            ledger,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        match (&self.mnemonic, self.ledger.is_empty()) {
            (None, _) => SessionState::NoMnemonic,
            (Some(_), true) => SessionState::EmptyLedger,
            (Some(_), false) => SessionState::NonEmptyLedger,
        }
    }

    /// Generate a fresh mnemonic, or import `phrase`, and derive the first wallet
    ///
    /// Only allowed while no mnemonic is active.
    pub fn generate_or_import(&mut self, phrase: Option<&str>) -> Result<Onboarding> {
        if self.mnemonic.is_some() {
            return Err(Error::MnemonicAlreadySet);
        }

        let mnemonic = match phrase {
            Some(phrase) => validate_mnemonic(phrase)?,
            None => generate_mnemonic(self.config.mnemonic_strength)?,
        };

        let mut ledger = self.ledger.clone();
        let first_wallet = ledger.add_wallet(&mnemonic, self.config.coin_type)?;
        self.commit(Some(mnemonic.clone()), ledger)?;

        info!(
            imported = phrase.is_some(),
            public_key = %first_wallet.public_key,
            "Mnemonic activated"
        );
        Ok(Onboarding {
            mnemonic,
            first_wallet,
        })
    }

    /// Derive the next wallet from the active mnemonic
    pub fn add_wallet(&mut self) -> Result<WalletRecord> {
        let mnemonic = self.mnemonic.clone().ok_or(Error::NoActiveMnemonic)?;
        self.add_wallet_with(&mnemonic)
    }

    /// Derive the next wallet from an explicit mnemonic
    ///
    /// The active mnemonic is left as it is; the record carries the phrase it
    /// came from.
    pub fn add_wallet_with(&mut self, mnemonic: &Mnemonic) -> Result<WalletRecord> {
        let mut ledger = self.ledger.clone();
        let record = ledger.add_wallet(mnemonic, self.config.coin_type)?;
        self.commit(self.mnemonic.clone(), ledger)?;
        Ok(record)
    }

    /// Remove the first wallet with `public_key`
    ///
    /// Returns `None` without touching storage when nothing matches.
    pub fn remove_wallet(&mut self, public_key: &str) -> Result<Option<WalletRecord>> {
        let mut ledger = self.ledger.clone();
        let Some(removed) = ledger.remove_wallet(public_key) else {
            return Ok(None);
        };

        self.commit(self.mnemonic.clone(), ledger)?;
        Ok(Some(removed))
    }

    /// Forget every wallet and the active mnemonic
    ///
    /// Irreversible; callers should confirm with the user first.
    pub fn clear_all(&mut self) -> Result<()> {
        let mut ledger = self.ledger.clone();
        ledger.clear_all();
        self.commit(None, ledger)?;

        info!("Wallet session cleared");
        Ok(())
    }

    /// Issue the account indices below `count` not yet handed out, using the
    /// active mnemonic
    pub fn restore_wallets(&mut self, count: u32) -> Result<Vec<WalletRecord>> {
        let mnemonic = self.mnemonic.clone().ok_or(Error::NoActiveMnemonic)?;

        let mut ledger = self.ledger.clone();
        let restored = ledger.restore_wallets(&mnemonic, self.config.coin_type, count)?;
        self.commit(Some(mnemonic), ledger)?;
        Ok(restored)
    }

    /// Wallets in insertion order
    pub fn list_wallets(&self) -> &[WalletRecord] {
        self.ledger.list()
    }

    pub fn ledger(&self) -> &WalletLedger {
        &self.ledger
    }

    /// The active mnemonic, if any
    pub fn mnemonic(&self) -> Option<&Mnemonic> {
        self.mnemonic.as_ref()
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Tear down the session and hand back its store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Persist `mnemonic` and `ledger` as one batch, then adopt them
    fn commit(&mut self, mnemonic: Option<Mnemonic>, ledger: WalletLedger) -> Result<()> {
        let wallets = serde_json::to_string(ledger.list())?;

        let mut batch = Vec::with_capacity(3);
        batch.push(match &mnemonic {
            Some(m) => StoreOp::put(SEED_PHRASE_KEY, m.to_string()),
            None => StoreOp::delete(SEED_PHRASE_KEY),
        });
        batch.push(StoreOp::put(WALLETS_KEY, wallets));
        batch.push(StoreOp::put(
            NEXT_PATH_INDEX_KEY,
            ledger.next_path_index().to_string(),
        ));

        self.store.apply(batch)?;

        self.mnemonic = mnemonic;
        self.ledger = ledger;
        Ok(())
    }
}
