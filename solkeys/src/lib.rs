//! solkeys - Solana HD wallet core
//!
//! This library turns a BIP-39 mnemonic into a deterministic sequence of
//! ED25519 key pairs (SLIP-0010, `m/44'/501'/<n>'/0'`) and keeps the derived
//! wallets in a persisted ledger that never reuses an account index.
//!
//! ```no_run
//! use solkeys::{MemoryStore, WalletConfig, WalletSession};
//!
//! # fn main() -> solkeys::Result<()> {
//! let mut session = WalletSession::open(MemoryStore::new(), WalletConfig::default())?;
//! let onboarding = session.generate_or_import(None)?;
//! let second = session.add_wallet()?;
//! assert_ne!(onboarding.first_wallet.public_key, second.public_key);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod config;
pub mod crypto;
pub mod account;
pub mod storage;
pub mod session;

// Re-export commonly used types for convenience
pub use account::{WalletLedger, WalletRecord};
pub use bip39::Mnemonic;
pub use config::WalletConfig;
pub use crypto::keys::{derive_keypair, DerivationPath, KeyPair, SOLANA_COIN_TYPE};
pub use crypto::mnemonic::{generate_mnemonic, seed_from_mnemonic, validate_mnemonic, MnemonicStrength, Seed};
pub use error::{Error, Result};
pub use session::{Onboarding, SessionState, WalletSession};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreOp};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
