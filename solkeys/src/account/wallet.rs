//! Wallet records

use std::fmt;

use bip39::Mnemonic;
use serde::{Deserialize, Serialize};

use crate::crypto::keys::{derive_keypair, DerivationPath};
use crate::crypto::mnemonic::seed_from_mnemonic;
use crate::error::Result;

/// A wallet derived from a mnemonic at one derivation path
///
/// Field names are the persisted layout and must not change.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    /// Base58 of the 64-byte signing key
    pub private_key: String,
    /// Base58 of the 32-byte ED25519 public key
    pub public_key: String,
    /// Derivation path, e.g. `m/44'/501'/0'/0'`
    pub path: String,
    /// The phrase this wallet was derived from
    pub mnemonic: String,
}

impl WalletRecord {
    /// Derive the record for `mnemonic` at `path`
    pub fn derive(mnemonic: &Mnemonic, path: &DerivationPath) -> Result<Self> {
        let seed = seed_from_mnemonic(mnemonic);
        let key_pair = derive_keypair(&seed, path)?;

        Ok(Self {
            private_key: key_pair.private_key_base58(),
            public_key: key_pair.public_key_id(),
            path: path.to_string(),
            mnemonic: mnemonic.to_string(),
        })
    }

    /// Parse the stored path back into its components
    pub fn derivation_path(&self) -> Result<DerivationPath> {
        self.path.parse()
    }

    /// Account index of the stored path, if it is a BIP-44 style path
    pub fn account_index(&self) -> Option<u32> {
        self.derivation_path().ok()?.account_index()
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("public_key", &self.public_key)
            .field("path", &self.path)
            .field("private_key", &"<redacted>")
            .field("mnemonic", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::SOLANA_COIN_TYPE;
    use crate::crypto::mnemonic::validate_mnemonic;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_derive_record() {
        let mnemonic = validate_mnemonic(ABANDON).unwrap();
        let path = DerivationPath::solana_account(SOLANA_COIN_TYPE, 2).unwrap();
        let record = WalletRecord::derive(&mnemonic, &path).unwrap();

        assert_eq!(record.path, "m/44'/501'/2'/0'");
        assert_eq!(record.mnemonic, ABANDON);
        assert_eq!(record.account_index(), Some(2));

        let secret = bs58::decode(&record.private_key).into_vec().unwrap();
        let public = bs58::decode(&record.public_key).into_vec().unwrap();
        assert_eq!(secret.len(), 64);
        assert_eq!(&secret[32..], &public[..]);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mnemonic = validate_mnemonic(ABANDON).unwrap();
        let path = DerivationPath::solana_account(SOLANA_COIN_TYPE, 0).unwrap();
        let record = WalletRecord::derive(&mnemonic, &path).unwrap();

        let debug = format!("{:?}", record);
        assert!(debug.contains(&record.public_key));
        assert!(!debug.contains(&record.private_key));
        assert!(!debug.contains("abandon"));
    }

    #[test]
    fn test_persisted_field_names() {
        let record = WalletRecord {
            private_key: "priv".to_string(),
            public_key: "pub".to_string(),
            path: "m/44'/501'/0'/0'".to_string(),
            mnemonic: "words".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["private_key"], "priv");
        assert_eq!(json["public_key"], "pub");
        assert_eq!(json["path"], "m/44'/501'/0'/0'");
        assert_eq!(json["mnemonic"], "words");
    }
}
