//! Derivation paths and derived key material

use std::fmt;
use std::str::FromStr;

use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Offset added to an index to mark it hardened
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// SLIP-0044 coin type registered for Solana
pub const SOLANA_COIN_TYPE: u32 = 501;

/// BIP-44 purpose field
pub const BIP44_PURPOSE: u32 = 44;

/// A hardened-only HD derivation path such as `m/44'/501'/0'/0'`
///
/// Indices are stored without the hardened offset; every component is
/// hardened, which is the only kind ED25519 supports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    indices: Vec<u32>,
}

impl DerivationPath {
    /// Build a path from raw (unhardened) indices
    pub fn new(indices: Vec<u32>) -> Result<Self> {
        if indices.is_empty() {
            return Err(Error::Derivation("derivation path has no components".to_string()));
        }
        if let Some(index) = indices.iter().find(|i| **i >= HARDENED_OFFSET) {
            return Err(Error::Derivation(format!(
                "index {} exceeds the hardened range",
                index
            )));
        }
        Ok(Self { indices })
    }

    /// The ledger path `m/44'/<coin_type>'/<account_index>'/0'`
    pub fn solana_account(coin_type: u32, account_index: u32) -> Result<Self> {
        Self::new(vec![BIP44_PURPOSE, coin_type, account_index, 0])
    }

    /// Raw indices, without the hardened offset
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Indices as fed to the child derivation, hardened offset applied
    pub fn hardened_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.indices.iter().map(|i| i | HARDENED_OFFSET)
    }

    /// The account component of a BIP-44 style path
    pub fn account_index(&self) -> Option<u32> {
        self.indices.get(2).copied()
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let mut components = path.split('/');

        match components.next() {
            Some("m") => {}
            _ => {
                return Err(Error::Derivation(format!(
                    "Invalid derivation path: {:?}",
                    path
                )))
            }
        }

        let mut indices = Vec::new();
        for component in components {
            let digits = component.strip_suffix('\'').ok_or_else(|| {
                Error::Derivation(format!(
                    "Invalid derivation path component {:?}: ED25519 only supports hardened indices",
                    component
                ))
            })?;

            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::Derivation(format!(
                    "Invalid derivation path component: {:?}",
                    component
                )));
            }

            let index = digits.parse::<u32>().map_err(|_| {
                Error::Derivation(format!("Derivation index out of range: {}", digits))
            })?;
            indices.push(index);
        }

        Self::new(indices)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.indices {
            write!(f, "/{}'", index)?;
        }
        Ok(())
    }
}

/// An ED25519 key pair derived from a seed
///
/// The 64-byte signing key is the secret scalar seed followed by the public
/// key, the layout Solana tooling expects.
#[derive(Clone)]
pub struct KeyPair {
    keypair_bytes: Zeroizing<[u8; 64]>,
}

impl KeyPair {
    /// Create a key pair from secret || public bytes
    pub fn from_keypair_bytes(bytes: [u8; 64]) -> Self {
        Self {
            keypair_bytes: Zeroizing::new(bytes),
        }
    }

    /// The full 64-byte signing key
    pub fn secret_bytes(&self) -> &[u8; 64] {
        &self.keypair_bytes
    }

    /// The 32-byte public key
    pub fn public_bytes(&self) -> &[u8] {
        &self.keypair_bytes[32..]
    }

    /// Base58 public key, the wallet identifier
    pub fn public_key_id(&self) -> String {
        bs58::encode(self.public_bytes()).into_string()
    }

    /// Base58 signing key, the persisted private key representation
    pub fn private_key_base58(&self) -> String {
        bs58::encode(&self.keypair_bytes[..]).into_string()
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_solana_path() {
        let path: DerivationPath = "m/44'/501'/7'/0'".parse().unwrap();
        assert_eq!(path.indices(), &[44, 501, 7, 0]);
        assert_eq!(path.account_index(), Some(7));
        assert_eq!(path.to_string(), "m/44'/501'/7'/0'");
    }

    #[test]
    fn test_solana_account_matches_parsed() {
        let built = DerivationPath::solana_account(SOLANA_COIN_TYPE, 3).unwrap();
        let parsed: DerivationPath = "m/44'/501'/3'/0'".parse().unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn test_hardened_indices() {
        let path: DerivationPath = "m/0'/1'".parse().unwrap();
        let hardened: Vec<u32> = path.hardened_indices().collect();
        assert_eq!(hardened, vec![0x8000_0000, 0x8000_0001]);
    }

    #[test]
    fn test_rejects_malformed_paths() {
        for bad in [
            "",
            "m",
            "m/",
            "44'/501'",
            "n/44'",
            "m/44'/501'/0'/0",
            "m/44'//0'",
            "m/abc'",
            "m/+1'",
            "m/-1'",
            "m/44h",
            "m/2147483648'",
            "m/99999999999'",
        ] {
            assert!(
                matches!(bad.parse::<DerivationPath>(), Err(Error::Derivation(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_max_hardened_index() {
        let path: DerivationPath = "m/2147483647'".parse().unwrap();
        assert_eq!(path.indices(), &[HARDENED_OFFSET - 1]);
        assert!(DerivationPath::solana_account(SOLANA_COIN_TYPE, HARDENED_OFFSET).is_err());
    }
}
