//! Mnemonic phrase generation and handling

use std::fmt;

use bip39::{Language, Mnemonic};
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};

/// Length of a BIP-39 seed in bytes
pub const SEED_LEN: usize = 64;

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    #[default]
    Words12,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bytes
    fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16, // 128 bits = 16 bytes
            Self::Words24 => 32, // 256 bits = 32 bytes
        }
    }

    /// Number of words produced at this strength
    pub fn word_count(&self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words24 => 24,
        }
    }

    /// Map a word count back to a strength
    pub fn from_word_count(words: usize) -> Option<Self> {
        match words {
            12 => Some(Self::Words12),
            24 => Some(Self::Words24),
            _ => None,
        }
    }
}

/// A 64-byte BIP-39 seed, wiped from memory on drop
#[derive(Clone)]
pub struct Seed(Zeroizing<[u8; SEED_LEN]>);

impl Seed {
    /// Wrap raw seed bytes
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Get the raw seed bytes
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        self.0[..] == other.0[..]
    }
}

impl Eq for Seed {}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Generate a new random mnemonic phrase with the specified strength
///
/// Entropy comes from the operating system CSPRNG and is wiped once the
/// phrase has been built.
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<Mnemonic> {
    let mut entropy = vec![0u8; strength.entropy_bytes()];
    OsRng.fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy)
        .map_err(|e| Error::InvalidMnemonic(e.to_string()));
    entropy.zeroize();

    mnemonic
}

/// Parse and validate a user supplied mnemonic phrase
///
/// Checks word count, wordlist membership and the embedded checksum.
pub fn validate_mnemonic(phrase: &str) -> Result<Mnemonic> {
    Mnemonic::parse_in_normalized(Language::English, phrase)
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

/// Expand a mnemonic into its seed with an empty passphrase
pub fn seed_from_mnemonic(mnemonic: &Mnemonic) -> Seed {
    Seed::from_bytes(mnemonic.to_seed_normalized(""))
}

/// Generate a seed from a mnemonic phrase and optional passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<Seed> {
    let mnemonic = validate_mnemonic(phrase)?;
    Ok(Seed::from_bytes(mnemonic.to_seed(passphrase.unwrap_or(""))))
}
