//! Wallet configuration

use tracing::warn;

use crate::crypto::keys::SOLANA_COIN_TYPE;
use crate::crypto::mnemonic::MnemonicStrength;

/// Environment variable selecting 12 or 24 word mnemonics
pub const MNEMONIC_WORDS_ENV: &str = "SOLKEYS_MNEMONIC_WORDS";

/// Settings for a wallet session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    /// SLIP-0044 coin type used in `m/44'/<coin_type>'/<n>'/0'`
    pub coin_type: u32,
    /// Strength of freshly generated mnemonics
    pub mnemonic_strength: MnemonicStrength,
}

impl WalletConfig {
    /// Configuration with built-in defaults, ignoring the environment
    pub fn solana() -> Self {
        Self {
            coin_type: SOLANA_COIN_TYPE,
            mnemonic_strength: MnemonicStrength::Words12,
        }
    }

    /// Builder-style strength override
    pub fn with_mnemonic_strength(mut self, strength: MnemonicStrength) -> Self {
        self.mnemonic_strength = strength;
        self
    }
}

/// Parse a `SOLKEYS_MNEMONIC_WORDS` value
fn parse_mnemonic_words(value: &str) -> Option<MnemonicStrength> {
    value
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(MnemonicStrength::from_word_count)
}

impl Default for WalletConfig {
    /// Solana defaults; only the mnemonic strength may come from the
    /// environment
    fn default() -> Self {
        let defaults = Self::solana();
        let mnemonic_strength = match std::env::var(MNEMONIC_WORDS_ENV) {
            Ok(value) => parse_mnemonic_words(&value).unwrap_or_else(|| {
                warn!(
                    var = MNEMONIC_WORDS_ENV,
                    %value,
                    "Unsupported word count, expected 12 or 24; using the default"
                );
                defaults.mnemonic_strength
            }),
            Err(_) => defaults.mnemonic_strength,
        };

        Self {
            mnemonic_strength,
            ..defaults
        }
    }
}
