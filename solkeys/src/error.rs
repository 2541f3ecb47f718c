//! Error types for the solkeys library

use thiserror::Error;

/// Custom error type for solkeys operations
#[derive(Error, Debug)]
pub enum Error {
    /// The phrase is not a valid BIP-39 English mnemonic
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Malformed derivation path or out-of-range index
    #[error("Key derivation error: {0}")]
    Derivation(String),

    /// The storage medium could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("No active mnemonic; generate or import one first")]
    NoActiveMnemonic,

    #[error("A mnemonic is already active; clear the wallet before generating or importing another")]
    MnemonicAlreadySet,
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for solkeys operations
pub type Result<T> = std::result::Result<T, Error>;
