//! Key derivation and management
//!
//! This module turns a BIP-39 seed and a hardened derivation path into an
//! ED25519 key pair using SLIP-0010.

pub mod solana;
mod derivation;

pub use derivation::*;

use crate::crypto::mnemonic::Seed;
use crate::error::Result;

/// Derive a key pair from a seed at the given path
///
/// Pure and deterministic: the same seed and path always give the same keys.
pub fn derive_keypair(seed: &Seed, path: &DerivationPath) -> Result<KeyPair> {
    solana::derive_solana_key_pair(seed, path)
}

/// Parse `path` and derive the key pair it names
pub fn derive_keypair_at(seed: &Seed, path: &str) -> Result<KeyPair> {
    let path: DerivationPath = path.parse()?;
    derive_keypair(seed, &path)
}
