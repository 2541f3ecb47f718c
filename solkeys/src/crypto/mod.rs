//! Cryptographic primitives and operations
//!
//! This module provides functionality for mnemonic generation, seed expansion
//! and ED25519 key derivation.

pub mod mnemonic;
pub mod keys;

pub use mnemonic::*;
pub use keys::*;
