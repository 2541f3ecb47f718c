//! Solana key derivation (SLIP-0010 over ED25519)

use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

use super::derivation::{DerivationPath, KeyPair};
use crate::crypto::mnemonic::Seed;
use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// HMAC key for the ED25519 master node
const ED25519_CURVE_KEY: &[u8] = b"ed25519 seed";

/// Secret key and chain code of one node in the derivation tree
struct ExtendedKey {
    secret_key: Zeroizing<[u8; 32]>,
    chain_code: Zeroizing<[u8; 32]>,
}

impl ExtendedKey {
    fn from_hmac_output(output: &[u8]) -> Self {
        let mut secret_key = Zeroizing::new([0u8; 32]);
        let mut chain_code = Zeroizing::new([0u8; 32]);

        secret_key.copy_from_slice(&output[0..32]);
        chain_code.copy_from_slice(&output[32..64]);

        Self {
            secret_key,
            chain_code,
        }
    }
}

/// Derive a Solana key pair from a seed and derivation path
pub fn derive_solana_key_pair(seed: &Seed, path: &DerivationPath) -> Result<KeyPair> {
    let mut node = derive_master_key(seed.as_bytes())?;

    for index in path.hardened_indices() {
        node = derive_child_key(&node, index)?;
    }

    let signing_key = SigningKey::from_bytes(&node.secret_key);
    Ok(KeyPair::from_keypair_bytes(signing_key.to_keypair_bytes()))
}

/// Derive the master key from a seed
fn derive_master_key(seed: &[u8]) -> Result<ExtendedKey> {
    let mut hmac = HmacSha512::new_from_slice(ED25519_CURVE_KEY)
        .map_err(|_| Error::Derivation("HMAC error".to_string()))?;

    hmac.update(seed);
    let result = hmac.finalize().into_bytes();

    Ok(ExtendedKey::from_hmac_output(&result))
}

/// Derive a hardened child key from a parent key
fn derive_child_key(parent: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
    let mut hmac = HmacSha512::new_from_slice(&parent.chain_code[..])
        .map_err(|_| Error::Derivation("HMAC error".to_string()))?;

    // 0x00 || k_par || ser32(i)
    hmac.update(&[0u8]);
    hmac.update(&parent.secret_key[..]);
    hmac.update(&index.to_be_bytes());
    let result = hmac.finalize().into_bytes();

    Ok(ExtendedKey::from_hmac_output(&result))
}
