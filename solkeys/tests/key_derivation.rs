//! Tests for key derivation

use solkeys::crypto::keys::*;
use solkeys::crypto::mnemonic::*;
use solkeys::Error;

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[test]
fn test_abandon_seed_vector() {
    let mnemonic = validate_mnemonic(ABANDON).unwrap();
    let seed = seed_from_mnemonic(&mnemonic);

    assert_eq!(
        hex::encode(seed.as_bytes()),
        "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
         9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
    );
}

#[test]
fn test_abandon_solana_keypair_vector() {
    let mnemonic = validate_mnemonic(ABANDON).unwrap();
    let seed = seed_from_mnemonic(&mnemonic);

    let key_pair = derive_keypair_at(&seed, "m/44'/501'/0'/0'").unwrap();
    assert_eq!(key_pair.public_key_id(), "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk");

    let secret = bs58::decode(key_pair.private_key_base58()).into_vec().unwrap();
    assert_eq!(secret.len(), 64);
    assert_eq!(&secret[32..], key_pair.public_bytes());
}

#[test]
fn test_derivation_is_deterministic() {
    let seed = mnemonic_to_seed(ABANDON, None).unwrap();
    let path = DerivationPath::solana_account(SOLANA_COIN_TYPE, 5).unwrap();

    let a = derive_keypair(&seed, &path).unwrap();
    let b = derive_keypair(&seed, &path).unwrap();
    assert_eq!(a.secret_bytes(), b.secret_bytes());
    assert_eq!(a.public_key_id(), b.public_key_id());
}

#[test]
fn test_distinct_accounts_give_distinct_keys() {
    let seed = mnemonic_to_seed(ABANDON, None).unwrap();

    let mut seen = std::collections::HashSet::new();
    for account in 0..16 {
        let path = DerivationPath::solana_account(SOLANA_COIN_TYPE, account).unwrap();
        let key_pair = derive_keypair(&seed, &path).unwrap();
        assert!(seen.insert(key_pair.public_key_id()), "duplicate key at account {}", account);
    }
}

#[test]
fn test_fresh_mnemonic_derives_at_index_zero() {
    let mnemonic = generate_mnemonic(MnemonicStrength::default()).unwrap();
    let seed = seed_from_mnemonic(&mnemonic);
    let path = DerivationPath::solana_account(SOLANA_COIN_TYPE, 0).unwrap();

    let key_pair = derive_keypair(&seed, &path).unwrap();
    assert_eq!(key_pair.public_bytes().len(), 32);
    assert_eq!(bs58::decode(key_pair.public_key_id()).into_vec().unwrap().len(), 32);
}

#[test]
fn test_malformed_paths_fail() {
    let seed = mnemonic_to_seed(ABANDON, None).unwrap();

    for bad in ["", "m", "m/44'/501'/x'/0'", "m/44'/501'/0'/0", "m/44'/501'/2147483648'/0'"] {
        assert!(
            matches!(derive_keypair_at(&seed, bad), Err(Error::Derivation(_))),
            "path {:?} should be rejected",
            bad
        );
    }
}
