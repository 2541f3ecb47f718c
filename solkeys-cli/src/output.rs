//! Terminal rendering of wallets

use serde::Serialize;
use solkeys::WalletRecord;

/// Characters kept at each end of a masked key
const MASK_KEEP: usize = 6;

/// Shorten a key to `abcdef...uvwxyz`
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= MASK_KEEP * 2 {
        return key.to_string();
    }

    let head: String = chars[..MASK_KEEP].iter().collect();
    let tail: String = chars[chars.len() - MASK_KEEP..].iter().collect();
    format!("{}...{}", head, tail)
}

/// One wallet as shown by `list`
#[derive(Debug, Serialize)]
pub struct WalletView<'a> {
    pub number: usize,
    pub path: &'a str,
    pub public_key: String,
    pub private_key: String,
}

impl<'a> WalletView<'a> {
    pub fn new(number: usize, record: &'a WalletRecord, reveal: bool) -> Self {
        let (public_key, private_key) = if reveal {
            (record.public_key.clone(), record.private_key.clone())
        } else {
            (mask_key(&record.public_key), mask_key(&record.private_key))
        };

        Self {
            number,
            path: &record.path,
            public_key,
            private_key,
        }
    }
}

/// Render a wallet as a short text block
pub fn render_wallet(view: &WalletView<'_>) -> String {
    format!(
        "Wallet {}\n  path:        {}\n  public key:  {}\n  private key: {}",
        view.number, view.path, view.public_key, view.private_key
    )
}
