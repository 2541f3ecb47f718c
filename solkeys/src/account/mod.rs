//! Account management functionality
//!
//! This module provides the wallet records derived from a mnemonic and the
//! ledger that orders them and hands out account indices.

mod ledger;
mod wallet;

pub use ledger::*;
pub use wallet::*;
