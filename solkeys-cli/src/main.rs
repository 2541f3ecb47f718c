//! solkeys CLI
//!
//! Command-line front end for generating a Solana mnemonic and deriving
//! wallets from it. All state lives in a local JSON store.

mod config;
mod output;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Password};
use tracing::{debug, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solkeys::{
    Error as WalletError, FileStore, KeyValueStore, MnemonicStrength, WalletConfig, WalletSession,
};

use crate::config::CliConfig;
use crate::output::{render_wallet, WalletView};

/// Attempts allowed when the phrase is typed at the prompt
const IMPORT_ATTEMPTS: usize = 3;

#[derive(Parser)]
#[command(name = "solkeys")]
#[command(about = "Generate and manage Solana HD wallets from a BIP-39 mnemonic")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Wallet store file (defaults to ~/.solkeys/wallet.json)
    #[arg(short, long, global = true, env = "SOLKEYS_STORE")]
    store: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new secret recovery phrase and its first wallet
    Generate {
        /// Phrase length: 12 or 24 words
        #[arg(long, value_parser = parse_word_count)]
        words: Option<MnemonicStrength>,
    },
    /// Import an existing secret recovery phrase (prompted for if omitted)
    Import {
        /// The phrase words
        phrase: Vec<String>,
    },
    /// Derive the next wallet from the active phrase
    Add,
    /// Remove a wallet by public key
    Remove { public_key: String },
    /// Remove every wallet and forget the phrase (irreversible)
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List wallets
    List {
        /// Show full keys instead of masked ones
        #[arg(long)]
        reveal: bool,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the active secret recovery phrase
    Phrase,
    /// Derive wallets until the first N account indices have been issued
    Restore {
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
}

fn parse_word_count(value: &str) -> Result<MnemonicStrength, String> {
    value
        .parse::<usize>()
        .ok()
        .and_then(MnemonicStrength::from_word_count)
        .ok_or_else(|| format!("unsupported word count {:?}; use 12 or 24", value))
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = CliConfig::resolve(cli.store);
    debug!(store = %config.store_path.display(), "Using wallet store");

    let mut wallet_config = WalletConfig::default();
    if let Commands::Generate { words: Some(strength) } = &cli.command {
        wallet_config = wallet_config.with_mnemonic_strength(*strength);
    }

    let store = FileStore::open(&config.store_path)
        .with_context(|| format!("opening wallet store {}", config.store_path.display()))?;
    let mut session = WalletSession::open(store, wallet_config).context("loading wallet session")?;

    let stdout = io::stdout();
    run(&mut session, cli.command, &mut stdout.lock())
}

fn run<S: KeyValueStore>(
    session: &mut WalletSession<S>,
    command: Commands,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Generate { .. } => {
            let onboarding = session.generate_or_import(None).map_err(onboarding_error)?;
            writeln!(out, "Secret recovery phrase (keep it safe):")?;
            writeln!(out, "{}", onboarding.mnemonic)?;
            writeln!(out)?;
            writeln!(out, "{}", render_wallet(&WalletView::new(1, &onboarding.first_wallet, false)))?;
        }
        Commands::Import { phrase } => {
            let onboarding = if phrase.is_empty() {
                import_interactively(session)?
            } else {
                session
                    .generate_or_import(Some(&phrase.join(" ")))
                    .map_err(onboarding_error)?
            };
            writeln!(out, "Phrase imported.")?;
            writeln!(out, "{}", render_wallet(&WalletView::new(1, &onboarding.first_wallet, false)))?;
        }
        Commands::Add => {
            let record = session.add_wallet().context("adding wallet")?;
            let number = session.list_wallets().len();
            writeln!(out, "{}", render_wallet(&WalletView::new(number, &record, false)))?;
        }
        Commands::Remove { public_key } => match session.remove_wallet(&public_key)? {
            Some(record) => writeln!(out, "Removed wallet {} ({})", record.public_key, record.path)?,
            None => bail!("no wallet with public key {}", public_key),
        },
        Commands::Clear { yes } => {
            if !yes && !confirm_clear()? {
                writeln!(out, "Aborted.")?;
                return Ok(());
            }
            session.clear_all().context("clearing wallets")?;
            writeln!(out, "All wallets and the recovery phrase were removed.")?;
        }
        Commands::List { reveal, json } => {
            let views: Vec<WalletView<'_>> = session
                .list_wallets()
                .iter()
                .enumerate()
                .map(|(i, record)| WalletView::new(i + 1, record, reveal))
                .collect();

            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&views)?)?;
            } else if views.is_empty() {
                writeln!(out, "No wallets.")?;
            } else {
                for view in &views {
                    writeln!(out, "{}", render_wallet(view))?;
                }
            }
        }
        Commands::Phrase => match session.mnemonic() {
            Some(mnemonic) => writeln!(out, "{}", mnemonic)?,
            None => bail!("no active recovery phrase; run `solkeys generate` or `solkeys import`"),
        },
        Commands::Restore { count } => {
            let restored = session.restore_wallets(count).context("restoring wallets")?;
            writeln!(out, "Restored {} wallet(s).", restored.len())?;
        }
    }

    Ok(())
}

fn onboarding_error(err: WalletError) -> anyhow::Error {
    match err {
        WalletError::MnemonicAlreadySet => {
            anyhow::anyhow!("a recovery phrase is already active; run `solkeys clear` first")
        }
        other => other.into(),
    }
}

fn import_interactively<S: KeyValueStore>(
    session: &mut WalletSession<S>,
) -> anyhow::Result<solkeys::Onboarding> {
    for attempt in 1..=IMPORT_ATTEMPTS {
        let phrase = Password::new()
            .with_prompt("Secret recovery phrase")
            .interact()?;

        match session.generate_or_import(Some(&phrase)) {
            Ok(onboarding) => return Ok(onboarding),
            Err(WalletError::InvalidMnemonic(reason)) => {
                warn!(attempt, "Rejected recovery phrase");
                eprintln!("Invalid recovery phrase: {}", reason);
            }
            Err(other) => return Err(onboarding_error(other)),
        }
    }

    bail!("no valid recovery phrase after {} attempts", IMPORT_ATTEMPTS)
}

fn confirm_clear() -> anyhow::Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Remove every wallet and the recovery phrase? This cannot be undone")
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solkeys::MemoryStore;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn session() -> WalletSession<MemoryStore> {
        WalletSession::open(MemoryStore::new(), WalletConfig::solana()).unwrap()
    }

    fn run_to_string(session: &mut WalletSession<MemoryStore>, command: Commands) -> String {
        let mut out = Vec::new();
        run(session, command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_import_add_list() {
        let mut session = session();
        let phrase = ABANDON.split(' ').map(String::from).collect();

        let text = run_to_string(&mut session, Commands::Import { phrase });
        assert!(text.contains("HAgk14...3DKpqk"));

        run_to_string(&mut session, Commands::Add);
        let listing = run_to_string(&mut session, Commands::List { reveal: false, json: false });
        assert!(listing.contains("Wallet 2"));
        assert!(listing.contains("m/44'/501'/1'/0'"));

        let json = run_to_string(&mut session, Commands::List { reveal: true, json: true });
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["public_key"], "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk");
    }

    #[test]
    fn test_clear_with_yes_skips_prompt() {
        let mut session = session();
        run_to_string(&mut session, Commands::Generate { words: None });
        run_to_string(&mut session, Commands::Clear { yes: true });

        assert!(session.mnemonic().is_none());
        assert!(session.list_wallets().is_empty());
    }

    #[test]
    fn test_generate_twice_is_an_error() {
        let mut session = session();
        run_to_string(&mut session, Commands::Generate { words: None });

        let mut out = Vec::new();
        let err = run(&mut session, Commands::Generate { words: None }, &mut out).unwrap_err();
        assert!(err.to_string().contains("solkeys clear"));
    }

    #[test]
    fn test_remove_unknown_key_fails() {
        let mut session = session();
        let mut out = Vec::new();
        assert!(run(
            &mut session,
            Commands::Remove { public_key: "nope".to_string() },
            &mut out
        )
        .is_err());
    }

    #[test]
    fn test_parse_word_count() {
        assert_eq!(parse_word_count("24"), Ok(MnemonicStrength::Words24));
        assert!(parse_word_count("13").is_err());
    }

    #[test]
    fn test_store_flag_parses() {
        let cli = Cli::try_parse_from(["solkeys", "list", "--store", "/tmp/w.json"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/w.json")));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
