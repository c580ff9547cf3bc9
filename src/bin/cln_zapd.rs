//! cln-zapd daemon entry point.

use clap::Parser;
use cln_zapd::{CheckpointFile, ClnCli, Error, KeyPair, PrivateKey, StepOutcome, Zapper};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Nostr zap receipt daemon for Core Lightning.
#[derive(Parser, Debug)]
#[command(name = "cln-zapd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the lightning-cli binary.
    #[arg(long, default_value = "lightning-cli")]
    lightning_cli: PathBuf,

    /// Lightning directory passed through to lightning-cli.
    #[arg(long)]
    lightning_dir: Option<PathBuf>,

    /// File holding the nostr secret key (hex or nsec). Falls back to the
    /// NOSTR_SECRET_KEY environment variable when absent.
    #[arg(long)]
    nostr_key_file: Option<PathBuf>,

    /// File the last-processed payment index is persisted in.
    #[arg(long, default_value = "cln-zapd.checkpoint")]
    checkpoint_file: PathBuf,

    /// Per-relay acknowledgment timeout in milliseconds.
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Process a single invoice by label and exit instead of running the loop.
    #[arg(long)]
    label: Option<String>,

    /// Log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

fn load_keypair(cli: &Cli) -> Result<KeyPair, Error> {
    let raw = match &cli.nostr_key_file {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::env::var("NOSTR_SECRET_KEY").map_err(|_| {
            error!("no secret key: pass --nostr-key-file or set NOSTR_SECRET_KEY");
            Error::InvalidPrivateKey
        })?,
    };
    let privkey = PrivateKey::try_from_str(raw.trim())?;
    Ok(KeyPair::from_private_key(privkey))
}

async fn run(cli: Cli) -> Result<(), Error> {
    let keypair = load_keypair(&cli)?;
    info!(
        "zapping as {}",
        keypair.pubkey.try_as_bech32_string()?
    );

    let node = ClnCli::new(cli.lightning_cli.clone(), cli.lightning_dir.clone());
    let zapper = Zapper::new(
        keypair,
        node,
        CheckpointFile::new(cli.checkpoint_file.clone()),
        Duration::from_millis(cli.timeout_ms),
    );

    if let Some(label) = &cli.label {
        match zapper.process_label(label).await? {
            StepOutcome::Published { receipt, outcomes } => {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
                for outcome in &outcomes {
                    println!(
                        "{}: {}",
                        outcome.url.as_str(),
                        if outcome.ok { "ok" } else { outcome.message.as_str() }
                    );
                }
            }
            StepOutcome::Skipped => info!("nothing published for label {}", label),
        }
        return Ok(());
    }

    tokio::select! {
        result = zapper.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, shutting down");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("cln-zapd v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(()) => {}
        Err(Error::EmptyPaymentFeed) => {
            error!("payment feed handed back an unusable invoice");
            std::process::exit(2);
        }
        Err(e) => {
            error!("fatal: {}", e);
            std::process::exit(1);
        }
    }
}
