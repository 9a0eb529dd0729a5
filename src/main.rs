//! keyring - manage a TLV-encoded keystore buffer
//!
//! ```bash
//! keyring init
//! keyring add chacha20poly1305 --key <hex> --field nonce=<hex> --field aad=<hex>
//! keyring --config /etc/keyring/keyring.toml list
//! ```

use clap::Parser;
use keyring::cli::{self, Command};
use keyring::config::{Config, LoggingConfig};
use keyring::{FileStorage, Keyring, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "keyring", version, about = "Manage a TLV-encoded keystore buffer")]
struct Cli {
    /// Path to a configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Keystore file, overriding the configured path
    #[arg(long, global = true)]
    keystore: Option<PathBuf>,

    /// Log level, overriding the configured level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(cli::exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.keystore {
        config.storage.keystore_path = path;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    init_logging(&config.logging);

    let storage = FileStorage::new(&config.storage.keystore_path)?;
    debug!("keyring v{} using {:?}", VERSION, storage.path());
    let keyring = Keyring::new(storage);
    let stdout = std::io::stdout();
    cli::execute(&cli.command, &keyring, &mut stdout.lock())
}

/// Initialize logging
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(logging: &LoggingConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.to_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
