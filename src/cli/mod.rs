//! Command-line interface for a file-backed keystore
//!
//! - `init`: create an empty keystore buffer
//! - `list`: decode and print every record
//! - `add` / `remove`: mutate the keystore (whole buffer rewritten)
//! - `dump`: print the raw stored buffer as hex
//! - `algorithms`: list the registered algorithms

use crate::algorithm::{registry, Algorithm, AlgorithmSpec};
use crate::errors::{KeyringError, Result};
use crate::keystore::{Keyring, KeystoreStorage};
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use zeroize::Zeroizing;

/// Keystore subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an empty keystore
    Init,

    /// List keystore entries
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Append a key to the keystore
    Add(KeyArgs),

    /// Remove every entry matching the given key and configuration
    Remove(KeyArgs),

    /// Print the raw keystore buffer as hex
    Dump,

    /// List the registered algorithms and their discriminators
    Algorithms,
}

/// A key record given on the command line
#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Algorithm name (see `keyring algorithms`)
    pub algorithm: String,

    /// Key bytes as hex
    #[arg(long)]
    pub key: String,

    /// Configuration value as NAME=HEX (repeatable)
    #[arg(long = "field", value_name = "NAME=HEX", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// One record as shown by `list`
#[derive(Debug, Serialize)]
pub struct KeyRecord {
    pub index: usize,
    pub algorithm: &'static str,
    pub discriminator: String,
    pub key: String,
    pub configurations: BTreeMap<String, String>,
}

impl KeyRecord {
    pub fn new(index: usize, entry: &Algorithm) -> Self {
        let spec = registry().lookup(&entry.discriminator()).ok();
        let configurations = entry
            .to_entry()
            .config
            .entries()
            .iter()
            .map(|config| {
                let name = spec
                    .and_then(|spec| {
                        spec.configurations
                            .iter()
                            .find(|field| field.discriminator == config.key)
                    })
                    .map(|field| field.name.to_string())
                    .unwrap_or_else(|| config.key.to_hex());
                (name, hex::encode(&config.value))
            })
            .collect();

        Self {
            index,
            algorithm: entry.name(),
            discriminator: entry.discriminator().to_hex(),
            key: hex::encode(entry.key_bytes()),
            configurations,
        }
    }
}

fn parse_field(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=HEX, got {}", s))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn decode_hex(s: &str) -> Result<Zeroizing<Vec<u8>>> {
    Ok(Zeroizing::new(hex::decode(s.trim_start_matches("0x"))?))
}

impl KeyArgs {
    /// Build and validate the record these arguments describe
    pub fn to_algorithm(&self) -> Result<Algorithm> {
        let spec = registry().by_name(&self.algorithm)?;
        let key = decode_hex(&self.key)?;

        let mut values = Vec::with_capacity(self.fields.len());
        for (name, value) in &self.fields {
            values.push((name.as_str(), decode_hex(value)?));
        }
        let fields: Vec<(&str, &[u8])> = values
            .iter()
            .map(|(name, value)| (*name, value.as_slice()))
            .collect();

        let entry = spec.build_entry(&key, &fields)?;
        registry().decode(&entry)
    }
}

/// Run one subcommand against a keyring, writing output to `out`
pub fn execute<S, W>(command: &Command, keyring: &Keyring<S>, out: &mut W) -> Result<()>
where
    S: KeystoreStorage,
    W: Write,
{
    match command {
        Command::Init => {
            keyring.create()?;
            writeln!(out, "Created empty keystore")?;
        }
        Command::List { format } => {
            let keystore = keyring.load()?;
            let records: Vec<KeyRecord> = keystore
                .iter()
                .enumerate()
                .map(|(i, entry)| KeyRecord::new(i, entry))
                .collect();
            match format {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &records)?;
                    writeln!(out)?;
                }
                OutputFormat::Text => write_records(out, &records)?,
            }
        }
        Command::Add(args) => {
            let entry = args.to_algorithm()?;
            let keystore = keyring.add_entry(entry)?;
            writeln!(out, "Added {} key ({} entries)", args.algorithm, keystore.len())?;
        }
        Command::Remove(args) => {
            let entry = args.to_algorithm()?;
            let keystore = keyring.remove_entry(&entry)?;
            writeln!(out, "Removed {} key ({} entries left)", args.algorithm, keystore.len())?;
        }
        Command::Dump => {
            let data = keyring.load_raw()?;
            writeln!(out, "{}", hex::encode(data.expose()))?;
        }
        Command::Algorithms => {
            for spec in registry().iter() {
                write_spec(out, spec)?;
            }
        }
    }
    Ok(())
}

fn write_records<W: Write>(out: &mut W, records: &[KeyRecord]) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "Keystore is empty")?;
        return Ok(());
    }
    for record in records {
        writeln!(out, "[{}] {} {}", record.index, record.algorithm, record.key)?;
        for (name, value) in &record.configurations {
            writeln!(out, "    {} = {}", name, value)?;
        }
    }
    Ok(())
}

fn write_spec<W: Write>(out: &mut W, spec: &AlgorithmSpec) -> Result<()> {
    writeln!(
        out,
        "{:<18} {}  key: {} bytes",
        spec.name, spec.discriminator, spec.key_length
    )?;
    for field in spec.configurations {
        writeln!(
            out,
            "    {:<14} {}  {} bytes",
            field.name, field.discriminator, field.length
        )?;
    }
    Ok(())
}

/// Exit code for a failed command
pub fn exit_code(err: &KeyringError) -> u8 {
    match err {
        KeyringError::ConfigError(_) => 78,
        e if e.is_format_error() => 65,
        KeyringError::StorageError(_) => 74,
        _ => 1,
    }
}
