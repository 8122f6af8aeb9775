use std::{
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ibc_client_registry::{AnyClientState, AnyHeader, AnyMisbehaviour};
use solomachine_light_client::crypto::{KeyScheme, PublicKey};

mod commands;
mod key;

use key::read_signer;

#[derive(Parser, Debug)]
#[command(author, version, about = "Solo machine operator CLI", long_about = None)]
struct Cli {
    /// Log level written to stderr
    #[arg(long, global = true, default_value = "info")]
    log_level: Level,

    /// Registry config TOML, defaults allow every client type
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct KeyArgs {
    /// File holding the hex encoded secret key
    #[arg(long)]
    key: PathBuf,
    /// `secp256k1` or `ed25519`
    #[arg(long, default_value = "secp256k1")]
    scheme: KeyScheme,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Prints the public key of a secret key
    Pubkey {
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Prints the genesis client state of a solo machine
    Init {
        #[command(flatten)]
        key: KeyArgs,
        #[arg(long)]
        diversifier: String,
        #[arg(long)]
        timestamp: u64,
    },
    /// Signs `data` at `sequence`, producing one half of a misbehaviour
    Sign {
        #[command(flatten)]
        key: KeyArgs,
        #[arg(long)]
        sequence: u64,
        /// Payload, taken as UTF-8 unless `--hex` is set
        #[arg(long)]
        data: String,
        #[arg(long = "hex")]
        data_is_hex: bool,
    },
    /// Signs a header rotating the client to a new key and diversifier
    SignHeader {
        #[command(flatten)]
        key: KeyArgs,
        #[arg(long)]
        sequence: u64,
        #[arg(long)]
        timestamp: u64,
        /// Diversifier currently stored on the client
        #[arg(long)]
        diversifier: String,
        #[arg(long)]
        new_diversifier: String,
        /// JSON file holding the new public key, defaults to the signing key
        #[arg(long)]
        new_public_key: Option<PathBuf>,
    },
    /// Pairs two signed halves into misbehaviour
    Misbehaviour {
        #[arg(long)]
        sequence: u64,
        #[arg(long)]
        signature_one: PathBuf,
        #[arg(long)]
        signature_two: PathBuf,
    },
    /// Checks misbehaviour against a client state and prints the frozen state
    CheckMisbehaviour {
        #[arg(long)]
        client_state: PathBuf,
        #[arg(long)]
        misbehaviour: PathBuf,
    },
    /// Applies a header to a client state
    Update {
        #[arg(long)]
        client_state: PathBuf,
        #[arg(long)]
        header: PathBuf,
    },
    /// Prints the status of a client state
    Status {
        #[arg(long)]
        client_state: PathBuf,
        /// Host time in unix seconds, defaults to now
        #[arg(long)]
        host_timestamp: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let registry = commands::load_registry(cli.config.as_deref())?;

    match cli.command {
        Commands::Pubkey { key } => {
            let signer = read_signer(&key.key, key.scheme)?;
            commands::print_json(&signer.public_key())?;
        }
        Commands::Init {
            key,
            diversifier,
            timestamp,
        } => {
            let signer = read_signer(&key.key, key.scheme)?;
            let client_state = commands::init(&registry, &signer, diversifier, timestamp)?;
            commands::print_json(&client_state)?;
        }
        Commands::Sign {
            key,
            sequence,
            data,
            data_is_hex,
        } => {
            let signer = read_signer(&key.key, key.scheme)?;
            let data = if data_is_hex {
                hex::decode(data.trim_start_matches("0x")).context("Data is not hex encoded")?
            } else {
                data.into_bytes()
            };
            tracing::info!(sequence, "signing payload");
            commands::print_json(&signer.sign_at_sequence(sequence, &data))?;
        }
        Commands::SignHeader {
            key,
            sequence,
            timestamp,
            diversifier,
            new_diversifier,
            new_public_key,
        } => {
            let signer = read_signer(&key.key, key.scheme)?;
            let new_public_key = match new_public_key {
                Some(path) => commands::read_json::<PublicKey>(&path)?,
                None => signer.public_key(),
            };
            let header =
                signer.sign_header(sequence, timestamp, &diversifier, new_public_key, new_diversifier);
            commands::print_json(&AnyHeader::from(header))?;
        }
        Commands::Misbehaviour {
            sequence,
            signature_one,
            signature_two,
        } => {
            let misbehaviour = commands::assemble_misbehaviour(
                sequence,
                commands::read_json(&signature_one)?,
                commands::read_json(&signature_two)?,
            )?;
            commands::print_json(&misbehaviour)?;
        }
        Commands::CheckMisbehaviour {
            client_state,
            misbehaviour,
        } => {
            let client_state: AnyClientState = commands::read_json(&client_state)?;
            let misbehaviour: AnyMisbehaviour = commands::read_json(&misbehaviour)?;
            let frozen = commands::check_misbehaviour(&registry, &client_state, &misbehaviour)?;
            commands::print_json(&frozen)?;
        }
        Commands::Update {
            client_state,
            header,
        } => {
            let client_state: AnyClientState = commands::read_json(&client_state)?;
            let header: AnyHeader = commands::read_json(&header)?;
            commands::print_json(&commands::update(&registry, &client_state, &header)?)?;
        }
        Commands::Status {
            client_state,
            host_timestamp,
        } => {
            let client_state: AnyClientState = commands::read_json(&client_state)?;
            let host_timestamp = match host_timestamp {
                Some(ts) => ts,
                None => SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
            };
            commands::print_json(&commands::status(&registry, &client_state, host_timestamp)?)?;
        }
    }

    Ok(())
}
