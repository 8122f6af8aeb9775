use std::{fs, path::Path};

use anyhow::{Context, Result};
use ibc_client_registry::{
    AnyClientState, AnyConsensusState, AnyHeader, AnyMisbehaviour, ClientRegistry, RegistryConfig,
};
use serde::{de::DeserializeOwned, Serialize};
use solomachine_light_client::{
    client_state::Status,
    consensus_state::ConsensusState,
    misbehaviour::{Misbehaviour, SignatureAndData},
    signer::SoloMachineSigner,
};

/// Client state and consensus state produced by a header update
#[derive(Debug, Serialize)]
pub struct UpdateOutput {
    pub client_state: AnyClientState,
    pub consensus_state: AnyConsensusState,
}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub status: Status,
    pub latest_height: u64,
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&contents)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))
}

pub fn load_registry(config: Option<&Path>) -> Result<ClientRegistry> {
    let config = match config {
        Some(path) => RegistryConfig::from_file(path)
            .with_context(|| format!("Failed to load registry config from {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    tracing::debug!(?config, "registry config loaded");
    Ok(ClientRegistry::new(&config))
}

/// Genesis client state for `signer`, starting at the genesis sequence
pub fn init(
    registry: &ClientRegistry,
    signer: &SoloMachineSigner,
    diversifier: String,
    timestamp: u64,
) -> Result<AnyClientState> {
    let consensus_state = ConsensusState::new(signer.public_key(), diversifier, timestamp);
    let client_state = registry
        .initialize(consensus_state.into())
        .context("Failed to initialize client")?;
    tracing::info!(height = client_state.latest_height(), "client initialized");
    Ok(client_state)
}

/// Pairs two signatures made at `sequence` into evidence
pub fn assemble_misbehaviour(
    sequence: u64,
    signature_one: SignatureAndData,
    signature_two: SignatureAndData,
) -> Result<AnyMisbehaviour> {
    let misbehaviour = Misbehaviour {
        sequence,
        signature_one,
        signature_two,
    };
    misbehaviour
        .validate_basic()
        .context("Signatures do not form valid evidence")?;
    Ok(misbehaviour.into())
}

pub fn check_misbehaviour(
    registry: &ClientRegistry,
    client_state: &AnyClientState,
    misbehaviour: &AnyMisbehaviour,
) -> Result<AnyClientState> {
    if let AnyMisbehaviour::SoloMachine(misbehaviour) = misbehaviour {
        misbehaviour
            .validate_basic()
            .context("Malformed misbehaviour")?;
    }
    let frozen = registry
        .check_misbehaviour_and_update_state(client_state, misbehaviour)
        .context("Misbehaviour rejected")?;
    tracing::warn!(
        client_type = %client_state.client_type(),
        height = frozen.latest_height(),
        "misbehaviour verified, client frozen"
    );
    Ok(frozen)
}

pub fn update(
    registry: &ClientRegistry,
    client_state: &AnyClientState,
    header: &AnyHeader,
) -> Result<UpdateOutput> {
    if let AnyHeader::SoloMachine(header) = header {
        header.validate_basic().context("Malformed header")?;
    }
    let (client_state, consensus_state) = registry
        .check_header_and_update_state(client_state, header)
        .context("Header rejected")?;
    tracing::info!(height = client_state.latest_height(), "client updated");
    Ok(UpdateOutput {
        client_state,
        consensus_state,
    })
}

pub fn status(
    registry: &ClientRegistry,
    client_state: &AnyClientState,
    host_timestamp: u64,
) -> Result<StatusOutput> {
    let status = registry
        .status(client_state, host_timestamp)
        .context("Failed to compute client status")?;
    Ok(StatusOutput {
        status,
        latest_height: registry.latest_height(client_state),
    })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{json}");
    Ok(())
}
