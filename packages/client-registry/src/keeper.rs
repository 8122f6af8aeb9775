//! Client keeper: stores clients and applies messages to them

use std::collections::BTreeMap;

use solomachine_light_client::{client_state::Status, error::SoloMachineError};

use crate::{
    any::{AnyClientState, AnyConsensusState, AnyHeader, AnyMisbehaviour},
    client_type::ClientType,
    error::ClientError,
    registry::ClientRegistry,
};

/// Storage backing a [`ClientKeeper`]
pub trait ClientStore {
    /// Client state stored under `client_id`
    fn client_state(&self, client_id: &str) -> Option<AnyClientState>;

    /// Stores the client state of `client_id`
    fn set_client_state(&mut self, client_id: &str, client_state: AnyClientState);

    /// Consensus state of `client_id` at `height`
    fn consensus_state(&self, client_id: &str, height: u64) -> Option<AnyConsensusState>;

    /// Stores the consensus state of `client_id` at `height`
    fn set_consensus_state(
        &mut self,
        client_id: &str,
        height: u64,
        consensus_state: AnyConsensusState,
    );

    /// Sequence the next client identifier is built from
    fn next_client_sequence(&self) -> u64;

    /// Advances the client identifier sequence
    fn increment_client_sequence(&mut self);
}

/// In-memory [`ClientStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryClientStore {
    client_states: BTreeMap<String, AnyClientState>,
    consensus_states: BTreeMap<(String, u64), AnyConsensusState>,
    next_client_sequence: u64,
}

impl ClientStore for MemoryClientStore {
    fn client_state(&self, client_id: &str) -> Option<AnyClientState> {
        self.client_states.get(client_id).cloned()
    }

    fn set_client_state(&mut self, client_id: &str, client_state: AnyClientState) {
        self.client_states
            .insert(client_id.to_string(), client_state);
    }

    fn consensus_state(&self, client_id: &str, height: u64) -> Option<AnyConsensusState> {
        self.consensus_states
            .get(&(client_id.to_string(), height))
            .cloned()
    }

    fn set_consensus_state(
        &mut self,
        client_id: &str,
        height: u64,
        consensus_state: AnyConsensusState,
    ) {
        self.consensus_states
            .insert((client_id.to_string(), height), consensus_state);
    }

    fn next_client_sequence(&self) -> u64 {
        self.next_client_sequence
    }

    fn increment_client_sequence(&mut self) {
        self.next_client_sequence += 1;
    }
}

/// Host side of the light clients: creates them, feeds them headers,
/// misbehaviour and proofs, and persists the resulting states.
///
/// Mutating operations take `&mut self`, so operations on a client are
/// serialized by the borrow checker. Share a keeper across threads behind a
/// `Mutex`.
#[derive(Debug)]
pub struct ClientKeeper<S> {
    registry: ClientRegistry,
    store: S,
    host_height: u64,
    host_timestamp: u64,
}

impl<S: ClientStore> ClientKeeper<S> {
    /// Creates a keeper over `store`. The host clock starts at 0.
    #[must_use]
    pub const fn new(registry: ClientRegistry, store: S) -> Self {
        Self {
            registry,
            store,
            host_height: 0,
            host_timestamp: 0,
        }
    }

    /// Registry operations are dispatched through
    #[must_use]
    pub const fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Sets the host block height and timestamp used for client status
    pub fn set_block_time(&mut self, height: u64, timestamp: u64) {
        tracing::debug!(height, timestamp, "host block time advanced");
        self.host_height = height;
        self.host_timestamp = timestamp;
    }

    /// Host block height and timestamp
    #[must_use]
    pub const fn block_time(&self) -> (u64, u64) {
        (self.host_height, self.host_timestamp)
    }

    /// Initializes a client from `consensus_state` and stores it under a
    /// fresh `{client_type}-{n}` identifier
    /// # Errors
    /// Returns an error if the client type is not allowed or the consensus
    /// state is malformed
    pub fn create_client(
        &mut self,
        consensus_state: AnyConsensusState,
    ) -> Result<String, ClientError> {
        let client_type = consensus_state.client_type();
        let client_state = self.registry.initialize(consensus_state.clone())?;
        let height = client_state.latest_height();

        let client_id = format!("{client_type}-{}", self.store.next_client_sequence());
        self.store.increment_client_sequence();
        self.store.set_client_state(&client_id, client_state);
        self.store
            .set_consensus_state(&client_id, height, consensus_state);

        tracing::info!(%client_id, %client_type, height, "client created");
        Ok(client_id)
    }

    /// Verifies `header` against the client and stores the new states
    /// # Errors
    /// Returns an error if the client is missing or expired, the header is of
    /// another client type, or the header is rejected
    pub fn update_client(
        &mut self,
        client_id: &str,
        header: &AnyHeader,
    ) -> Result<u64, ClientError> {
        if let AnyHeader::SoloMachine(header) = header {
            header.validate_basic().map_err(SoloMachineError::from)?;
        }
        let client_state = self.active_client_state(client_id)?;

        let (client_state, consensus_state) = self
            .registry
            .check_header_and_update_state(&client_state, header)
            .inspect_err(|e| tracing::warn!(%client_id, error = %e, "client update rejected"))?;
        let height = client_state.latest_height();

        self.store.set_client_state(client_id, client_state);
        self.store
            .set_consensus_state(client_id, height, consensus_state);

        tracing::info!(%client_id, client_type = %header.client_type(), height, "client updated");
        Ok(height)
    }

    /// Verifies `misbehaviour` against the client and stores the frozen state
    /// # Errors
    /// Returns an error if the client is missing or expired, the misbehaviour
    /// is of another client type, or the evidence is rejected
    pub fn submit_misbehaviour(
        &mut self,
        client_id: &str,
        misbehaviour: &AnyMisbehaviour,
    ) -> Result<(), ClientError> {
        if let AnyMisbehaviour::SoloMachine(misbehaviour) = misbehaviour {
            misbehaviour
                .validate_basic()
                .map_err(SoloMachineError::from)?;
        }
        let client_state = self.active_client_state(client_id)?;

        let frozen = self
            .registry
            .check_misbehaviour_and_update_state(&client_state, misbehaviour)
            .inspect_err(|e| tracing::debug!(%client_id, error = %e, "misbehaviour rejected"))?;
        self.store.set_client_state(client_id, frozen);

        tracing::warn!(
            %client_id,
            client_type = %misbehaviour.client_type(),
            "client frozen due to misbehaviour"
        );
        Ok(())
    }

    /// Verifies a membership proof against the client and stores the
    /// resulting client state
    /// # Errors
    /// Returns an error if the client is missing or expired or the proof is rejected
    pub fn verify_membership(
        &mut self,
        client_id: &str,
        height: u64,
        proof: &[u8],
        path: &[u8],
        value: &[u8],
    ) -> Result<(), ClientError> {
        let client_state = self.active_client_state(client_id)?;
        let next = self
            .registry
            .verify_membership(&client_state, height, proof, path, value)?;
        self.store.set_client_state(client_id, next);
        tracing::debug!(%client_id, height, "membership verified");
        Ok(())
    }

    /// Verifies a non-membership proof against the client and stores the
    /// resulting client state
    /// # Errors
    /// Returns an error if the client is missing or expired or the proof is rejected
    pub fn verify_non_membership(
        &mut self,
        client_id: &str,
        height: u64,
        proof: &[u8],
        path: &[u8],
    ) -> Result<(), ClientError> {
        let client_state = self.active_client_state(client_id)?;
        let next = self
            .registry
            .verify_non_membership(&client_state, height, proof, path)?;
        self.store.set_client_state(client_id, next);
        tracing::debug!(%client_id, height, "non-membership verified");
        Ok(())
    }

    /// Stored client state of `client_id`
    /// # Errors
    /// Returns an error if the identifier is malformed or no client is stored under it
    pub fn client_state(&self, client_id: &str) -> Result<AnyClientState, ClientError> {
        parse_client_id(client_id)?;
        self.store
            .client_state(client_id)
            .ok_or_else(|| ClientError::ClientNotFound(client_id.to_string()))
    }

    /// Stored consensus state of `client_id` at `height`
    /// # Errors
    /// Returns an error if no consensus state is stored at that height
    pub fn consensus_state(
        &self,
        client_id: &str,
        height: u64,
    ) -> Result<AnyConsensusState, ClientError> {
        parse_client_id(client_id)?;
        self.store
            .consensus_state(client_id, height)
            .ok_or_else(|| ClientError::ConsensusStateNotFound {
                client_id: client_id.to_string(),
                height,
            })
    }

    /// Status of `client_id` at the current host timestamp
    /// # Errors
    /// Returns an error if the client is missing or its type is not allowed
    pub fn client_status(&self, client_id: &str) -> Result<Status, ClientError> {
        let client_state = self.client_state(client_id)?;
        self.registry.status(&client_state, self.host_timestamp)
    }

    /// Loads the client and rejects it if expired. Frozen clients are passed
    /// through so the light client reports them.
    fn active_client_state(&self, client_id: &str) -> Result<AnyClientState, ClientError> {
        let client_state = self.client_state(client_id)?;
        let status = self.registry.status(&client_state, self.host_timestamp)?;
        if status == Status::Expired {
            return Err(ClientError::ClientNotActive {
                client_id: client_id.to_string(),
                status,
            });
        }
        Ok(client_state)
    }
}

/// Splits a `{client_type}-{n}` identifier
/// # Errors
/// Returns [`ClientError::InvalidClientId`] if the identifier is malformed
pub fn parse_client_id(client_id: &str) -> Result<(ClientType, u64), ClientError> {
    let invalid = || ClientError::InvalidClientId(client_id.to_string());
    let (tag, sequence) = client_id.rsplit_once('-').ok_or_else(invalid)?;
    let client_type = tag.parse().map_err(|_| invalid())?;
    let sequence = sequence.parse().map_err(|_| invalid())?;
    Ok((client_type, sequence))
}
