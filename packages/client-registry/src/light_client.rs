//! Capability set every client type implements

use solomachine_light_client::{
    client_state::{ClientState as SoloMachineClientState, Status},
    consensus_state::ConsensusState as SoloMachineConsensusState,
    error::SoloMachineError,
    header::Header as SoloMachineHeader,
    membership,
    misbehaviour::{self, Misbehaviour as SoloMachineMisbehaviour},
    update,
};

use crate::{
    client_type::ClientType,
    error::ClientError,
    mock::{MockClientError, MockClientState, MockConsensusState, MockHeader, MockMisbehaviour},
};

/// Lifecycle and verification operations of one client type.
///
/// Every operation takes the current state by reference and returns the next
/// one; a failed operation leaves nothing changed.
pub trait LightClient {
    /// Client state type
    type ClientState;
    /// Consensus state type
    type ConsensusState;
    /// Header type
    type Header;
    /// Misbehaviour type
    type Misbehaviour;
    /// Error type
    type Error: Into<ClientError>;

    /// Type tag of the client
    const CLIENT_TYPE: ClientType;

    /// Creates the starting client state from a genesis consensus state
    /// # Errors
    /// Returns an error if the consensus state is malformed
    fn initialize(
        &self,
        consensus_state: Self::ConsensusState,
    ) -> Result<Self::ClientState, Self::Error>;

    /// Status of the client given the host clock
    fn status(&self, client_state: &Self::ClientState, host_timestamp: u64) -> Status;

    /// Latest height of the client
    fn latest_height(&self, client_state: &Self::ClientState) -> u64;

    /// Verifies `header` and returns the next client state along with the
    /// consensus state to store at its height
    /// # Errors
    /// Returns an error if the header is rejected
    fn check_header_and_update_state(
        &self,
        client_state: &Self::ClientState,
        header: &Self::Header,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Self::Error>;

    /// Verifies `misbehaviour` and returns the frozen client state
    /// # Errors
    /// Returns an error if the evidence is rejected
    fn check_misbehaviour_and_update_state(
        &self,
        client_state: &Self::ClientState,
        misbehaviour: &Self::Misbehaviour,
    ) -> Result<Self::ClientState, Self::Error>;

    /// Verifies that `value` is stored under `path` at `height`
    /// # Errors
    /// Returns an error if the proof is rejected
    fn verify_membership(
        &self,
        client_state: &Self::ClientState,
        height: u64,
        proof: &[u8],
        path: &[u8],
        value: &[u8],
    ) -> Result<Self::ClientState, Self::Error>;

    /// Verifies that nothing is stored under `path` at `height`
    /// # Errors
    /// Returns an error if the proof is rejected
    fn verify_non_membership(
        &self,
        client_state: &Self::ClientState,
        height: u64,
        proof: &[u8],
        path: &[u8],
    ) -> Result<Self::ClientState, Self::Error>;
}

/// Solo machine client definition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoloMachineClient {
    /// Governance flag set on clients created through this definition
    pub allow_update_after_proposal: bool,
}

impl LightClient for SoloMachineClient {
    type ClientState = SoloMachineClientState;
    type ConsensusState = SoloMachineConsensusState;
    type Header = SoloMachineHeader;
    type Misbehaviour = SoloMachineMisbehaviour;
    type Error = SoloMachineError;

    const CLIENT_TYPE: ClientType = ClientType::SoloMachine;

    fn initialize(
        &self,
        consensus_state: Self::ConsensusState,
    ) -> Result<Self::ClientState, Self::Error> {
        SoloMachineClientState::initialize(consensus_state, self.allow_update_after_proposal)
    }

    fn status(&self, client_state: &Self::ClientState, _host_timestamp: u64) -> Status {
        client_state.status()
    }

    fn latest_height(&self, client_state: &Self::ClientState) -> u64 {
        client_state.latest_height()
    }

    fn check_header_and_update_state(
        &self,
        client_state: &Self::ClientState,
        header: &Self::Header,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Self::Error> {
        let updated = update::check_header_and_update_state(client_state, header)?;
        let consensus_state = updated.consensus_state.clone();
        Ok((updated, consensus_state))
    }

    fn check_misbehaviour_and_update_state(
        &self,
        client_state: &Self::ClientState,
        misbehaviour: &Self::Misbehaviour,
    ) -> Result<Self::ClientState, Self::Error> {
        misbehaviour::check_misbehaviour_and_update_state(client_state, misbehaviour)
    }

    fn verify_membership(
        &self,
        client_state: &Self::ClientState,
        height: u64,
        proof: &[u8],
        path: &[u8],
        value: &[u8],
    ) -> Result<Self::ClientState, Self::Error> {
        membership::verify_membership(client_state, height, proof, path, value)
    }

    fn verify_non_membership(
        &self,
        client_state: &Self::ClientState,
        height: u64,
        proof: &[u8],
        path: &[u8],
    ) -> Result<Self::ClientState, Self::Error> {
        membership::verify_non_membership(client_state, height, proof, path)
    }
}

/// Mock client definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockClient {
    /// Trusting period of clients created through this definition, in seconds
    pub trusting_period: u64,
}

impl LightClient for MockClient {
    type ClientState = MockClientState;
    type ConsensusState = MockConsensusState;
    type Header = MockHeader;
    type Misbehaviour = MockMisbehaviour;
    type Error = MockClientError;

    const CLIENT_TYPE: ClientType = ClientType::Mock;

    fn initialize(
        &self,
        consensus_state: Self::ConsensusState,
    ) -> Result<Self::ClientState, Self::Error> {
        MockClientState::initialize(consensus_state, self.trusting_period)
    }

    fn status(&self, client_state: &Self::ClientState, host_timestamp: u64) -> Status {
        client_state.status(host_timestamp)
    }

    fn latest_height(&self, client_state: &Self::ClientState) -> u64 {
        client_state.latest_height
    }

    fn check_header_and_update_state(
        &self,
        client_state: &Self::ClientState,
        header: &Self::Header,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Self::Error> {
        client_state.check_header_and_update_state(*header)
    }

    fn check_misbehaviour_and_update_state(
        &self,
        client_state: &Self::ClientState,
        misbehaviour: &Self::Misbehaviour,
    ) -> Result<Self::ClientState, Self::Error> {
        client_state.check_misbehaviour_and_update_state(*misbehaviour)
    }

    fn verify_membership(
        &self,
        client_state: &Self::ClientState,
        height: u64,
        proof: &[u8],
        path: &[u8],
        value: &[u8],
    ) -> Result<Self::ClientState, Self::Error> {
        client_state.verify_membership(height, proof, path, value)
    }

    fn verify_non_membership(
        &self,
        client_state: &Self::ClientState,
        height: u64,
        proof: &[u8],
        path: &[u8],
    ) -> Result<Self::ClientState, Self::Error> {
        client_state.verify_non_membership(height, proof, path)
    }
}
