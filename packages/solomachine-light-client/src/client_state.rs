//! Solo machine client state

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{consensus_state::ConsensusState, error::SoloMachineError};

/// Sequence a freshly initialized client starts at. Sequence 0 is reserved as
/// invalid for headers and evidence.
pub const GENESIS_SEQUENCE: u64 = 1;

/// Client state tracking a single solo machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// Current consensus state
    pub consensus_state: ConsensusState,
    /// Next sequence the solo machine signs at, acts as the client height
    pub sequence: u64,
    /// Whether the client is frozen due to misbehaviour
    pub is_frozen: bool,
    /// Governance flag, carried through every transition untouched
    #[serde(default)]
    pub allow_update_after_proposal: bool,
}

/// Status of a light client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Client can be updated and used for proof verification
    Active,
    /// Misbehaviour was proven, the client is a permanent record of distrust
    Frozen,
    /// Client has not been updated within its trusting period
    Expired,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Frozen => write!(f, "Frozen"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

impl ClientState {
    /// Creates the starting client state from a genesis consensus state
    /// # Errors
    /// Returns [`SoloMachineError::InvalidConsensusState`] if the consensus state is malformed
    pub fn initialize(
        consensus_state: ConsensusState,
        allow_update_after_proposal: bool,
    ) -> Result<Self, SoloMachineError> {
        consensus_state.validate_basic()?;
        Ok(Self {
            consensus_state,
            sequence: GENESIS_SEQUENCE,
            is_frozen: false,
            allow_update_after_proposal,
        })
    }

    /// Frozen once misbehaviour was proven, otherwise active. Solo machines
    /// have no trusting period and never expire.
    #[must_use]
    pub const fn status(&self) -> Status {
        if self.is_frozen {
            Status::Frozen
        } else {
            Status::Active
        }
    }

    /// Latest height of the client, which is its sequence
    #[must_use]
    pub const fn latest_height(&self) -> u64 {
        self.sequence
    }

    /// Sequence the client moves to once the current one is consumed
    /// # Errors
    /// Returns [`SoloMachineError::SequenceExhausted`] at `u64::MAX`
    pub const fn next_sequence(&self) -> Result<u64, SoloMachineError> {
        match self.sequence.checked_add(1) {
            Some(next) => Ok(next),
            None => Err(SoloMachineError::SequenceExhausted {
                sequence: self.sequence,
            }),
        }
    }

    /// Fails with [`SoloMachineError::ClientFrozen`] on a frozen client
    pub(crate) fn ensure_not_frozen(&self) -> Result<(), SoloMachineError> {
        if self.is_frozen {
            return Err(SoloMachineError::ClientFrozen);
        }
        Ok(())
    }
}
