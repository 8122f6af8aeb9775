//! Solo machine consensus state

use serde::{Deserialize, Serialize};

use crate::{crypto::PublicKey, error::SoloMachineError};

/// Snapshot of the solo machine's signing identity.
///
/// Never mutated in place; header updates replace it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    /// Key every statement must be signed with
    pub public_key: PublicKey,
    /// Domain separator so signatures for this client cannot be replayed on
    /// another client sharing the key
    pub diversifier: String,
    /// Timestamp reported by the solo machine
    pub timestamp: u64,
}

impl ConsensusState {
    /// Create a new [`ConsensusState`]
    #[must_use]
    pub const fn new(public_key: PublicKey, diversifier: String, timestamp: u64) -> Self {
        Self {
            public_key,
            diversifier,
            timestamp,
        }
    }

    /// Stateless validity checks
    /// # Errors
    /// Returns [`SoloMachineError::InvalidConsensusState`] if the timestamp is 0,
    /// the public key is empty or cannot be parsed, or the diversifier is blank
    pub fn validate_basic(&self) -> Result<(), SoloMachineError> {
        if self.timestamp == 0 {
            return Err(SoloMachineError::InvalidConsensusState {
                reason: "timestamp cannot be 0".into(),
            });
        }
        if self.public_key.key.is_empty() {
            return Err(SoloMachineError::InvalidConsensusState {
                reason: "public key cannot be empty".into(),
            });
        }
        self.public_key
            .validate()
            .map_err(|e| SoloMachineError::InvalidConsensusState {
                reason: e.to_string(),
            })?;
        if is_blank(&self.diversifier) {
            return Err(SoloMachineError::InvalidConsensusState {
                reason: "diversifier cannot contain only spaces".into(),
            });
        }
        Ok(())
    }
}

/// An empty diversifier is allowed, one made of whitespace only is not
pub(crate) fn is_blank(diversifier: &str) -> bool {
    !diversifier.is_empty() && diversifier.trim().is_empty()
}
