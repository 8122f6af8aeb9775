//! Height based mock client.
//!
//! Trusts any header above its latest height and expires once the host clock
//! passes `latest_timestamp + trusting_period`. Membership proofs are SHA-256
//! commitments to the path and value.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use solomachine_light_client::client_state::Status;
use thiserror::Error;

/// Errors returned by the mock client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockClientError {
    /// Height or timestamp is 0
    #[error("invalid consensus state: {reason}")]
    InvalidConsensusState {
        /// Reason for error
        reason: String,
    },

    /// Header does not advance the client
    #[error("header height {header} is not greater than latest height {latest}")]
    LowHeaderHeight {
        /// Height of the header
        header: u64,
        /// Latest height of the client
        latest: u64,
    },

    /// Client is frozen
    #[error("client is frozen at height {0}")]
    ClientFrozen(u64),

    /// Misbehaviour does not show two conflicting headers
    #[error("invalid evidence: {reason}")]
    InvalidEvidence {
        /// Reason for error
        reason: String,
    },

    /// Bad proof provided
    #[error("proof invalid: {reason}")]
    InvalidProof {
        /// Reason for error
        reason: String,
    },
}

/// Mock header, a height and the timestamp of that height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockHeader {
    /// Height of the header
    pub height: u64,
    /// Timestamp of the header in seconds
    pub timestamp: u64,
}

/// Mock consensus state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockConsensusState {
    /// Height of the consensus state
    pub height: u64,
    /// Timestamp of the consensus state in seconds
    pub timestamp: u64,
}

impl From<MockHeader> for MockConsensusState {
    fn from(header: MockHeader) -> Self {
        Self {
            height: header.height,
            timestamp: header.timestamp,
        }
    }
}

/// Two different headers at the same height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockMisbehaviour {
    /// First header
    pub header_one: MockHeader,
    /// Second header
    pub header_two: MockHeader,
}

/// Mock client state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockClientState {
    /// Latest trusted height
    pub latest_height: u64,
    /// Timestamp of the latest trusted height in seconds
    pub latest_timestamp: u64,
    /// Seconds after `latest_timestamp` during which the client stays active
    pub trusting_period: u64,
    /// Height misbehaviour was detected at
    #[serde(default)]
    pub frozen_height: Option<u64>,
}

impl MockClientState {
    /// Creates a client trusting `consensus_state`
    /// # Errors
    /// Returns an error if the height or timestamp is 0
    pub fn initialize(
        consensus_state: MockConsensusState,
        trusting_period: u64,
    ) -> Result<Self, MockClientError> {
        if consensus_state.height == 0 || consensus_state.timestamp == 0 {
            return Err(MockClientError::InvalidConsensusState {
                reason: "height and timestamp must be non-zero".into(),
            });
        }
        Ok(Self {
            latest_height: consensus_state.height,
            latest_timestamp: consensus_state.timestamp,
            trusting_period,
            frozen_height: None,
        })
    }

    /// Frozen if misbehaviour was detected, expired if the host clock is past
    /// the trusting period, otherwise active
    #[must_use]
    pub const fn status(&self, host_timestamp: u64) -> Status {
        if self.frozen_height.is_some() {
            Status::Frozen
        } else if host_timestamp > self.latest_timestamp.saturating_add(self.trusting_period) {
            Status::Expired
        } else {
            Status::Active
        }
    }

    /// Accepts any header above the latest height
    /// # Errors
    /// Returns an error if the client is frozen or the header does not advance it
    pub fn check_header_and_update_state(
        &self,
        header: MockHeader,
    ) -> Result<(Self, MockConsensusState), MockClientError> {
        self.ensure_not_frozen()?;
        if header.height <= self.latest_height {
            return Err(MockClientError::LowHeaderHeight {
                header: header.height,
                latest: self.latest_height,
            });
        }
        Ok((
            Self {
                latest_height: header.height,
                latest_timestamp: header.timestamp,
                ..*self
            },
            header.into(),
        ))
    }

    /// Freezes the client at the height of two conflicting headers
    /// # Errors
    /// Returns an error if the client is frozen or the headers do not conflict
    pub fn check_misbehaviour_and_update_state(
        &self,
        misbehaviour: MockMisbehaviour,
    ) -> Result<Self, MockClientError> {
        self.ensure_not_frozen()?;
        let MockMisbehaviour {
            header_one,
            header_two,
        } = misbehaviour;
        if header_one.height != header_two.height {
            return Err(MockClientError::InvalidEvidence {
                reason: "headers must be at the same height".into(),
            });
        }
        if header_one == header_two {
            return Err(MockClientError::InvalidEvidence {
                reason: "headers must differ".into(),
            });
        }
        Ok(Self {
            frozen_height: Some(header_one.height),
            ..*self
        })
    }

    /// Verifies that `proof` commits to `value` under `path`
    /// # Errors
    /// Returns an error if the client is frozen, `height` is above the latest
    /// height, or the proof does not match
    pub fn verify_membership(
        &self,
        height: u64,
        proof: &[u8],
        path: &[u8],
        value: &[u8],
    ) -> Result<Self, MockClientError> {
        self.verify_commitment(height, proof, path, Some(value))
    }

    /// Verifies that `proof` commits to the absence of `path`
    /// # Errors
    /// Same conditions as [`Self::verify_membership`]
    pub fn verify_non_membership(
        &self,
        height: u64,
        proof: &[u8],
        path: &[u8],
    ) -> Result<Self, MockClientError> {
        self.verify_commitment(height, proof, path, None)
    }

    fn verify_commitment(
        &self,
        height: u64,
        proof: &[u8],
        path: &[u8],
        value: Option<&[u8]>,
    ) -> Result<Self, MockClientError> {
        self.ensure_not_frozen()?;
        if height > self.latest_height {
            return Err(MockClientError::InvalidProof {
                reason: format!(
                    "height {height} is above latest height {}",
                    self.latest_height
                ),
            });
        }
        if proof != commitment(path, value).as_slice() {
            return Err(MockClientError::InvalidProof {
                reason: "commitment mismatch".into(),
            });
        }
        Ok(*self)
    }

    const fn ensure_not_frozen(&self) -> Result<(), MockClientError> {
        match self.frozen_height {
            Some(height) => Err(MockClientError::ClientFrozen(height)),
            None => Ok(()),
        }
    }
}

/// Proof accepted by the mock client for `path`, committing to `value` or to
/// its absence
#[must_use]
pub fn commitment(path: &[u8], value: Option<&[u8]>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update((path.len() as u64).to_be_bytes());
    hasher.update(path);
    match value {
        Some(value) => {
            hasher.update([1]);
            hasher.update(value);
        }
        None => hasher.update([0]),
    }
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUSTING_PERIOD: u64 = 100;

    fn client() -> MockClientState {
        MockClientState::initialize(
            MockConsensusState {
                height: 10,
                timestamp: 1_000,
            },
            TRUSTING_PERIOD,
        )
        .unwrap()
    }

    #[test]
    fn initialize_rejects_zero_height() {
        let res = MockClientState::initialize(
            MockConsensusState {
                height: 0,
                timestamp: 1,
            },
            TRUSTING_PERIOD,
        );
        assert!(matches!(
            res,
            Err(MockClientError::InvalidConsensusState { .. })
        ));
    }

    #[test]
    fn expires_after_trusting_period() {
        let cs = client();
        assert_eq!(cs.status(1_000), Status::Active);
        assert_eq!(cs.status(1_100), Status::Active);
        assert_eq!(cs.status(1_101), Status::Expired);

        let (updated, _) = cs
            .check_header_and_update_state(MockHeader {
                height: 11,
                timestamp: 1_050,
            })
            .unwrap();
        assert_eq!(updated.status(1_101), Status::Active);
    }

    #[test]
    fn header_must_advance_height() {
        let cs = client();
        let res = cs.check_header_and_update_state(MockHeader {
            height: 10,
            timestamp: 2_000,
        });
        assert_eq!(
            res,
            Err(MockClientError::LowHeaderHeight {
                header: 10,
                latest: 10
            })
        );
    }

    #[test]
    fn conflicting_headers_freeze() {
        let cs = client();
        let misbehaviour = MockMisbehaviour {
            header_one: MockHeader {
                height: 12,
                timestamp: 1_010,
            },
            header_two: MockHeader {
                height: 12,
                timestamp: 1_011,
            },
        };
        let frozen = cs.check_misbehaviour_and_update_state(misbehaviour).unwrap();
        assert_eq!(frozen.frozen_height, Some(12));
        // frozen wins over expired
        assert_eq!(frozen.status(u64::MAX), Status::Frozen);
        assert_eq!(
            frozen.check_misbehaviour_and_update_state(misbehaviour),
            Err(MockClientError::ClientFrozen(12))
        );

        let same = MockMisbehaviour {
            header_one: misbehaviour.header_one,
            header_two: misbehaviour.header_one,
        };
        assert!(matches!(
            cs.check_misbehaviour_and_update_state(same),
            Err(MockClientError::InvalidEvidence { .. })
        ));
    }

    #[test]
    fn membership_checks_commitment() {
        let cs = client();
        let proof = commitment(b"path", Some(b"value"));
        assert_eq!(cs.verify_membership(10, &proof, b"path", b"value"), Ok(cs));
        assert!(cs.verify_membership(10, &proof, b"path", b"other").is_err());
        assert!(cs.verify_membership(11, &proof, b"path", b"value").is_err());
        assert!(cs.verify_non_membership(10, &proof, b"path").is_err());

        let absence = commitment(b"path", None);
        assert_eq!(cs.verify_non_membership(5, &absence, b"path"), Ok(cs));
    }
}
