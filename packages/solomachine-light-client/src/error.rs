//! Error types for the solo machine light client

use thiserror::Error;

use crate::crypto::SignatureError;

/// Main error type for solo machine client operations
#[derive(Error, Debug)]
pub enum SoloMachineError {
    /// Consensus state cannot be used to initialize or update a client
    #[error("invalid consensus state: {reason}")]
    InvalidConsensusState {
        /// Reason for error
        reason: String,
    },

    /// Header is malformed or not signed by the current key
    #[error("invalid header: {0}")]
    InvalidHeader(#[from] HeaderError),

    /// Header is not for the sequence the client expects next
    #[error("header sequence {found} does not match client sequence {expected}")]
    InvalidSequence {
        /// Current client sequence
        expected: u64,
        /// Sequence of the submitted header
        found: u64,
    },

    /// Client sequence cannot advance any further
    #[error("client sequence {sequence} cannot be advanced")]
    SequenceExhausted {
        /// Current client sequence
        sequence: u64,
    },

    /// Client is frozen
    #[error("client is frozen")]
    ClientFrozen,

    /// Misbehaviour does not prove equivocation
    #[error("invalid evidence: {0}")]
    InvalidEvidence(#[from] EvidenceError),

    /// Bad proof provided
    #[error("proof invalid: {reason}")]
    InvalidProof {
        /// Reason for error
        reason: String,
    },

    /// Proof signature does not verify against the client key
    #[error("proof signature verification failed: {0}")]
    InvalidProofSignature(#[source] SignatureError),

    /// Proof cannot be deserialized
    #[error("deserializing proof failed: {0}")]
    DeserializeProofFailed(#[source] serde_json::Error),
}

/// Reasons a header is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Sequence 0 is never valid
    #[error("sequence cannot be 0")]
    ZeroSequence,

    /// Timestamp 0 is never valid
    #[error("timestamp cannot be 0")]
    ZeroTimestamp,

    /// No signature attached
    #[error("signature cannot be empty")]
    EmptySignature,

    /// New diversifier consists of whitespace only
    #[error("new diversifier cannot contain only spaces")]
    BlankDiversifier,

    /// New public key cannot be parsed
    #[error("new public key is invalid: {0}")]
    InvalidNewPublicKey(#[source] SignatureError),

    /// Header moves the consensus timestamp backwards
    #[error("header timestamp {header} is less than consensus state timestamp {consensus}")]
    TimestampRegression {
        /// Timestamp of the stored consensus state
        consensus: u64,
        /// Timestamp of the header
        header: u64,
    },

    /// Signature does not verify against the current key
    #[error("header signature verification failed: {0}")]
    Signature(#[source] SignatureError),
}

/// Reasons misbehaviour evidence is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvidenceError {
    /// Sequence 0 is never valid
    #[error("sequence cannot be 0")]
    ZeroSequence,

    /// One of the signed payloads is empty
    #[error("signature {0} data cannot be empty")]
    EmptyData(SignatureIndex),

    /// One of the signatures is empty
    #[error("signature {0} cannot be empty")]
    EmptySignature(SignatureIndex),

    /// Both signatures sign the same payload
    #[error("evidence signatures have identical data messages")]
    IdenticalData,

    /// First signature does not verify
    #[error("evidence signature one failed to be verified: {0}")]
    SignatureOne(#[source] SignatureError),

    /// Second signature does not verify
    #[error("evidence signature two failed to be verified: {0}")]
    SignatureTwo(#[source] SignatureError),
}

/// Which half of a misbehaviour an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureIndex {
    /// `signature_one`
    One,
    /// `signature_two`
    Two,
}

impl core::fmt::Display for SignatureIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::One => write!(f, "one"),
            Self::Two => write!(f, "two"),
        }
    }
}
