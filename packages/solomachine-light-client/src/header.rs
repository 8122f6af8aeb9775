//! Solo machine header types

use serde::{Deserialize, Serialize};

use crate::{
    consensus_state::is_blank,
    crypto::PublicKey,
    error::HeaderError,
    sign_bytes::put_length_prefixed,
};

/// Signed statement rotating the solo machine to a new key and diversifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Sequence the header is signed at, must equal the client sequence
    pub sequence: u64,
    /// Timestamp of the new consensus state
    pub timestamp: u64,
    /// Signature by the current key over the header sign bytes
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
    /// Key of the new consensus state
    pub new_public_key: PublicKey,
    /// Diversifier of the new consensus state
    pub new_diversifier: String,
}

/// Payload of the header sign bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderData {
    /// Key of the new consensus state
    pub new_public_key: PublicKey,
    /// Diversifier of the new consensus state
    pub new_diversifier: String,
}

impl HeaderData {
    /// `lp(scheme || key) || lp(new_diversifier)`
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bz = Vec::new();
        put_length_prefixed(&mut bz, &self.new_public_key.to_tagged_bytes());
        put_length_prefixed(&mut bz, self.new_diversifier.as_bytes());
        bz
    }
}

impl Header {
    /// Payload the header signature commits to
    #[must_use]
    pub fn data(&self) -> HeaderData {
        HeaderData {
            new_public_key: self.new_public_key.clone(),
            new_diversifier: self.new_diversifier.clone(),
        }
    }

    /// Stateless validity checks
    /// # Errors
    /// Returns an error if sequence or timestamp is 0, the signature is empty,
    /// the new diversifier is blank or the new public key cannot be parsed
    pub fn validate_basic(&self) -> Result<(), HeaderError> {
        if self.sequence == 0 {
            return Err(HeaderError::ZeroSequence);
        }
        if self.timestamp == 0 {
            return Err(HeaderError::ZeroTimestamp);
        }
        if self.signature.is_empty() {
            return Err(HeaderError::EmptySignature);
        }
        if is_blank(&self.new_diversifier) {
            return Err(HeaderError::BlankDiversifier);
        }
        self.new_public_key
            .validate()
            .map_err(HeaderError::InvalidNewPublicKey)
    }
}
