//! Proof format for solo machine membership verification

use serde::{Deserialize, Serialize};

/// Signature over a membership or non-membership statement, together with the
/// timestamp the solo machine signed it at. Carried JSON encoded in the
/// `proof` argument of the membership functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedSignatureData {
    /// Signature over the [`crate::sign_bytes::SignBytes`] of the statement
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
    /// Timestamp bound into the sign bytes
    pub timestamp: u64,
}

impl TimestampedSignatureData {
    /// Encodes the proof as it is passed to the membership functions
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_proof_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
