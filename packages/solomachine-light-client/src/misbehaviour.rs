//! This module provides [`check_misbehaviour_and_update_state`] to freeze a
//! solo machine client on proof of equivocation.

use serde::{Deserialize, Serialize};

use crate::{
    client_state::ClientState,
    crypto::verify_signature,
    error::{EvidenceError, SignatureIndex, SoloMachineError},
    sign_bytes::misbehaviour_sign_bytes,
};

/// A payload together with the solo machine's signature over it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureAndData {
    /// Signature over `be_u64(sequence) || data`
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
    /// Signed payload
    #[serde(with = "hex::serde")]
    pub data: Vec<u8>,
}

/// Claim that the solo machine signed two different payloads at one sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misbehaviour {
    /// Sequence both signatures were produced at
    pub sequence: u64,
    /// First signed payload
    pub signature_one: SignatureAndData,
    /// Second signed payload
    pub signature_two: SignatureAndData,
}

impl Misbehaviour {
    /// Stateless checks run when evidence is submitted, before any client
    /// state is loaded
    /// # Errors
    /// Returns an error if the sequence is 0, any payload or signature is
    /// empty, or both payloads are identical
    pub fn validate_basic(&self) -> Result<(), EvidenceError> {
        if self.sequence == 0 {
            return Err(EvidenceError::ZeroSequence);
        }
        for (index, sig) in [
            (SignatureIndex::One, &self.signature_one),
            (SignatureIndex::Two, &self.signature_two),
        ] {
            if sig.data.is_empty() {
                return Err(EvidenceError::EmptyData(index));
            }
            if sig.signature.is_empty() {
                return Err(EvidenceError::EmptySignature(index));
            }
        }
        if self.signature_one.data == self.signature_two.data {
            return Err(EvidenceError::IdenticalData);
        }
        Ok(())
    }
}

/// Determines whether the currently registered public key signed two
/// different payloads at the same sequence. If so, a copy of the client state
/// with `is_frozen` set is returned; no other field changes.
///
/// Only the payloads are compared. Two different signatures over the same
/// payload are not equivocation.
///
/// # Errors
/// Returns an error, leaving `client_state` as it was, if:
/// - The client is already frozen
/// - Both payloads are identical
/// - Either signature does not verify against the current public key
pub fn check_misbehaviour_and_update_state(
    client_state: &ClientState,
    misbehaviour: &Misbehaviour,
) -> Result<ClientState, SoloMachineError> {
    client_state.ensure_not_frozen()?;
    verify_misbehaviour(client_state, misbehaviour)?;

    Ok(ClientState {
        is_frozen: true,
        ..client_state.clone()
    })
}

/// Verifies the equivocation proof without touching the client state.
/// # Errors
/// Returns [`SoloMachineError::InvalidEvidence`] if the payloads are identical
/// or either signature fails to verify
pub fn verify_misbehaviour(
    client_state: &ClientState,
    misbehaviour: &Misbehaviour,
) -> Result<(), SoloMachineError> {
    let public_key = &client_state.consensus_state.public_key;
    let (one, two) = (&misbehaviour.signature_one, &misbehaviour.signature_two);

    if one.data == two.data {
        return Err(EvidenceError::IdenticalData.into());
    }

    verify_signature(
        public_key,
        &misbehaviour_sign_bytes(misbehaviour.sequence, &one.data),
        &one.signature,
    )
    .map_err(EvidenceError::SignatureOne)?;

    verify_signature(
        public_key,
        &misbehaviour_sign_bytes(misbehaviour.sequence, &two.data),
        &two.signature,
    )
    .map_err(EvidenceError::SignatureTwo)?;

    Ok(())
}
