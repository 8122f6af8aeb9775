//! Membership proof verification for the solo machine client.
//!
//! A solo machine proves that it stores `value` under `path` (or stores
//! nothing) by signing the statement at its current sequence. Each accepted
//! proof consumes the sequence, so it cannot be replayed.

use crate::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    crypto::verify_signature,
    error::SoloMachineError,
    proof::TimestampedSignatureData,
    sign_bytes::{DataType, SignBytes},
};

/// Verify membership proof for `path` and `value` at `height`
/// # Errors
/// Returns an error if the client is frozen, the height is not the client
/// sequence, the sequence cannot advance, the proof cannot be deserialized, its timestamp regresses or its
/// signature does not verify
pub fn verify_membership(
    client_state: &ClientState,
    height: u64,
    proof: &[u8],
    path: &[u8],
    value: &[u8],
) -> Result<ClientState, SoloMachineError> {
    verify_statement(client_state, height, proof, path, Some(value))
}

/// Verify non-membership proof for `path` at `height`
/// # Errors
/// Same conditions as [`verify_membership`]
pub fn verify_non_membership(
    client_state: &ClientState,
    height: u64,
    proof: &[u8],
    path: &[u8],
) -> Result<ClientState, SoloMachineError> {
    verify_statement(client_state, height, proof, path, None)
}

fn verify_statement(
    client_state: &ClientState,
    height: u64,
    proof: &[u8],
    path: &[u8],
    value: Option<&[u8]>,
) -> Result<ClientState, SoloMachineError> {
    client_state.ensure_not_frozen()?;

    if height != client_state.sequence {
        return Err(SoloMachineError::InvalidProof {
            reason: format!(
                "height {height} must match client sequence {}",
                client_state.sequence
            ),
        });
    }
    let next_sequence = client_state.next_sequence()?;

    let proof: TimestampedSignatureData =
        serde_json::from_slice(proof).map_err(SoloMachineError::DeserializeProofFailed)?;

    let consensus_state = &client_state.consensus_state;
    if proof.timestamp < consensus_state.timestamp {
        return Err(SoloMachineError::InvalidProof {
            reason: format!(
                "proof timestamp {} is less than consensus state timestamp {}",
                proof.timestamp, consensus_state.timestamp
            ),
        });
    }

    let (data_type, data) = DataType::for_membership(path, value);
    let sign_bytes = SignBytes {
        sequence: height,
        timestamp: proof.timestamp,
        diversifier: &consensus_state.diversifier,
        data_type,
        data: &data,
    };
    verify_signature(
        &consensus_state.public_key,
        &sign_bytes.encode(),
        &proof.signature,
    )
    .map_err(SoloMachineError::InvalidProofSignature)?;

    Ok(ClientState {
        consensus_state: ConsensusState {
            timestamp: proof.timestamp,
            ..consensus_state.clone()
        },
        sequence: next_sequence,
        ..client_state.clone()
    })
}
