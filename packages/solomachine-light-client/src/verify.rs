//! Solo machine header verification logic

use crate::{
    client_state::ClientState,
    crypto::verify_signature,
    error::{HeaderError, SoloMachineError},
    header::Header,
    sign_bytes::{DataType, SignBytes},
};

/// Verifies the header against the current client state.
///
/// # Errors
/// Returns an error if:
/// - The client is frozen
/// - The header fails [`Header::validate_basic`]
/// - The header sequence is not the client sequence, or the client sequence
///   cannot advance
/// - The header timestamp is lower than the consensus state timestamp
/// - The header is not signed by the current public key
pub fn verify_header(client_state: &ClientState, header: &Header) -> Result<(), SoloMachineError> {
    client_state.ensure_not_frozen()?;
    header.validate_basic()?;

    if header.sequence != client_state.sequence {
        return Err(SoloMachineError::InvalidSequence {
            expected: client_state.sequence,
            found: header.sequence,
        });
    }
    client_state.next_sequence()?;

    let consensus_state = &client_state.consensus_state;
    if header.timestamp < consensus_state.timestamp {
        return Err(HeaderError::TimestampRegression {
            consensus: consensus_state.timestamp,
            header: header.timestamp,
        }
        .into());
    }

    let data = header.data().encode();
    let sign_bytes = SignBytes {
        sequence: header.sequence,
        timestamp: header.timestamp,
        diversifier: &consensus_state.diversifier,
        data_type: DataType::Header,
        data: &data,
    };
    verify_signature(
        &consensus_state.public_key,
        &sign_bytes.encode(),
        &header.signature,
    )
    .map_err(HeaderError::Signature)?;

    Ok(())
}
