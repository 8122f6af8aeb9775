//! Solo machine light client update logic

use crate::{
    client_state::ClientState, consensus_state::ConsensusState, error::SoloMachineError,
    header::Header, verify::verify_header,
};

/// Applies a verified header: the consensus state is replaced by the rotation
/// target and the sequence advances by one.
///
/// Callers must have run [`verify_header`] first.
/// # Errors
/// Returns [`SoloMachineError::SequenceExhausted`] if the sequence cannot advance
pub fn update_state(
    client_state: &ClientState,
    header: &Header,
) -> Result<ClientState, SoloMachineError> {
    Ok(ClientState {
        consensus_state: ConsensusState::new(
            header.new_public_key.clone(),
            header.new_diversifier.clone(),
            header.timestamp,
        ),
        sequence: client_state.next_sequence()?,
        ..client_state.clone()
    })
}

/// Verifies `header` and returns the updated client state. `client_state` is
/// left untouched whether or not the header is accepted.
/// # Errors
/// Returns an error if header verification fails, see [`verify_header`]
pub fn check_header_and_update_state(
    client_state: &ClientState,
    header: &Header,
) -> Result<ClientState, SoloMachineError> {
    verify_header(client_state, header)?;
    update_state(client_state, header)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::client_state::Status;
    use crate::signer::SoloMachineSigner;
    use crate::test_utils::{
        client_state_at, ed25519_signer, secp256k1_signer, DIVERSIFIER, GENESIS_TIMESTAMP,
    };

    #[rstest]
    #[case::secp256k1(secp256k1_signer(), ed25519_signer())]
    #[case::ed25519(ed25519_signer(), secp256k1_signer())]
    fn rotates_key_and_advances_sequence(
        #[case] current: SoloMachineSigner,
        #[case] next: SoloMachineSigner,
    ) {
        let mut cs = client_state_at(&current, 3);
        cs.allow_update_after_proposal = true;

        let header = current.sign_header(
            3,
            GENESIS_TIMESTAMP + 10,
            DIVERSIFIER,
            next.public_key(),
            "rotated".into(),
        );
        let updated = check_header_and_update_state(&cs, &header).unwrap();

        assert_eq!(updated.sequence, 4);
        assert_eq!(updated.consensus_state.public_key, next.public_key());
        assert_eq!(updated.consensus_state.diversifier, "rotated");
        assert_eq!(updated.consensus_state.timestamp, GENESIS_TIMESTAMP + 10);
        assert!(updated.allow_update_after_proposal);
        assert_eq!(updated.status(), Status::Active);

        // the old key can no longer sign for the client
        let stale = current.sign_header(
            4,
            GENESIS_TIMESTAMP + 11,
            "rotated",
            current.public_key(),
            "rotated".into(),
        );
        assert!(matches!(
            check_header_and_update_state(&updated, &stale),
            Err(SoloMachineError::InvalidHeader(_))
        ));

        let next_header = next.sign_header(
            4,
            GENESIS_TIMESTAMP + 11,
            "rotated",
            next.public_key(),
            "rotated".into(),
        );
        let again = check_header_and_update_state(&updated, &next_header).unwrap();
        assert_eq!(again.sequence, 5);
    }

    #[test]
    fn same_timestamp_is_accepted() {
        let signer = secp256k1_signer();
        let cs = client_state_at(&signer, 1);
        let header = signer.sign_header(
            1,
            GENESIS_TIMESTAMP,
            DIVERSIFIER,
            signer.public_key(),
            DIVERSIFIER.into(),
        );
        assert_eq!(
            check_header_and_update_state(&cs, &header).unwrap().sequence,
            2
        );
    }

    #[test]
    fn replayed_header_is_rejected() {
        let signer = secp256k1_signer();
        let cs = client_state_at(&signer, 1);
        let header = signer.sign_header(
            1,
            GENESIS_TIMESTAMP + 1,
            DIVERSIFIER,
            signer.public_key(),
            DIVERSIFIER.into(),
        );
        let updated = check_header_and_update_state(&cs, &header).unwrap();
        assert!(matches!(
            check_header_and_update_state(&updated, &header),
            Err(SoloMachineError::InvalidSequence {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn last_sequence_cannot_be_consumed() {
        let signer = secp256k1_signer();
        let cs = client_state_at(&signer, u64::MAX);
        let header = signer.sign_header(
            u64::MAX,
            GENESIS_TIMESTAMP + 1,
            DIVERSIFIER,
            signer.public_key(),
            DIVERSIFIER.into(),
        );
        assert!(matches!(
            check_header_and_update_state(&cs, &header),
            Err(SoloMachineError::SequenceExhausted { sequence: u64::MAX })
        ));
        assert!(matches!(
            update_state(&cs, &header),
            Err(SoloMachineError::SequenceExhausted { .. })
        ));
    }

    #[test]
    fn failure_leaves_state_untouched() {
        let signer = secp256k1_signer();
        let cs = client_state_at(&signer, 1);
        let before = cs.clone();
        let header = signer.sign_header(
            9,
            GENESIS_TIMESTAMP + 1,
            DIVERSIFIER,
            signer.public_key(),
            DIVERSIFIER.into(),
        );
        assert!(check_header_and_update_state(&cs, &header).is_err());
        assert_eq!(cs, before);
    }
}
