//! Test utilities for the solo machine light client

#[cfg(any(test, feature = "test-utils"))]
pub use fixtures::*;

#[allow(missing_docs, clippy::missing_panics_doc)]
#[cfg(any(test, feature = "test-utils"))]
mod fixtures {
    use crate::{
        client_state::ClientState,
        consensus_state::ConsensusState,
        crypto::KeyScheme,
        misbehaviour::Misbehaviour,
        signer::SoloMachineSigner,
    };

    pub const DIVERSIFIER: &str = "solo-machine-diversifier";

    pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;

    #[must_use]
    pub fn secp256k1_signer() -> SoloMachineSigner {
        SoloMachineSigner::from_secret_bytes(KeyScheme::Secp256k1, &[0xcd; 32]).expect("valid key")
    }

    #[must_use]
    pub fn ed25519_signer() -> SoloMachineSigner {
        SoloMachineSigner::from_secret_bytes(KeyScheme::Ed25519, &[0x1f; 32]).expect("valid key")
    }

    /// A secp256k1 key unrelated to [`secp256k1_signer`]
    #[must_use]
    pub fn other_signer() -> SoloMachineSigner {
        SoloMachineSigner::from_secret_bytes(KeyScheme::Secp256k1, &[0x02; 32]).expect("valid key")
    }

    #[must_use]
    pub fn genesis_consensus_state(signer: &SoloMachineSigner) -> ConsensusState {
        ConsensusState::new(signer.public_key(), DIVERSIFIER.into(), GENESIS_TIMESTAMP)
    }

    /// Unfrozen client owned by `signer` expecting its next statement at `sequence`
    #[must_use]
    pub fn client_state_at(signer: &SoloMachineSigner, sequence: u64) -> ClientState {
        ClientState {
            sequence,
            ..ClientState::initialize(genesis_consensus_state(signer), false)
                .expect("valid consensus state")
        }
    }

    /// Two signatures by `signer` over different payloads at the same sequence
    #[must_use]
    pub fn equivocation(
        signer: &SoloMachineSigner,
        sequence: u64,
        data_one: &[u8],
        data_two: &[u8],
    ) -> Misbehaviour {
        Misbehaviour {
            sequence,
            signature_one: signer.sign_at_sequence(sequence, data_one),
            signature_two: signer.sign_at_sequence(sequence, data_two),
        }
    }
}
