//! Dispatch of client operations to the client type of the state

use solomachine_light_client::client_state::Status;

use crate::{
    any::{AnyClientState, AnyConsensusState, AnyHeader, AnyMisbehaviour},
    client_type::ClientType,
    config::RegistryConfig,
    error::ClientError,
    light_client::{LightClient, MockClient, SoloMachineClient},
};

/// Routes every operation on an `Any*` value to the matching [`LightClient`].
///
/// Values of different client types are never mixed: passing a header or
/// misbehaviour of one type to a client of another fails with
/// [`ClientError::InvalidClientType`].
#[derive(Debug, Clone)]
pub struct ClientRegistry {
    config: RegistryConfig,
    solo_machine: SoloMachineClient,
    mock: MockClient,
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new(&RegistryConfig::default())
    }
}

impl ClientRegistry {
    /// Builds the registry from an explicit configuration
    #[must_use]
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            config: config.clone(),
            solo_machine: SoloMachineClient {
                allow_update_after_proposal: config.allow_update_after_proposal,
            },
            mock: MockClient {
                trusting_period: config.mock_trusting_period,
            },
        }
    }

    /// Configuration the registry was built from
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Looks up a client type by its tag
    /// # Errors
    /// Returns [`ClientError::UnknownClientType`] if the tag is unknown
    pub fn resolve(&self, tag: &str) -> Result<ClientType, ClientError> {
        tag.parse()
    }

    /// Fails with [`ClientError::ClientTypeNotAllowed`] unless the
    /// configuration allows `client_type`
    /// # Errors
    /// See above
    pub fn ensure_allowed(&self, client_type: ClientType) -> Result<(), ClientError> {
        if self.config.is_allowed(client_type) {
            Ok(())
        } else {
            Err(ClientError::ClientTypeNotAllowed(client_type))
        }
    }

    /// Creates the starting client state for `consensus_state`
    /// # Errors
    /// Returns an error if the client type is not allowed or the consensus
    /// state is malformed
    pub fn initialize(
        &self,
        consensus_state: AnyConsensusState,
    ) -> Result<AnyClientState, ClientError> {
        self.ensure_allowed(consensus_state.client_type())?;
        match consensus_state {
            AnyConsensusState::SoloMachine(cns) => {
                lift(self.solo_machine.initialize(cns)).map(AnyClientState::SoloMachine)
            }
            AnyConsensusState::Mock(cns) => {
                lift(self.mock.initialize(cns)).map(AnyClientState::Mock)
            }
        }
    }

    /// Status of the client given the host clock
    /// # Errors
    /// Returns an error if the client type is not allowed
    pub fn status(
        &self,
        client_state: &AnyClientState,
        host_timestamp: u64,
    ) -> Result<Status, ClientError> {
        self.ensure_allowed(client_state.client_type())?;
        Ok(match client_state {
            AnyClientState::SoloMachine(cs) => self.solo_machine.status(cs, host_timestamp),
            AnyClientState::Mock(cs) => self.mock.status(cs, host_timestamp),
        })
    }

    /// Latest height of the client
    #[must_use]
    pub fn latest_height(&self, client_state: &AnyClientState) -> u64 {
        match client_state {
            AnyClientState::SoloMachine(cs) => self.solo_machine.latest_height(cs),
            AnyClientState::Mock(cs) => self.mock.latest_height(cs),
        }
    }

    /// Verifies `header` against `client_state`
    /// # Errors
    /// Returns an error if the types differ, the type is not allowed or the
    /// header is rejected
    pub fn check_header_and_update_state(
        &self,
        client_state: &AnyClientState,
        header: &AnyHeader,
    ) -> Result<(AnyClientState, AnyConsensusState), ClientError> {
        self.ensure_allowed(client_state.client_type())?;
        match (client_state, header) {
            (AnyClientState::SoloMachine(cs), AnyHeader::SoloMachine(header)) => {
                let (cs, cns) = lift(self.solo_machine.check_header_and_update_state(cs, header))?;
                Ok((cs.into(), cns.into()))
            }
            (AnyClientState::Mock(cs), AnyHeader::Mock(header)) => {
                let (cs, cns) = lift(self.mock.check_header_and_update_state(cs, header))?;
                Ok((cs.into(), cns.into()))
            }
            (cs, header) => Err(ClientError::InvalidClientType {
                expected: cs.client_type(),
                found: header.client_type(),
            }),
        }
    }

    /// Verifies `misbehaviour` against `client_state` and returns the frozen state
    /// # Errors
    /// Returns an error if the types differ, the type is not allowed or the
    /// evidence is rejected
    pub fn check_misbehaviour_and_update_state(
        &self,
        client_state: &AnyClientState,
        misbehaviour: &AnyMisbehaviour,
    ) -> Result<AnyClientState, ClientError> {
        self.ensure_allowed(client_state.client_type())?;
        match (client_state, misbehaviour) {
            (AnyClientState::SoloMachine(cs), AnyMisbehaviour::SoloMachine(misbehaviour)) => lift(
                self.solo_machine
                    .check_misbehaviour_and_update_state(cs, misbehaviour),
            )
            .map(Into::into),
            (AnyClientState::Mock(cs), AnyMisbehaviour::Mock(misbehaviour)) => {
                lift(self.mock.check_misbehaviour_and_update_state(cs, misbehaviour))
                    .map(Into::into)
            }
            (cs, misbehaviour) => Err(ClientError::InvalidClientType {
                expected: cs.client_type(),
                found: misbehaviour.client_type(),
            }),
        }
    }

    /// Verifies a membership proof and returns the next client state
    /// # Errors
    /// Returns an error if the type is not allowed or the proof is rejected
    pub fn verify_membership(
        &self,
        client_state: &AnyClientState,
        height: u64,
        proof: &[u8],
        path: &[u8],
        value: &[u8],
    ) -> Result<AnyClientState, ClientError> {
        self.ensure_allowed(client_state.client_type())?;
        match client_state {
            AnyClientState::SoloMachine(cs) => lift(
                self.solo_machine
                    .verify_membership(cs, height, proof, path, value),
            )
            .map(Into::into),
            AnyClientState::Mock(cs) => {
                lift(self.mock.verify_membership(cs, height, proof, path, value)).map(Into::into)
            }
        }
    }

    /// Verifies a non-membership proof and returns the next client state
    /// # Errors
    /// Returns an error if the type is not allowed or the proof is rejected
    pub fn verify_non_membership(
        &self,
        client_state: &AnyClientState,
        height: u64,
        proof: &[u8],
        path: &[u8],
    ) -> Result<AnyClientState, ClientError> {
        self.ensure_allowed(client_state.client_type())?;
        match client_state {
            AnyClientState::SoloMachine(cs) => lift(
                self.solo_machine
                    .verify_non_membership(cs, height, proof, path),
            )
            .map(Into::into),
            AnyClientState::Mock(cs) => {
                lift(self.mock.verify_non_membership(cs, height, proof, path)).map(Into::into)
            }
        }
    }
}

fn lift<T, E: Into<ClientError>>(res: Result<T, E>) -> Result<T, ClientError> {
    res.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use solomachine_light_client::{
        error::{EvidenceError, SoloMachineError},
        test_utils::{client_state_at, equivocation, genesis_consensus_state, secp256k1_signer},
    };

    use super::*;
    use crate::mock::{MockConsensusState, MockHeader, MockMisbehaviour};

    fn mock_client_state(registry: &ClientRegistry) -> AnyClientState {
        registry
            .initialize(
                MockConsensusState {
                    height: 1,
                    timestamp: 100,
                }
                .into(),
            )
            .unwrap()
    }

    #[test]
    fn initialize_dispatches_by_variant() {
        let registry = ClientRegistry::new(&RegistryConfig {
            allow_update_after_proposal: true,
            ..RegistryConfig::default()
        });
        let solo = registry
            .initialize(genesis_consensus_state(&secp256k1_signer()).into())
            .unwrap();
        let AnyClientState::SoloMachine(cs) = &solo else {
            panic!("expected solo machine client state");
        };
        assert!(cs.allow_update_after_proposal);
        assert_eq!(registry.latest_height(&solo), 1);

        let mock = mock_client_state(&registry);
        assert_eq!(mock.client_type(), ClientType::Mock);
        assert_eq!(registry.status(&mock, 100).unwrap(), Status::Active);
    }

    #[test]
    fn cross_variant_misbehaviour_is_invalid_client_type() {
        let registry = ClientRegistry::default();
        let signer = secp256k1_signer();
        let solo: AnyClientState = client_state_at(&signer, 5).into();
        let mock_misbehaviour: AnyMisbehaviour = MockMisbehaviour {
            header_one: MockHeader {
                height: 5,
                timestamp: 1,
            },
            header_two: MockHeader {
                height: 5,
                timestamp: 2,
            },
        }
        .into();

        assert!(matches!(
            registry.check_misbehaviour_and_update_state(&solo, &mock_misbehaviour),
            Err(ClientError::InvalidClientType {
                expected: ClientType::SoloMachine,
                found: ClientType::Mock
            })
        ));

        let mock = mock_client_state(&registry);
        let solo_misbehaviour: AnyMisbehaviour =
            equivocation(&signer, 5, b"msg-A", b"msg-B").into();
        assert!(matches!(
            registry.check_misbehaviour_and_update_state(&mock, &solo_misbehaviour),
            Err(ClientError::InvalidClientType {
                expected: ClientType::Mock,
                found: ClientType::SoloMachine
            })
        ));
    }

    #[test]
    fn cross_variant_header_is_invalid_client_type() {
        let registry = ClientRegistry::default();
        let mock = mock_client_state(&registry);
        let signer = secp256k1_signer();
        let header: AnyHeader = signer
            .sign_header(1, 200, "d", signer.public_key(), "d".into())
            .into();
        assert!(matches!(
            registry.check_header_and_update_state(&mock, &header),
            Err(ClientError::InvalidClientType { .. })
        ));
    }

    #[test]
    fn solo_machine_misbehaviour_freezes() {
        let registry = ClientRegistry::default();
        let signer = secp256k1_signer();
        let solo: AnyClientState = client_state_at(&signer, 5).into();
        let evidence: AnyMisbehaviour = equivocation(&signer, 5, b"msg-A", b"msg-B").into();

        let frozen = registry
            .check_misbehaviour_and_update_state(&solo, &evidence)
            .unwrap();
        assert_eq!(registry.status(&frozen, 0).unwrap(), Status::Frozen);
        assert!(matches!(
            registry.check_misbehaviour_and_update_state(&frozen, &evidence),
            Err(ClientError::SoloMachine(SoloMachineError::ClientFrozen))
        ));

        let duplicate: AnyMisbehaviour = equivocation(&signer, 5, b"msg-A", b"msg-A").into();
        assert!(matches!(
            registry.check_misbehaviour_and_update_state(&solo, &duplicate),
            Err(ClientError::SoloMachine(SoloMachineError::InvalidEvidence(
                EvidenceError::IdenticalData
            )))
        ));
    }

    #[test]
    fn disallowed_type_is_rejected() {
        let registry = ClientRegistry::new(&RegistryConfig {
            allowed_clients: vec![ClientType::SoloMachine],
            ..RegistryConfig::default()
        });
        let res = registry.initialize(
            MockConsensusState {
                height: 1,
                timestamp: 1,
            }
            .into(),
        );
        assert!(matches!(
            res,
            Err(ClientError::ClientTypeNotAllowed(ClientType::Mock))
        ));
        assert_eq!(
            registry.resolve("9999-mock").unwrap(),
            ClientType::Mock
        );
        assert!(matches!(
            registry.resolve("07-tendermint"),
            Err(ClientError::UnknownClientType { .. })
        ));
    }
}
