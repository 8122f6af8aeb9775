//! Closed unions over every client type's states and messages

use ibc_query_router::Any;
use serde::{Deserialize, Serialize};
use solomachine_light_client::{
    client_state::ClientState as SoloMachineClientState,
    consensus_state::ConsensusState as SoloMachineConsensusState,
    header::Header as SoloMachineHeader, misbehaviour::Misbehaviour as SoloMachineMisbehaviour,
};

use crate::{
    client_type::ClientType,
    error::ClientError,
    mock::{MockClientState, MockConsensusState, MockHeader, MockMisbehaviour},
};

/// Type URL of [`SoloMachineClientState`]
pub const SOLOMACHINE_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.solomachine.v1.ClientState";
/// Type URL of [`SoloMachineConsensusState`]
pub const SOLOMACHINE_CONSENSUS_STATE_TYPE_URL: &str =
    "/ibc.lightclients.solomachine.v1.ConsensusState";
/// Type URL of [`SoloMachineHeader`]
pub const SOLOMACHINE_HEADER_TYPE_URL: &str = "/ibc.lightclients.solomachine.v1.Header";
/// Type URL of [`SoloMachineMisbehaviour`]
pub const SOLOMACHINE_MISBEHAVIOUR_TYPE_URL: &str = "/ibc.lightclients.solomachine.v1.Misbehaviour";

/// Type URL of [`MockClientState`]
pub const MOCK_CLIENT_STATE_TYPE_URL: &str = "/ibc.mock.ClientState";
/// Type URL of [`MockConsensusState`]
pub const MOCK_CONSENSUS_STATE_TYPE_URL: &str = "/ibc.mock.ConsensusState";
/// Type URL of [`MockHeader`]
pub const MOCK_HEADER_TYPE_URL: &str = "/ibc.mock.Header";
/// Type URL of [`MockMisbehaviour`]
pub const MOCK_MISBEHAVIOUR_TYPE_URL: &str = "/ibc.mock.Misbehaviour";

/// Generates an `Any*` enum with one variant per client type, conversions
/// from the concrete types and packing into and out of [`Any`].
macro_rules! any_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            SoloMachine($solo:ty) = $solo_url:ident,
            Mock($mock:ty) = $mock_url:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(tag = "type", content = "value")]
        pub enum $name {
            /// Solo machine variant
            SoloMachine($solo),
            /// Mock variant
            Mock($mock),
        }

        impl $name {
            /// Client type of the variant
            #[must_use]
            pub const fn client_type(&self) -> ClientType {
                match self {
                    Self::SoloMachine(_) => ClientType::SoloMachine,
                    Self::Mock(_) => ClientType::Mock,
                }
            }

            /// Type URL of the variant
            #[must_use]
            pub const fn type_url(&self) -> &'static str {
                match self {
                    Self::SoloMachine(_) => $solo_url,
                    Self::Mock(_) => $mock_url,
                }
            }

            /// Wraps the inner value in an [`Any`]
            /// # Errors
            /// Returns an error if the inner value cannot be serialized
            pub fn to_any(&self) -> Result<Any, ClientError> {
                match self {
                    Self::SoloMachine(inner) => Any::pack(self.type_url(), inner),
                    Self::Mock(inner) => Any::pack(self.type_url(), inner),
                }
                .map_err(|source| ClientError::Encode {
                    type_url: self.type_url().to_string(),
                    source,
                })
            }
        }

        impl TryFrom<&Any> for $name {
            type Error = ClientError;

            fn try_from(any: &Any) -> Result<Self, Self::Error> {
                let decode_err = |source| ClientError::Decode {
                    type_url: any.type_url.clone(),
                    source,
                };
                match any.type_url.as_str() {
                    $solo_url => any.unpack().map(Self::SoloMachine).map_err(decode_err),
                    $mock_url => any.unpack().map(Self::Mock).map_err(decode_err),
                    _ => Err(ClientError::UnknownTypeUrl {
                        type_url: any.type_url.clone(),
                    }),
                }
            }
        }

        impl From<$solo> for $name {
            fn from(inner: $solo) -> Self {
                Self::SoloMachine(inner)
            }
        }

        impl From<$mock> for $name {
            fn from(inner: $mock) -> Self {
                Self::Mock(inner)
            }
        }
    };
}

any_enum! {
    /// Client state of any registered client type
    AnyClientState {
        SoloMachine(SoloMachineClientState) = SOLOMACHINE_CLIENT_STATE_TYPE_URL,
        Mock(MockClientState) = MOCK_CLIENT_STATE_TYPE_URL,
    }
}

any_enum! {
    /// Consensus state of any registered client type
    AnyConsensusState {
        SoloMachine(SoloMachineConsensusState) = SOLOMACHINE_CONSENSUS_STATE_TYPE_URL,
        Mock(MockConsensusState) = MOCK_CONSENSUS_STATE_TYPE_URL,
    }
}

any_enum! {
    /// Header of any registered client type
    AnyHeader {
        SoloMachine(SoloMachineHeader) = SOLOMACHINE_HEADER_TYPE_URL,
        Mock(MockHeader) = MOCK_HEADER_TYPE_URL,
    }
}

any_enum! {
    /// Misbehaviour of any registered client type
    AnyMisbehaviour {
        SoloMachine(SoloMachineMisbehaviour) = SOLOMACHINE_MISBEHAVIOUR_TYPE_URL,
        Mock(MockMisbehaviour) = MOCK_MISBEHAVIOUR_TYPE_URL,
    }
}

impl AnyClientState {
    /// Latest height of the client
    #[must_use]
    pub const fn latest_height(&self) -> u64 {
        match self {
            Self::SoloMachine(cs) => cs.latest_height(),
            Self::Mock(cs) => cs.latest_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use solomachine_light_client::test_utils::{genesis_consensus_state, secp256k1_signer};

    use super::*;

    #[test]
    fn packs_and_unpacks_by_type_url() {
        let cns = AnyConsensusState::from(genesis_consensus_state(&secp256k1_signer()));
        let any = cns.to_any().unwrap();
        assert_eq!(any.type_url, SOLOMACHINE_CONSENSUS_STATE_TYPE_URL);
        assert_eq!(AnyConsensusState::try_from(&any).unwrap(), cns);

        let mock = AnyHeader::from(MockHeader {
            height: 2,
            timestamp: 3,
        });
        let any = mock.to_any().unwrap();
        assert_eq!(any.type_url, MOCK_HEADER_TYPE_URL);
        assert_eq!(AnyHeader::try_from(&any).unwrap().client_type(), ClientType::Mock);
    }

    #[test]
    fn unknown_type_url_is_rejected() {
        let any = Any {
            type_url: "/ibc.lightclients.tendermint.v1.Header".into(),
            value: b"{}".to_vec(),
        };
        assert!(matches!(
            AnyHeader::try_from(&any),
            Err(ClientError::UnknownTypeUrl { .. })
        ));
    }

    #[test]
    fn value_of_wrong_type_is_decode_error() {
        let any = Any::pack(
            SOLOMACHINE_HEADER_TYPE_URL,
            &MockHeader {
                height: 1,
                timestamp: 1,
            },
        )
        .unwrap();
        assert!(matches!(
            AnyHeader::try_from(&any),
            Err(ClientError::Decode { .. })
        ));
    }
}
