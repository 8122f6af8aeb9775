//! Interface registry resolving the client `Any` types for the query router

use ibc_query_router::{Any, InterfaceRegistry, UnpackError};

use crate::{
    any::{AnyClientState, AnyConsensusState, AnyHeader, AnyMisbehaviour},
    error::ClientError,
};

/// Knows the type URLs of every client state, consensus state, header and
/// misbehaviour the registry can dispatch
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientInterfaceRegistry;

impl ClientInterfaceRegistry {
    /// Every type URL the registry resolves
    #[must_use]
    pub fn type_urls() -> Vec<&'static str> {
        use crate::any::{
            MOCK_CLIENT_STATE_TYPE_URL, MOCK_CONSENSUS_STATE_TYPE_URL, MOCK_HEADER_TYPE_URL,
            MOCK_MISBEHAVIOUR_TYPE_URL, SOLOMACHINE_CLIENT_STATE_TYPE_URL,
            SOLOMACHINE_CONSENSUS_STATE_TYPE_URL, SOLOMACHINE_HEADER_TYPE_URL,
            SOLOMACHINE_MISBEHAVIOUR_TYPE_URL,
        };
        vec![
            SOLOMACHINE_CLIENT_STATE_TYPE_URL,
            SOLOMACHINE_CONSENSUS_STATE_TYPE_URL,
            SOLOMACHINE_HEADER_TYPE_URL,
            SOLOMACHINE_MISBEHAVIOUR_TYPE_URL,
            MOCK_CLIENT_STATE_TYPE_URL,
            MOCK_CONSENSUS_STATE_TYPE_URL,
            MOCK_HEADER_TYPE_URL,
            MOCK_MISBEHAVIOUR_TYPE_URL,
        ]
    }
}

impl InterfaceRegistry for ClientInterfaceRegistry {
    fn resolve(&self, any: &Any) -> Result<(), UnpackError> {
        let attempts = [
            AnyClientState::try_from(any).map(|_| ()),
            AnyConsensusState::try_from(any).map(|_| ()),
            AnyHeader::try_from(any).map(|_| ()),
            AnyMisbehaviour::try_from(any).map(|_| ()),
        ];
        // at most one union knows the type URL
        for res in attempts {
            match res {
                Err(ClientError::UnknownTypeUrl { .. }) => {}
                Err(ClientError::Decode { type_url, source }) => {
                    return Err(UnpackError::Decode { type_url, source })
                }
                _ => return Ok(()),
            }
        }
        Err(UnpackError::UnregisteredTypeUrl {
            type_url: any.type_url.clone(),
        })
    }
}
