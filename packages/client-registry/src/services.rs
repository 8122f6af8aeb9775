//! Query and message services of the client keeper, served through a
//! [`QueryRouter`]

use std::sync::Arc;

use ibc_query_router::{
    Any, InterfaceRegistry, QueryRouter, RouterError, ServiceDesc, UnpackError, UnpackInterfaces,
};
use serde::{Deserialize, Serialize};
use solomachine_light_client::client_state::Status;

use crate::{
    any::{AnyConsensusState, AnyHeader, AnyMisbehaviour},
    error::ClientError,
    interface_registry::ClientInterfaceRegistry,
    keeper::{ClientKeeper, ClientStore},
};

/// Query service name
pub const QUERY_SERVICE: &str = "ibc.core.client.v1.Query";
/// Message service name
pub const MSG_SERVICE: &str = "ibc.core.client.v1.Msg";

/// Request for the stored client state of a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStateRequest {
    /// Client identifier
    pub client_id: String,
}

/// Response carrying a packed client state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStateResponse {
    /// Packed client state
    pub client_state: Any,
}

/// Request for a stored consensus state of a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConsensusStateRequest {
    /// Client identifier
    pub client_id: String,
    /// Height the consensus state is stored at
    pub height: u64,
}

/// Response carrying a packed consensus state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConsensusStateResponse {
    /// Packed consensus state
    pub consensus_state: Any,
}

/// Request for the status of a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStatusRequest {
    /// Client identifier
    pub client_id: String,
}

/// Response carrying a client status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryClientStatusResponse {
    /// Status at the keeper's block time
    pub status: Status,
}

/// Creates a client from its genesis consensus state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateClient {
    /// Packed consensus state
    pub consensus_state: Any,
}

/// Response to [`MsgCreateClient`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateClientResponse {
    /// Identifier assigned to the new client
    pub client_id: String,
}

/// Updates a client with a header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateClient {
    /// Client identifier
    pub client_id: String,
    /// Packed header
    pub header: Any,
}

/// Response to [`MsgUpdateClient`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateClientResponse {
    /// Latest height of the client after the update
    pub height: u64,
}

/// Submits evidence of misbehaviour against a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitMisbehaviour {
    /// Client identifier
    pub client_id: String,
    /// Packed misbehaviour
    pub misbehaviour: Any,
}

/// Response to [`MsgSubmitMisbehaviour`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitMisbehaviourResponse {}

impl UnpackInterfaces for QueryClientStateRequest {}
impl UnpackInterfaces for QueryConsensusStateRequest {}
impl UnpackInterfaces for QueryClientStatusRequest {}

impl UnpackInterfaces for MsgCreateClient {
    fn unpack_interfaces(&self, registry: &dyn InterfaceRegistry) -> Result<(), UnpackError> {
        self.consensus_state.unpack_interfaces(registry)
    }
}

impl UnpackInterfaces for MsgUpdateClient {
    fn unpack_interfaces(&self, registry: &dyn InterfaceRegistry) -> Result<(), UnpackError> {
        self.header.unpack_interfaces(registry)
    }
}

impl UnpackInterfaces for MsgSubmitMisbehaviour {
    fn unpack_interfaces(&self, registry: &dyn InterfaceRegistry) -> Result<(), UnpackError> {
        self.misbehaviour.unpack_interfaces(registry)
    }
}

/// Read-only client queries
#[must_use]
pub fn query_service<S: ClientStore + 'static>() -> ServiceDesc<ClientKeeper<S>> {
    ServiceDesc::new(QUERY_SERVICE)
        .method(
            "ClientState",
            |keeper: &mut ClientKeeper<S>, req: QueryClientStateRequest| {
                let client_state = keeper.client_state(&req.client_id)?.to_any()?;
                Ok::<_, ClientError>(QueryClientStateResponse { client_state })
            },
        )
        .method(
            "ConsensusState",
            |keeper: &mut ClientKeeper<S>, req: QueryConsensusStateRequest| {
                let consensus_state = keeper
                    .consensus_state(&req.client_id, req.height)?
                    .to_any()?;
                Ok::<_, ClientError>(QueryConsensusStateResponse { consensus_state })
            },
        )
        .method(
            "ClientStatus",
            |keeper: &mut ClientKeeper<S>, req: QueryClientStatusRequest| {
                let status = keeper.client_status(&req.client_id)?;
                Ok::<_, ClientError>(QueryClientStatusResponse { status })
            },
        )
}

/// Client lifecycle messages
#[must_use]
pub fn msg_service<S: ClientStore + 'static>() -> ServiceDesc<ClientKeeper<S>> {
    ServiceDesc::new(MSG_SERVICE)
        .method(
            "CreateClient",
            |keeper: &mut ClientKeeper<S>, msg: MsgCreateClient| {
                let consensus_state = AnyConsensusState::try_from(&msg.consensus_state)?;
                let client_id = keeper.create_client(consensus_state)?;
                Ok::<_, ClientError>(MsgCreateClientResponse { client_id })
            },
        )
        .method(
            "UpdateClient",
            |keeper: &mut ClientKeeper<S>, msg: MsgUpdateClient| {
                let header = AnyHeader::try_from(&msg.header)?;
                let height = keeper.update_client(&msg.client_id, &header)?;
                Ok::<_, ClientError>(MsgUpdateClientResponse { height })
            },
        )
        .method(
            "SubmitMisbehaviour",
            |keeper: &mut ClientKeeper<S>, msg: MsgSubmitMisbehaviour| {
                let misbehaviour = AnyMisbehaviour::try_from(&msg.misbehaviour)?;
                keeper.submit_misbehaviour(&msg.client_id, &misbehaviour)?;
                Ok::<_, ClientError>(MsgSubmitMisbehaviourResponse {})
            },
        )
}

/// Router serving both client services, resolving nested `Any` fields with
/// [`ClientInterfaceRegistry`]
/// # Errors
/// Returns [`RouterError::DuplicateRoute`] if the services overlap
pub fn client_router<S: ClientStore + 'static>() -> Result<QueryRouter<ClientKeeper<S>>, RouterError>
{
    let mut router = QueryRouter::new(Some(Arc::new(ClientInterfaceRegistry)));
    router.register_service(query_service())?;
    router.register_service(msg_service())?;
    Ok(router)
}
