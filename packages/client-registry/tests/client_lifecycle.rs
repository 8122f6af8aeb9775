//! Client lifecycle driven end to end through the client router

use ibc_client_registry::{
    any::SOLOMACHINE_HEADER_TYPE_URL,
    services::{
        client_router, MsgCreateClient, MsgCreateClientResponse, MsgSubmitMisbehaviour,
        MsgSubmitMisbehaviourResponse, MsgUpdateClient, MsgUpdateClientResponse,
        QueryClientStateResponse, QueryClientStatusResponse, QueryConsensusStateResponse,
    },
    AnyClientState, AnyConsensusState, AnyHeader, AnyMisbehaviour, ClientError, ClientKeeper,
    ClientRegistry, ClientStore, MemoryClientStore,
};
use ibc_query_router::{Any, QueryRouter, RequestQuery, RouterError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use solomachine_light_client::{
    client_state::Status,
    error::SoloMachineError,
    test_utils::{equivocation, genesis_consensus_state, secp256k1_signer, DIVERSIFIER},
};

type Keeper = ClientKeeper<MemoryClientStore>;

struct Chain {
    router: QueryRouter<Keeper>,
    keeper: Keeper,
}

impl Chain {
    fn new() -> Self {
        Self {
            router: client_router().unwrap(),
            keeper: ClientKeeper::new(ClientRegistry::default(), MemoryClientStore::default()),
        }
    }

    fn raw(&mut self, path: &str, data: Vec<u8>) -> Result<Vec<u8>, RouterError> {
        let request = RequestQuery {
            path: path.to_string(),
            data,
            height: 12,
        };
        let response = self.router.handle(&mut self.keeper, &request)?;
        assert_eq!(response.height, 12);
        Ok(response.value)
    }

    fn call<Req: Serialize, Resp: DeserializeOwned>(
        &mut self,
        path: &str,
        req: &Req,
    ) -> Result<Resp, RouterError> {
        let value = self.raw(path, serde_json::to_vec(req).unwrap())?;
        Ok(serde_json::from_slice(&value).unwrap())
    }
}

fn handler_error(err: RouterError) -> ClientError {
    match err {
        RouterError::Handler { source, .. } => *source.downcast::<ClientError>().unwrap(),
        other => panic!("expected handler error, got {other}"),
    }
}

#[test]
fn solo_machine_client_lifecycle() {
    let mut chain = Chain::new();
    let signer = secp256k1_signer();
    let genesis = genesis_consensus_state(&signer);

    let created: MsgCreateClientResponse = chain
        .call(
            "/ibc.core.client.v1.Msg/CreateClient",
            &MsgCreateClient {
                consensus_state: AnyConsensusState::from(genesis.clone()).to_any().unwrap(),
            },
        )
        .unwrap();
    let client_id = created.client_id;
    assert_eq!(client_id, "06-solomachine-0");

    // rotate to a new diversifier at sequence 1
    let header = signer.sign_header(
        1,
        genesis.timestamp + 10,
        DIVERSIFIER,
        signer.public_key(),
        "rotated".into(),
    );
    let updated: MsgUpdateClientResponse = chain
        .call(
            "/ibc.core.client.v1.Msg/UpdateClient",
            &MsgUpdateClient {
                client_id: client_id.clone(),
                header: AnyHeader::from(header).to_any().unwrap(),
            },
        )
        .unwrap();
    assert_eq!(updated.height, 2);

    let consensus: QueryConsensusStateResponse = chain
        .call(
            "/ibc.core.client.v1.Query/ConsensusState",
            &json!({ "client_id": client_id, "height": 2 }),
        )
        .unwrap();
    let AnyConsensusState::SoloMachine(consensus) =
        AnyConsensusState::try_from(&consensus.consensus_state).unwrap()
    else {
        panic!("expected solo machine consensus state");
    };
    assert_eq!(consensus.diversifier, "rotated");

    // equivocation at the current sequence freezes the client
    let evidence = AnyMisbehaviour::from(equivocation(&signer, 2, b"msg-A", b"msg-B"));
    let msg = MsgSubmitMisbehaviour {
        client_id: client_id.clone(),
        misbehaviour: evidence.to_any().unwrap(),
    };
    let _: MsgSubmitMisbehaviourResponse = chain
        .call("/ibc.core.client.v1.Msg/SubmitMisbehaviour", &msg)
        .unwrap();

    let status: QueryClientStatusResponse = chain
        .call(
            "/ibc.core.client.v1.Query/ClientStatus",
            &json!({ "client_id": client_id }),
        )
        .unwrap();
    assert_eq!(status.status, Status::Frozen);

    let err = chain
        .call::<_, MsgSubmitMisbehaviourResponse>("/ibc.core.client.v1.Msg/SubmitMisbehaviour", &msg)
        .unwrap_err();
    assert!(matches!(
        handler_error(err),
        ClientError::SoloMachine(SoloMachineError::ClientFrozen)
    ));

    let state: QueryClientStateResponse = chain
        .call(
            "/ibc.core.client.v1.Query/ClientState",
            &json!({ "client_id": client_id }),
        )
        .unwrap();
    let AnyClientState::SoloMachine(state) = AnyClientState::try_from(&state.client_state).unwrap()
    else {
        panic!("expected solo machine client state");
    };
    assert!(state.is_frozen);
    assert_eq!(state.sequence, 2);
}

#[test]
fn unknown_route_is_rejected() {
    let mut chain = Chain::new();
    let err = chain
        .raw("/ibc.core.client.v1.Query/ClientStates", b"{}".to_vec())
        .unwrap_err();
    assert!(matches!(err, RouterError::RouteNotFound { path } if path.ends_with("ClientStates")));
}

#[test]
fn unregistered_any_is_rejected_before_the_handler() {
    let mut chain = Chain::new();
    let msg = MsgCreateClient {
        consensus_state: Any {
            type_url: "/ibc.lightclients.tendermint.v1.ConsensusState".into(),
            value: b"{}".to_vec(),
        },
    };
    let err = chain
        .call::<_, MsgCreateClientResponse>("/ibc.core.client.v1.Msg/CreateClient", &msg)
        .unwrap_err();
    assert!(matches!(err, RouterError::UnregisteredInterface { .. }));
    assert_eq!(chain.keeper.store().next_client_sequence(), 0);
}

#[test]
fn any_of_the_wrong_kind_fails_in_the_handler() {
    let mut chain = Chain::new();
    let signer = secp256k1_signer();
    let header = signer.sign_header(1, 1, DIVERSIFIER, signer.public_key(), "d".into());
    let any = Any::pack(SOLOMACHINE_HEADER_TYPE_URL, &header).unwrap();

    // a header is a registered interface, but not a consensus state
    let err = chain
        .call::<_, MsgCreateClientResponse>(
            "/ibc.core.client.v1.Msg/CreateClient",
            &MsgCreateClient { consensus_state: any },
        )
        .unwrap_err();
    assert!(matches!(
        handler_error(err),
        ClientError::UnknownTypeUrl { .. }
    ));
}

#[test]
fn malformed_body_is_decode_error() {
    let mut chain = Chain::new();
    let err = chain
        .raw("/ibc.core.client.v1.Msg/UpdateClient", b"{\"client_id\":".to_vec())
        .unwrap_err();
    assert!(matches!(err, RouterError::Decode { .. }));
}

#[test]
fn querying_a_missing_client() {
    let mut chain = Chain::new();
    let err = chain
        .call::<_, QueryClientStateResponse>(
            "/ibc.core.client.v1.Query/ClientState",
            &json!({ "client_id": "06-solomachine-9" }),
        )
        .unwrap_err();
    assert!(matches!(
        handler_error(err),
        ClientError::ClientNotFound(id) if id == "06-solomachine-9"
    ));
}
