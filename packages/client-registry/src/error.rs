//! Error types for the client registry and keeper

use solomachine_light_client::{client_state::Status, error::SoloMachineError};
use thiserror::Error;

use crate::{client_type::ClientType, mock::MockClientError};

/// Main error type for registry, keeper and service operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Client type tag is not one of the known types
    #[error("unknown client type: {client_type}")]
    UnknownClientType {
        /// Unrecognized tag
        client_type: String,
    },

    /// Client type is known but not allowed by the registry configuration
    #[error("client type {0} is not allowed")]
    ClientTypeNotAllowed(ClientType),

    /// A state or message of one client type was passed to another
    #[error("invalid client type: expected {expected}, found {found}")]
    InvalidClientType {
        /// Type of the stored client
        expected: ClientType,
        /// Type of the submitted value
        found: ClientType,
    },

    /// No client is stored under the id
    #[error("client {0} not found")]
    ClientNotFound(String),

    /// No consensus state is stored for the client at the height
    #[error("consensus state for client {client_id} at height {height} not found")]
    ConsensusStateNotFound {
        /// Client identifier
        client_id: String,
        /// Requested height
        height: u64,
    },

    /// `Any` type URL is not registered
    #[error("unknown type url {type_url}")]
    UnknownTypeUrl {
        /// Unrecognized type URL
        type_url: String,
    },

    /// `Any` value does not decode as the type its URL names
    #[error("failed to decode {type_url}: {source}")]
    Decode {
        /// Type URL of the `Any`
        type_url: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// Value cannot be packed into an `Any`
    #[error("failed to encode {type_url}: {source}")]
    Encode {
        /// Type URL of the `Any`
        type_url: String,
        /// Underlying encode error
        #[source]
        source: serde_json::Error,
    },

    /// Client identifier is malformed
    #[error("invalid client identifier {0}")]
    InvalidClientId(String),

    /// Client has expired and accepts no further messages
    #[error("cannot operate on client {client_id} with status {status}")]
    ClientNotActive {
        /// Client identifier
        client_id: String,
        /// Current status of the client
        status: Status,
    },

    /// Solo machine client rejected the operation
    #[error(transparent)]
    SoloMachine(#[from] SoloMachineError),

    /// Mock client rejected the operation
    #[error(transparent)]
    Mock(#[from] MockClientError),
}
