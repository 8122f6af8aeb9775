//! Error types for the query router

use thiserror::Error;

/// Boxed error returned by a method handler
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned while routing and handling a request
#[derive(Error, Debug)]
pub enum RouterError {
    /// No handler is registered for the path
    #[error("unknown query path: {path}")]
    RouteNotFound {
        /// Requested path
        path: String,
    },

    /// A handler is already registered for the path
    #[error("route {path} is already registered")]
    DuplicateRoute {
        /// Registered path
        path: String,
    },

    /// Request body or a nested `Any` value cannot be decoded
    #[error("failed to decode request for {path}: {source}")]
    Decode {
        /// Requested path
        path: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// A nested `Any` names a type the interface registry does not know
    #[error("no concrete type registered for {type_url} in request for {path}")]
    UnregisteredInterface {
        /// Requested path
        path: String,
        /// Type URL of the unregistered `Any`
        type_url: String,
    },

    /// Response cannot be encoded
    #[error("failed to encode response for {path}: {source}")]
    Encode {
        /// Requested path
        path: String,
        /// Underlying encode error
        #[source]
        source: serde_json::Error,
    },

    /// The handler rejected the request
    #[error("{path} failed: {source}")]
    Handler {
        /// Requested path
        path: String,
        /// Error returned by the handler
        #[source]
        source: BoxError,
    },
}

/// Errors returned by an [`crate::InterfaceRegistry`] when resolving an `Any`
#[derive(Error, Debug)]
pub enum UnpackError {
    /// Type URL is not registered
    #[error("no concrete type registered for type url {type_url}")]
    UnregisteredTypeUrl {
        /// Type URL of the `Any`
        type_url: String,
    },

    /// Value does not decode as the registered type
    #[error("failed to decode {type_url}: {source}")]
    Decode {
        /// Type URL of the `Any`
        type_url: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },
}
