//! Path-keyed routing table dispatching JSON requests to typed handlers

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    error::{BoxError, RouterError, UnpackError},
    interface::{InterfaceRegistry, UnpackInterfaces},
};

/// Request routed by [`QueryRouter::handle`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestQuery {
    /// `/{service}/{method}`
    pub path: String,
    /// JSON encoded request body
    #[serde(with = "crate::base64")]
    pub data: Vec<u8>,
    /// Height the query is made at, echoed back in the response
    #[serde(default)]
    pub height: u64,
}

/// Response to a [`RequestQuery`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseQuery {
    /// Height of the request
    pub height: u64,
    /// JSON encoded response body
    #[serde(with = "crate::base64")]
    pub value: Vec<u8>,
}

enum Failure {
    Decode(serde_json::Error),
    Unpack(UnpackError),
    Handler(BoxError),
    Encode(serde_json::Error),
}

impl Failure {
    fn at(self, path: &str) -> RouterError {
        let path = path.to_string();
        match self {
            Self::Decode(source)
            | Self::Unpack(UnpackError::Decode { source, .. }) => RouterError::Decode { path, source },
            Self::Unpack(UnpackError::UnregisteredTypeUrl { type_url }) => {
                RouterError::UnregisteredInterface { path, type_url }
            }
            Self::Handler(source) => RouterError::Handler { path, source },
            Self::Encode(source) => RouterError::Encode { path, source },
        }
    }
}

type ErasedHandler<C> = Box<
    dyn Fn(&mut C, &[u8], Option<&dyn InterfaceRegistry>) -> Result<Vec<u8>, Failure>
        + Send
        + Sync,
>;

struct MethodDesc<C> {
    name: &'static str,
    handler: ErasedHandler<C>,
}

/// A named group of methods registered on a [`QueryRouter`] in one go
pub struct ServiceDesc<C> {
    service_name: &'static str,
    methods: Vec<MethodDesc<C>>,
}

impl<C: 'static> ServiceDesc<C> {
    /// Empty service, e.g. `ibc.core.client.v1.Query`
    #[must_use]
    pub const fn new(service_name: &'static str) -> Self {
        Self {
            service_name,
            methods: Vec::new(),
        }
    }

    /// Adds a method served at `/{service_name}/{name}`.
    ///
    /// The request body is decoded as `Req`, its nested `Any` fields are
    /// resolved when the router has an interface registry, and the handler's
    /// response is encoded back to JSON.
    #[must_use]
    pub fn method<Req, Resp, E, F>(mut self, name: &'static str, handler: F) -> Self
    where
        Req: DeserializeOwned + UnpackInterfaces + 'static,
        Resp: Serialize + 'static,
        E: Into<BoxError> + 'static,
        F: Fn(&mut C, Req) -> Result<Resp, E> + Send + Sync + 'static,
    {
        let handler: ErasedHandler<C> = Box::new(
            move |ctx: &mut C, data: &[u8], registry: Option<&dyn InterfaceRegistry>| {
                let request: Req = serde_json::from_slice(data).map_err(Failure::Decode)?;
                if let Some(registry) = registry {
                    request
                        .unpack_interfaces(registry)
                        .map_err(Failure::Unpack)?;
                }
                let response = handler(ctx, request).map_err(|e| Failure::Handler(e.into()))?;
                serde_json::to_vec(&response).map_err(Failure::Encode)
            },
        );
        self.methods.push(MethodDesc { name, handler });
        self
    }
}

impl<C> ServiceDesc<C> {
    fn path(&self, method: &str) -> String {
        format!("/{}/{method}", self.service_name)
    }
}

/// A handler looked up by [`QueryRouter::route`]
pub struct Route<'a, C> {
    path: &'a str,
    handler: &'a ErasedHandler<C>,
    interface_registry: Option<&'a dyn InterfaceRegistry>,
}

impl<C> Route<'_, C> {
    /// Path the handler is registered at
    #[must_use]
    pub const fn path(&self) -> &str {
        self.path
    }

    /// Runs the handler on a JSON encoded request body
    /// # Errors
    /// Returns an error if the body or a nested `Any` cannot be decoded, an
    /// `Any` is unregistered, or the handler fails
    pub fn call(&self, ctx: &mut C, data: &[u8]) -> Result<Vec<u8>, RouterError> {
        (self.handler)(ctx, data, self.interface_registry).map_err(|f| f.at(self.path))
    }
}

/// Routes requests by path to the handlers of registered services
pub struct QueryRouter<C> {
    routes: BTreeMap<String, ErasedHandler<C>>,
    interface_registry: Option<Arc<dyn InterfaceRegistry>>,
}

impl<C> fmt::Debug for QueryRouter<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryRouter")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .field("has_interface_registry", &self.interface_registry.is_some())
            .finish()
    }
}

impl<C> Default for QueryRouter<C> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<C> QueryRouter<C> {
    /// Creates an empty router. Without an interface registry nested `Any`
    /// fields are passed to handlers unchecked.
    #[must_use]
    pub fn new(interface_registry: Option<Arc<dyn InterfaceRegistry>>) -> Self {
        Self {
            routes: BTreeMap::new(),
            interface_registry,
        }
    }

    /// Replaces the interface registry used to resolve nested `Any` fields
    pub fn set_interface_registry(&mut self, interface_registry: Arc<dyn InterfaceRegistry>) {
        self.interface_registry = Some(interface_registry);
    }

    /// Registers every method of `service`. Nothing is registered if any of
    /// its paths is taken.
    /// # Errors
    /// Returns [`RouterError::DuplicateRoute`] on the first path already registered
    pub fn register_service(&mut self, service: ServiceDesc<C>) -> Result<(), RouterError> {
        let paths = service
            .methods
            .iter()
            .map(|method| service.path(method.name))
            .collect::<Vec<_>>();

        for (i, path) in paths.iter().enumerate() {
            if self.routes.contains_key(path) || paths[..i].contains(path) {
                return Err(RouterError::DuplicateRoute { path: path.clone() });
            }
        }

        for (path, method) in paths.into_iter().zip(service.methods) {
            tracing::debug!(%path, "registered route");
            self.routes.insert(path, method.handler);
        }
        Ok(())
    }

    /// Looks up the handler registered at `path`
    #[must_use]
    pub fn route<'a>(&'a self, path: &'a str) -> Option<Route<'a, C>> {
        self.routes.get(path).map(|handler| Route {
            path,
            handler,
            interface_registry: self.interface_registry.as_deref(),
        })
    }

    /// Registered paths in lexical order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Routes `request` to its handler and wraps the result
    /// # Errors
    /// Returns [`RouterError::RouteNotFound`] for an unknown path, or the
    /// error of [`Route::call`]
    pub fn handle(&self, ctx: &mut C, request: &RequestQuery) -> Result<ResponseQuery, RouterError> {
        let Some(route) = self.route(&request.path) else {
            tracing::warn!(path = %request.path, "no route registered");
            return Err(RouterError::RouteNotFound {
                path: request.path.clone(),
            });
        };

        let value = route.call(ctx, &request.data).inspect_err(|e| {
            tracing::debug!(path = %request.path, error = %e, "request failed");
        })?;

        Ok(ResponseQuery {
            height: request.height,
            value,
        })
    }
}
