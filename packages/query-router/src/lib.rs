#![doc = "In-process router for IBC query and message paths"]
#![deny(clippy::nursery, clippy::pedantic, missing_docs)]

pub mod any;
pub mod base64;
pub mod error;
pub mod interface;
pub mod router;

pub use any::Any;
pub use error::{BoxError, RouterError, UnpackError};
pub use interface::{InterfaceRegistry, UnpackInterfaces};
pub use router::{QueryRouter, RequestQuery, ResponseQuery, Route, ServiceDesc};
