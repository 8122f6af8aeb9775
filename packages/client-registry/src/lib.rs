#![doc = "Registry, keeper and services for IBC light clients"]
#![deny(clippy::nursery, clippy::pedantic, missing_docs)]

pub mod any;
pub mod client_type;
pub mod config;
pub mod error;
pub mod interface_registry;
pub mod keeper;
pub mod light_client;
pub mod mock;
pub mod registry;
pub mod services;

pub use any::{AnyClientState, AnyConsensusState, AnyHeader, AnyMisbehaviour};
pub use client_type::ClientType;
pub use config::RegistryConfig;
pub use error::ClientError;
pub use keeper::{ClientKeeper, ClientStore, MemoryClientStore};
pub use registry::ClientRegistry;
