#![doc = "Solo machine light client for IBC"]
#![deny(clippy::nursery, clippy::pedantic, missing_docs)]

pub mod client_state;
pub mod consensus_state;
pub mod crypto;
pub mod error;
pub mod header;
pub mod membership;
pub mod misbehaviour;
pub mod proof;
pub mod sign_bytes;
pub mod signer;
pub mod update;
pub mod verify;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
