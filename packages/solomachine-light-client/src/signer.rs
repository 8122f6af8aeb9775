//! Off-chain signing side of a solo machine.
//!
//! The verification code never needs a secret key; this module exists so the
//! solo machine operator (and tests) produce signatures over exactly the bytes
//! the client verifies.

use crate::{
    crypto::{KeyScheme, PublicKey, SignatureError},
    header::{Header, HeaderData},
    misbehaviour::SignatureAndData,
    proof::TimestampedSignatureData,
    sign_bytes::{misbehaviour_sign_bytes, DataType, SignBytes},
};

/// Secret key of a solo machine
#[derive(Clone)]
pub enum SoloMachineSigner {
    /// secp256k1 ECDSA key
    Secp256k1(k256::ecdsa::SigningKey),
    /// ed25519 key
    Ed25519(ed25519_dalek::SigningKey),
}

impl core::fmt::Debug for SoloMachineSigner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SoloMachineSigner")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl SoloMachineSigner {
    /// Builds a signer from 32 secret key bytes
    /// # Errors
    /// Returns [`SignatureError::MalformedPublicKey`] if the bytes are not a valid secret key
    pub fn from_secret_bytes(scheme: KeyScheme, secret: &[u8]) -> Result<Self, SignatureError> {
        let malformed = SignatureError::MalformedPublicKey { scheme };
        match scheme {
            KeyScheme::Secp256k1 => k256::ecdsa::SigningKey::from_slice(secret)
                .map(Self::Secp256k1)
                .map_err(|_| malformed),
            KeyScheme::Ed25519 => {
                let bytes: &[u8; ed25519_dalek::SECRET_KEY_LENGTH] =
                    secret.try_into().map_err(|_| malformed)?;
                Ok(Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(bytes)))
            }
        }
    }

    /// Scheme of the key
    #[must_use]
    pub const fn scheme(&self) -> KeyScheme {
        match self {
            Self::Secp256k1(_) => KeyScheme::Secp256k1,
            Self::Ed25519(_) => KeyScheme::Ed25519,
        }
    }

    /// Public key, compressed SEC1 for secp256k1
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        match self {
            Self::Secp256k1(sk) => PublicKey::new(
                KeyScheme::Secp256k1,
                sk.verifying_key().to_encoded_point(true).as_bytes().to_vec(),
            ),
            Self::Ed25519(sk) => {
                PublicKey::new(KeyScheme::Ed25519, sk.verifying_key().to_bytes().to_vec())
            }
        }
    }

    /// Signs raw message bytes
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match self {
            Self::Secp256k1(sk) => {
                use k256::ecdsa::signature::Signer as _;
                let sig: k256::ecdsa::Signature = sk.sign(message);
                sig.to_bytes().to_vec()
            }
            Self::Ed25519(sk) => {
                use ed25519_dalek::Signer as _;
                sk.sign(message).to_bytes().to_vec()
            }
        }
    }

    /// Signs `data` at `sequence` as one half of an equivocation proof
    #[must_use]
    pub fn sign_at_sequence(&self, sequence: u64, data: &[u8]) -> SignatureAndData {
        SignatureAndData {
            signature: self.sign(&misbehaviour_sign_bytes(sequence, data)),
            data: data.to_vec(),
        }
    }

    /// Produces a header rotating the client to `new_public_key`/`new_diversifier`.
    ///
    /// `diversifier` is the one currently stored on the client.
    #[must_use]
    pub fn sign_header(
        &self,
        sequence: u64,
        timestamp: u64,
        diversifier: &str,
        new_public_key: PublicKey,
        new_diversifier: String,
    ) -> Header {
        let data = HeaderData {
            new_public_key,
            new_diversifier,
        };
        let sign_bytes = SignBytes {
            sequence,
            timestamp,
            diversifier,
            data_type: DataType::Header,
            data: &data.encode(),
        };
        Header {
            sequence,
            timestamp,
            signature: self.sign(&sign_bytes.encode()),
            new_public_key: data.new_public_key,
            new_diversifier: data.new_diversifier,
        }
    }

    /// Produces a membership proof for `path`/`value`, or a non-membership
    /// proof when `value` is `None`
    #[must_use]
    pub fn sign_membership(
        &self,
        sequence: u64,
        timestamp: u64,
        diversifier: &str,
        path: &[u8],
        value: Option<&[u8]>,
    ) -> TimestampedSignatureData {
        let (data_type, data) = DataType::for_membership(path, value);
        let sign_bytes = SignBytes {
            sequence,
            timestamp,
            diversifier,
            data_type,
            data: &data,
        };
        TimestampedSignatureData {
            signature: self.sign(&sign_bytes.encode()),
            timestamp,
        }
    }
}
