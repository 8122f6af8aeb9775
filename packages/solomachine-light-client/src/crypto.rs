//! Public keys and signature verification for solo machine signers

use core::fmt;

use k256::ecdsa::signature::Verifier as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signature schemes a solo machine may sign with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScheme {
    /// ECDSA over secp256k1 with SHA-256 message hashing, 64-byte `r || s` signatures
    Secp256k1,
    /// Ed25519, 64-byte signatures
    Ed25519,
}

impl KeyScheme {
    /// Single byte tag used when a key is committed to in sign bytes
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Secp256k1 => 1,
            Self::Ed25519 => 2,
        }
    }
}

impl fmt::Display for KeyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secp256k1 => write!(f, "secp256k1"),
            Self::Ed25519 => write!(f, "ed25519"),
        }
    }
}

impl core::str::FromStr for KeyScheme {
    type Err = UnknownKeyScheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1" => Ok(Self::Secp256k1),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(UnknownKeyScheme(other.to_string())),
        }
    }
}

/// Name that is not a [`KeyScheme`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown key scheme {0}, expected secp256k1 or ed25519")]
pub struct UnknownKeyScheme(pub String);

/// Low level signature failure. Always wrapped by a client error before it
/// reaches a caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Public key bytes are not a valid key for the scheme
    #[error("malformed {scheme} public key")]
    MalformedPublicKey {
        /// Scheme the key was parsed as
        scheme: KeyScheme,
    },

    /// Signature bytes are not a valid signature for the scheme
    #[error("malformed {scheme} signature")]
    MalformedSignature {
        /// Scheme the signature was parsed as
        scheme: KeyScheme,
    },

    /// Signature is well formed but does not verify
    #[error("signature does not match message and public key")]
    VerificationFailed,
}

/// Public key of a solo machine, kept as raw bytes tagged with their scheme
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    /// Signature scheme of the key
    pub scheme: KeyScheme,
    /// SEC1 encoded point for secp256k1, 32 bytes for ed25519
    #[serde(with = "hex::serde")]
    pub key: Vec<u8>,
}

impl PublicKey {
    /// Wraps raw key bytes
    #[must_use]
    pub const fn new(scheme: KeyScheme, key: Vec<u8>) -> Self {
        Self { scheme, key }
    }

    /// Checks that the key bytes parse for the scheme
    /// # Errors
    /// Returns [`SignatureError::MalformedPublicKey`] if they do not
    pub fn validate(&self) -> Result<(), SignatureError> {
        match self.scheme {
            KeyScheme::Secp256k1 => self.secp256k1().map(|_| ()),
            KeyScheme::Ed25519 => self.ed25519().map(|_| ()),
        }
    }

    /// Encoding committed to in header sign bytes: scheme tag followed by the key
    #[must_use]
    pub fn to_tagged_bytes(&self) -> Vec<u8> {
        let mut bz = Vec::with_capacity(1 + self.key.len());
        bz.push(self.scheme.tag());
        bz.extend_from_slice(&self.key);
        bz
    }

    fn secp256k1(&self) -> Result<k256::ecdsa::VerifyingKey, SignatureError> {
        k256::ecdsa::VerifyingKey::from_sec1_bytes(&self.key).map_err(|_| {
            SignatureError::MalformedPublicKey {
                scheme: KeyScheme::Secp256k1,
            }
        })
    }

    fn ed25519(&self) -> Result<ed25519_dalek::VerifyingKey, SignatureError> {
        let malformed = SignatureError::MalformedPublicKey {
            scheme: KeyScheme::Ed25519,
        };
        let bytes: &[u8; ed25519_dalek::PUBLIC_KEY_LENGTH] =
            self.key.as_slice().try_into().map_err(|_| malformed.clone())?;
        ed25519_dalek::VerifyingKey::from_bytes(bytes).map_err(|_| malformed)
    }
}

/// Verifies `signature` over `message` with `public_key`.
///
/// Secp256k1 signatures must be the 64-byte fixed encoding and low-S
/// normalized. Ed25519 signatures are verified strictly.
/// # Errors
/// Returns an error if the key or signature is malformed or the signature does not verify
pub fn verify_signature(
    public_key: &PublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), SignatureError> {
    match public_key.scheme {
        KeyScheme::Secp256k1 => {
            let key = public_key.secp256k1()?;
            let sig = k256::ecdsa::Signature::from_slice(signature).map_err(|_| {
                SignatureError::MalformedSignature {
                    scheme: KeyScheme::Secp256k1,
                }
            })?;
            key.verify(message, &sig)
                .map_err(|_| SignatureError::VerificationFailed)
        }
        KeyScheme::Ed25519 => {
            let key = public_key.ed25519()?;
            let sig = ed25519_dalek::Signature::from_slice(signature).map_err(|_| {
                SignatureError::MalformedSignature {
                    scheme: KeyScheme::Ed25519,
                }
            })?;
            key.verify_strict(message, &sig)
                .map_err(|_| SignatureError::VerificationFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::signer::SoloMachineSigner;
    use crate::test_utils::{ed25519_signer, other_signer, secp256k1_signer};

    #[rstest]
    #[case::secp256k1(KeyScheme::Secp256k1)]
    #[case::ed25519(KeyScheme::Ed25519)]
    fn scheme_name_round_trips(#[case] scheme: KeyScheme) {
        assert_eq!(scheme.to_string().parse::<KeyScheme>(), Ok(scheme));
    }

    #[test]
    fn unknown_scheme_name_is_rejected() {
        assert_eq!(
            "sr25519".parse::<KeyScheme>(),
            Err(UnknownKeyScheme("sr25519".into()))
        );
    }

    #[rstest]
    #[case::secp256k1(secp256k1_signer())]
    #[case::ed25519(ed25519_signer())]
    fn verifies_own_signature(#[case] signer: SoloMachineSigner) {
        let sig = signer.sign(b"hello");
        assert_eq!(verify_signature(&signer.public_key(), b"hello", &sig), Ok(()));
    }

    #[rstest]
    #[case::secp256k1(secp256k1_signer())]
    #[case::ed25519(ed25519_signer())]
    fn rejects_other_message(#[case] signer: SoloMachineSigner) {
        let sig = signer.sign(b"hello");
        assert_eq!(
            verify_signature(&signer.public_key(), b"hellO", &sig),
            Err(SignatureError::VerificationFailed)
        );
    }

    #[test]
    fn rejects_signature_from_other_key() {
        let sig = other_signer().sign(b"hello");
        assert_eq!(
            verify_signature(&secp256k1_signer().public_key(), b"hello", &sig),
            Err(SignatureError::VerificationFailed)
        );
    }

    #[rstest]
    #[case::secp256k1(KeyScheme::Secp256k1)]
    #[case::ed25519(KeyScheme::Ed25519)]
    fn empty_key_is_malformed(#[case] scheme: KeyScheme) {
        let pk = PublicKey::new(scheme, vec![]);
        assert_eq!(
            pk.validate(),
            Err(SignatureError::MalformedPublicKey { scheme })
        );
        assert_eq!(
            verify_signature(&pk, b"hello", &[0; 64]),
            Err(SignatureError::MalformedPublicKey { scheme })
        );
    }

    #[rstest]
    #[case::secp256k1(secp256k1_signer())]
    #[case::ed25519(ed25519_signer())]
    fn truncated_signature_is_malformed(#[case] signer: SoloMachineSigner) {
        let pk = signer.public_key();
        let mut sig = signer.sign(b"hello");
        sig.truncate(63);
        assert_eq!(
            verify_signature(&pk, b"hello", &sig),
            Err(SignatureError::MalformedSignature { scheme: pk.scheme })
        );
    }

    #[test]
    fn public_key_serializes_as_hex() {
        let pk = PublicKey::new(KeyScheme::Ed25519, vec![0xab; 32]);
        let json = serde_json::to_value(&pk).unwrap();
        assert_eq!(json["scheme"], "ed25519");
        assert_eq!(json["key"], "ab".repeat(32));
        let back: PublicKey = serde_json::from_value(json).unwrap();
        assert_eq!(back, pk);
    }
}
