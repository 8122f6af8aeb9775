//! Serde helpers encoding byte fields as standard base64 strings

use base64::prelude::*;
use serde::{de, Deserialize, Deserializer, Serializer};

/// Serializes bytes as a base64 string
/// # Errors
/// Returns the serializer's error
pub fn serialize<S, T: AsRef<[u8]>>(data: T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&BASE64_STANDARD.encode(data))
}

/// Deserializes a base64 string into bytes
/// # Errors
/// Returns an error if the input is not valid base64
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<Vec<u8>>,
{
    let s = String::deserialize(deserializer)?;
    let decoded = BASE64_STANDARD
        .decode(s.as_bytes())
        .map_err(de::Error::custom)?;
    T::try_from(decoded).map_err(|_| de::Error::custom("Invalid base64 data"))
}
