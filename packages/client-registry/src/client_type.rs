//! Closed set of light client types known to the registry

use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Type of a light client, identified on the wire by its string tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClientType {
    /// Single key signer tracked by sequence
    #[serde(rename = "06-solomachine")]
    SoloMachine,
    /// Height based test client with a trusting period
    #[serde(rename = "9999-mock")]
    Mock,
}

impl ClientType {
    /// Every client type, in registration order
    pub const ALL: [Self; 2] = [Self::SoloMachine, Self::Mock];

    /// Yields the identifier of this client type as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SoloMachine => "06-solomachine",
            Self::Mock => "9999-mock",
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|client_type| client_type.as_str() == s)
            .ok_or_else(|| ClientError::UnknownClientType {
                client_type: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("06-solomachine", ClientType::SoloMachine)]
    #[case("9999-mock", ClientType::Mock)]
    fn parses_known_tags(#[case] tag: &str, #[case] expected: ClientType) {
        assert_eq!(tag.parse::<ClientType>().unwrap(), expected);
        assert_eq!(expected.to_string(), tag);
        assert_eq!(
            serde_json::to_string(&expected).unwrap(),
            format!("\"{tag}\"")
        );
    }

    #[rstest]
    #[case("")]
    #[case("07-tendermint")]
    #[case("06-SOLOMACHINE")]
    fn rejects_unknown_tags(#[case] tag: &str) {
        assert!(matches!(
            tag.parse::<ClientType>(),
            Err(ClientError::UnknownClientType { client_type }) if client_type == tag
        ));
    }
}
