//! Registry configuration, loaded from TOML

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client_type::ClientType;

/// Default trusting period of new mock clients: two weeks in seconds
pub const DEFAULT_MOCK_TRUSTING_PERIOD: u64 = 14 * 24 * 60 * 60;

/// Configuration the [`crate::registry::ClientRegistry`] is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Client types that may be created and operated on
    pub allowed_clients: Vec<ClientType>,
    /// Governance flag set on newly created solo machine clients
    pub allow_update_after_proposal: bool,
    /// Trusting period of newly created mock clients, in seconds
    pub mock_trusting_period: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            allowed_clients: ClientType::ALL.to_vec(),
            allow_update_after_proposal: false,
            mock_trusting_period: DEFAULT_MOCK_TRUSTING_PERIOD,
        }
    }
}

impl RegistryConfig {
    /// Load a `RegistryConfig` from a TOML file on disk. Absent fields take
    /// their default value.
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .map_err(|e| ConfigError::Io(path_ref.display().to_string(), e))?;
        let cfg = toml::from_str(&contents)?;
        Ok(cfg)
    }

    /// Whether `client_type` is allowed
    #[must_use]
    pub fn is_allowed(&self, client_type: ClientType) -> bool {
        self.allowed_clients.contains(&client_type)
    }
}

/// Errors that can occur loading the registry config
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File cannot be read
    #[error("I/O error reading `{0}`: {1}")]
    Io(String, #[source] std::io::Error),

    /// File is not a valid config
    #[error("invalid TOML in config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_full_config() {
        let file = write_config(
            r#"
allowed_clients = ["06-solomachine"]
allow_update_after_proposal = true
mock_trusting_period = 60
"#,
        );
        let cfg = RegistryConfig::from_file(file.path()).unwrap();
        assert_eq!(
            cfg,
            RegistryConfig {
                allowed_clients: vec![ClientType::SoloMachine],
                allow_update_after_proposal: true,
                mock_trusting_period: 60,
            }
        );
        assert!(cfg.is_allowed(ClientType::SoloMachine));
        assert!(!cfg.is_allowed(ClientType::Mock));
    }

    #[test]
    fn empty_file_is_default() {
        let file = write_config("");
        assert_eq!(
            RegistryConfig::from_file(file.path()).unwrap(),
            RegistryConfig::default()
        );
    }

    #[test]
    fn unknown_client_type_is_rejected() {
        let file = write_config(r#"allowed_clients = ["07-tendermint"]"#);
        assert!(matches!(
            RegistryConfig::from_file(file.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.toml");
        assert!(matches!(
            RegistryConfig::from_file(&path),
            Err(ConfigError::Io(p, _)) if p.ends_with("registry.toml")
        ));
    }
}
