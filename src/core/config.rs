//! Configuration file management.
//!
//! Reads and validates the TOML file listing the KMS clients to register:
//!
//! ```toml
//! [[client]]
//! key_uri = "aws-kms://arn:aws:kms:us-east-2:235739564943:"
//! region = "us-east-2"
//! context_name = "associatedData"
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cipher::EncryptionContextName;
use crate::core::client::AwsKmsClient;
use crate::core::constants;
use crate::core::key_uri;
use crate::core::registry::KmsClientRegistry;
use crate::core::scope::CallScope;
use crate::error::{ConfigError, Result};

/// Top-level configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Clients in registration order.
    #[serde(default, rename = "client")]
    pub clients: Vec<ClientConfig>,
}

/// One KMS client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Key URI, or a prefix covering several keys.
    ///
    /// - one key: `aws-kms://arn:aws:kms:us-east-2:123456789012:key/abc`
    /// - every key in a region: `aws-kms://arn:aws:kms:us-east-2:123456789012:`
    pub key_uri: String,
    /// AWS region; taken from `key_uri` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Named AWS profile for the credential chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Encryption context key for associated data.
    #[serde(default)]
    pub context_name: EncryptionContextName,
    /// Deadline, in seconds from client creation, for every call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn new(key_uri: impl Into<String>) -> Self {
        Self {
            key_uri: key_uri.into(),
            region: None,
            profile: None,
            context_name: EncryptionContextName::default(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Config path from `KMS_AEAD_CONFIG`, else the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(constants::CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join(constants::CONFIG_FILE))
    }

    /// Load from `path`, or from [`default_path`](Self::default_path).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist,
    /// `ConfigError::Parse` if the TOML is malformed, or a validation error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path().ok_or_else(|| ConfigError::InvalidValue {
                field: "config",
                reason: "no config directory on this platform".to_string(),
            })?,
        };
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotFound(path).into());
        }
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let config = Self::parse(&contents)?;

        debug!(clients = config.clients.len(), "config loaded");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Checks:
    /// - At least one client exists
    /// - Every key URI has the `aws-kms://` scheme
    /// - Timeouts are non-zero
    pub fn validate(&self) -> Result<()> {
        if self.clients.is_empty() {
            return Err(ConfigError::NoClients.into());
        }

        for client in &self.clients {
            if key_uri::validate(&client.key_uri).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: "key_uri",
                    reason: format!(
                        "{} must start with {}",
                        client.key_uri,
                        constants::AWS_KMS_SCHEME
                    ),
                }
                .into());
            }
            if client.timeout_secs == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: "timeout_secs",
                    reason: format!("must be positive for {}", client.key_uri),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Use `name` for every client, overriding the file.
    pub fn force_context_name(&mut self, name: EncryptionContextName) {
        for client in &mut self.clients {
            client.context_name = name;
        }
    }

    /// Build a registry with one client per entry, in file order.
    pub fn registry(&self, scope: &CallScope) -> Result<KmsClientRegistry> {
        let registry = KmsClientRegistry::new();
        for client in &self.clients {
            registry.register(Arc::new(AwsKmsClient::from_config(client, scope)?));
        }
        Ok(registry)
    }
}
