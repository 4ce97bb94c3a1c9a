//! KMS clients: turn key URIs into AEAD primitives.
//!
//! A client is configured for one key URI, or for a prefix covering many
//! keys (e.g. every key in an account and region). It owns the remote
//! backend, the call scope, and the context naming policy, and hands all
//! three to each adapter it builds.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::core::aead::Aead;
use crate::core::cipher::{EncryptionContextName, KmsBackend, RemoteAead};
use crate::core::config::ClientConfig;
use crate::core::key_uri;
use crate::core::scope::CallScope;
use crate::error::{KmsError, Result};

/// Resolves key URIs to AEAD primitives.
pub trait KmsClient: Send + Sync + fmt::Debug {
    /// Whether this client handles `key_uri`.
    fn supports(&self, key_uri: &str) -> bool;

    /// Build an AEAD bound to `key_uri`.
    ///
    /// # Errors
    ///
    /// Returns `KmsError::UnsupportedKey` if [`supports`](Self::supports)
    /// is false. No remote call is made.
    fn get_aead(&self, key_uri: &str) -> Result<Arc<dyn Aead>>;
}

/// Client for AWS KMS key URIs (`aws-kms://arn:...`).
#[derive(Debug, Clone)]
pub struct AwsKmsClient {
    key_uri_prefix: String,
    backend: Arc<dyn KmsBackend>,
    scope: CallScope,
    context_name: EncryptionContextName,
}

impl AwsKmsClient {
    /// Client for `key_uri_prefix` over an explicit backend, using the
    /// default context name and a background scope.
    pub fn new(key_uri_prefix: impl Into<String>, backend: Arc<dyn KmsBackend>) -> Result<Self> {
        Self::builder(key_uri_prefix).backend(backend).build()
    }

    pub fn builder(key_uri_prefix: impl Into<String>) -> AwsKmsClientBuilder {
        AwsKmsClientBuilder {
            key_uri_prefix: key_uri_prefix.into(),
            backend: None,
            scope: None,
            context_name: EncryptionContextName::default(),
            region: None,
            profile: None,
        }
    }

    /// Build a client from one `[[client]]` config entry.
    ///
    /// The scope gets the entry's timeout, if it has one.
    pub fn from_config(config: &ClientConfig, scope: &CallScope) -> Result<Self> {
        let scope = match config.timeout_secs {
            Some(secs) => scope.with_timeout(Duration::from_secs(secs)),
            None => scope.child(),
        };
        let mut builder = Self::builder(config.key_uri.clone())
            .scope(scope)
            .context_name(config.context_name);
        if let Some(region) = &config.region {
            builder = builder.region(region.clone());
        }
        if let Some(profile) = &config.profile {
            builder = builder.profile(profile.clone());
        }
        builder.build()
    }

    pub fn key_uri_prefix(&self) -> &str {
        &self.key_uri_prefix
    }

    pub fn context_name(&self) -> EncryptionContextName {
        self.context_name
    }

    pub fn scope(&self) -> &CallScope {
        &self.scope
    }

    /// The concrete adapter for `key_uri`.
    pub fn remote_aead(&self, key_uri: &str) -> Result<RemoteAead> {
        if !self.supports(key_uri) {
            return Err(KmsError::UnsupportedKey(key_uri.to_string()).into());
        }
        let key_id = key_uri::key_id(key_uri);
        debug!(
            key_id = %key_id,
            backend = self.backend.name(),
            context_name = %self.context_name,
            "creating remote AEAD"
        );
        Ok(RemoteAead::new(
            self.scope.clone(),
            key_id,
            self.backend.clone(),
            self.context_name,
        ))
    }
}

impl KmsClient for AwsKmsClient {
    fn supports(&self, key_uri: &str) -> bool {
        key_uri.starts_with(&self.key_uri_prefix)
    }

    fn get_aead(&self, key_uri: &str) -> Result<Arc<dyn Aead>> {
        Ok(Arc::new(self.remote_aead(key_uri)?))
    }
}

/// Builder for [`AwsKmsClient`].
#[derive(Debug)]
pub struct AwsKmsClientBuilder {
    key_uri_prefix: String,
    backend: Option<Arc<dyn KmsBackend>>,
    scope: Option<CallScope>,
    context_name: EncryptionContextName,
    region: Option<String>,
    profile: Option<String>,
}

impl AwsKmsClientBuilder {
    /// Use `backend` instead of the AWS SDK.
    pub fn backend(mut self, backend: Arc<dyn KmsBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Scope attached to every call made through the client's adapters.
    pub fn scope(mut self, scope: CallScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn context_name(mut self, name: EncryptionContextName) -> Self {
        self.context_name = name;
        self
    }

    /// AWS region. Defaults to the region in the key URI prefix.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Named AWS profile for the credential chain.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// - `KmsError::InvalidKeyUri` if the prefix lacks the `aws-kms://` scheme
    /// - `ConfigError::BackendUnavailable` if no backend was given and the
    ///   `aws` feature is off
    pub fn build(self) -> Result<AwsKmsClient> {
        key_uri::validate(&self.key_uri_prefix)?;

        let backend = match self.backend {
            Some(backend) => backend,
            None => sdk_backend(&self.key_uri_prefix, self.region, self.profile)?,
        };

        debug!(
            key_uri_prefix = %self.key_uri_prefix,
            backend = backend.name(),
            context_name = %self.context_name,
            "created KMS client"
        );

        Ok(AwsKmsClient {
            key_uri_prefix: self.key_uri_prefix,
            backend,
            scope: self.scope.unwrap_or_default(),
            context_name: self.context_name,
        })
    }
}

#[cfg(feature = "aws")]
fn sdk_backend(
    key_uri_prefix: &str,
    region: Option<String>,
    profile: Option<String>,
) -> Result<Arc<dyn KmsBackend>> {
    let region = region.or_else(|| key_uri::region(key_uri_prefix).map(str::to_string));
    Ok(Arc::new(crate::core::cipher::SdkKms::new(region, profile)?))
}

#[cfg(not(feature = "aws"))]
fn sdk_backend(
    _key_uri_prefix: &str,
    _region: Option<String>,
    _profile: Option<String>,
) -> Result<Arc<dyn KmsBackend>> {
    Err(crate::error::ConfigError::BackendUnavailable(
        "AWS support not compiled. Rebuild with: cargo install kms-aead --features aws".to_string(),
    )
    .into())
}
