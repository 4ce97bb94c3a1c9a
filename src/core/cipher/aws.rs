//! AWS KMS backend.
//!
//! Calls AWS Key Management Service through the AWS SDK.
//! Enable with `--features aws`.
//!
//! ## Credentials
//!
//! Credentials come from the default AWS provider chain (environment,
//! shared config files, instance metadata), optionally narrowed to a named
//! profile. Nothing here reads credential files itself.
//!
//! ## Blocking
//!
//! The SDK is async; each call is driven to completion on a runtime owned
//! by the backend. Calling into it from inside an async task of another
//! tokio runtime panics, so async callers should use `spawn_blocking`.

use std::collections::HashMap;

use aws_sdk_kms::primitives::Blob;
use tokio::runtime::Runtime;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use super::{DecryptRequest, EncryptRequest, EncryptionContext, KmsBackend};
use crate::core::scope::CallScope;
use crate::error::{ConfigError, RemoteError, Result};

/// [`KmsBackend`] that talks to AWS KMS.
///
/// The SDK client is created on first use, so building the backend never
/// touches the network or the credential chain.
#[derive(Debug)]
pub struct SdkKms {
    region: Option<String>,
    profile: Option<String>,
    runtime: Runtime,
    client: OnceCell<aws_sdk_kms::Client>,
}

impl SdkKms {
    /// Create a backend for `region`, using `profile` if given.
    pub fn new(region: Option<String>, profile: Option<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("kms-aead-sdk")
            .enable_all()
            .build()
            .map_err(|e| {
                ConfigError::BackendUnavailable(format!("failed to create runtime: {}", e))
            })?;

        Ok(Self {
            region,
            profile,
            runtime,
            client: OnceCell::new(),
        })
    }

    /// Wrap an already configured SDK client.
    pub fn with_client(client: aws_sdk_kms::Client) -> Result<Self> {
        let backend = Self::new(None, None)?;
        backend
            .client
            .set(client)
            .map_err(|_| ConfigError::BackendUnavailable("client already set".into()))?;
        Ok(backend)
    }

    async fn client(&self) -> &aws_sdk_kms::Client {
        self.client
            .get_or_init(|| async {
                let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
                if let Some(region) = &self.region {
                    loader = loader.region(aws_config::Region::new(region.clone()));
                }
                if let Some(profile) = &self.profile {
                    loader = loader.profile_name(profile);
                }
                let config = loader.load().await;
                debug!(
                    region = ?config.region().map(|r| r.as_ref().to_string()),
                    profile = ?self.profile,
                    "loaded AWS KMS client config"
                );
                aws_sdk_kms::Client::new(&config)
            })
            .await
    }
}

fn to_sdk_context(context: Option<EncryptionContext>) -> Option<HashMap<String, String>> {
    context.map(|c| c.into_iter().collect())
}

impl KmsBackend for SdkKms {
    fn encrypt(&self, scope: &CallScope, request: EncryptRequest<'_>) -> Result<Vec<u8>> {
        scope.check()?;
        trace!(key_id = %request.key_id, "sending KMS Encrypt");

        self.runtime.block_on(async {
            let client = scope.run(self.client()).await?;
            let output = scope
                .run(
                    client
                        .encrypt()
                        .key_id(request.key_id)
                        .plaintext(Blob::new(request.plaintext))
                        .set_encryption_context(to_sdk_context(request.encryption_context))
                        .send(),
                )
                .await?
                .map_err(|e| RemoteError::new("Encrypt", e))?;

            let blob = output
                .ciphertext_blob()
                .ok_or_else(|| RemoteError::new("Encrypt", "no ciphertext returned"))?;
            Ok(blob.as_ref().to_vec())
        })
    }

    fn decrypt(&self, scope: &CallScope, request: DecryptRequest<'_>) -> Result<Vec<u8>> {
        scope.check()?;
        trace!(key_id = %request.key_id, "sending KMS Decrypt");

        self.runtime.block_on(async {
            let client = scope.run(self.client()).await?;
            let output = scope
                .run(
                    client
                        .decrypt()
                        .key_id(request.key_id)
                        .ciphertext_blob(Blob::new(request.ciphertext_blob))
                        .set_encryption_context(to_sdk_context(request.encryption_context))
                        .send(),
                )
                .await?
                .map_err(|e| RemoteError::new("Decrypt", e))?;

            let plaintext = output
                .plaintext()
                .ok_or_else(|| RemoteError::new("Decrypt", "no plaintext returned"))?;
            Ok(plaintext.as_ref().to_vec())
        })
    }

    fn name(&self) -> &'static str {
        "aws-kms"
    }
}
