//! AEAD adapter over a remote KMS key.
//!
//! The wrapped protocol has no associated-data parameter. Associated data
//! is therefore hex-encoded into the request's encryption context, which
//! the service authenticates as part of the ciphertext. Empty associated
//! data omits the context entirely, so "none" and "empty" are the same.

use std::sync::Arc;

use tracing::{trace, warn};

use super::{
    DecryptRequest, EncryptRequest, EncryptionContext, EncryptionContextName, KmsBackend,
};
use crate::core::aead::Aead;
use crate::core::scope::CallScope;
use crate::error::Result;

/// [`Aead`] backed by a single remote key.
///
/// Holds no per-call state; one instance may be shared across threads.
/// Every call runs under the scope given at construction.
#[derive(Debug, Clone)]
pub struct RemoteAead {
    scope: CallScope,
    key_id: String,
    backend: Arc<dyn KmsBackend>,
    context_name: EncryptionContextName,
}

impl RemoteAead {
    /// Bind an adapter to `key_id` (the ARN, without the `aws-kms://`
    /// scheme).
    pub fn new(
        scope: CallScope,
        key_id: impl Into<String>,
        backend: Arc<dyn KmsBackend>,
        context_name: EncryptionContextName,
    ) -> Self {
        Self {
            scope,
            key_id: key_id.into(),
            backend,
            context_name,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn context_name(&self) -> EncryptionContextName {
        self.context_name
    }

    pub fn scope(&self) -> &CallScope {
        &self.scope
    }

    /// Encryption context for `associated_data`, or `None` when it is empty.
    pub fn encryption_context(&self, associated_data: &[u8]) -> Option<EncryptionContext> {
        if associated_data.is_empty() {
            return None;
        }
        let mut context = EncryptionContext::new();
        context.insert(
            self.context_name.as_str().to_string(),
            hex::encode(associated_data),
        );
        Some(context)
    }
}

impl Aead for RemoteAead {
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>> {
        let request = EncryptRequest {
            key_id: &self.key_id,
            plaintext,
            encryption_context: self.encryption_context(associated_data),
        };

        trace!(
            key_id = %self.key_id,
            backend = self.backend.name(),
            plaintext_len = plaintext.len(),
            has_context = request.encryption_context.is_some(),
            "encrypting with remote key"
        );

        let ciphertext = self.backend.encrypt(&self.scope, request).inspect_err(|e| {
            warn!(key_id = %self.key_id, error = %e, "remote encrypt failed");
        })?;

        trace!(ciphertext_len = ciphertext.len(), "encrypted with remote key");
        Ok(ciphertext)
    }

    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>> {
        let request = DecryptRequest {
            key_id: &self.key_id,
            ciphertext_blob: ciphertext,
            encryption_context: self.encryption_context(associated_data),
        };

        trace!(
            key_id = %self.key_id,
            backend = self.backend.name(),
            ciphertext_len = ciphertext.len(),
            has_context = request.encryption_context.is_some(),
            "decrypting with remote key"
        );

        let plaintext = self.backend.decrypt(&self.scope, request).inspect_err(|e| {
            warn!(key_id = %self.key_id, error = %e, "remote decrypt failed");
        })?;

        trace!(plaintext_len = plaintext.len(), "decrypted with remote key");
        Ok(plaintext)
    }
}
