//! In-memory KMS backend.
//!
//! Not cryptographically secure: ciphertext blobs carry the plaintext in
//! hex. It exists so the adapter can be exercised without a network, and
//! reproduces the checks the real service makes: ciphertexts are scoped to
//! the key that produced them, the encryption context must match exactly,
//! and tampered blobs are rejected.

use std::collections::HashSet;

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use super::{DecryptRequest, EncryptRequest, EncryptionContext, KmsBackend};
use crate::core::scope::CallScope;
use crate::error::{RemoteError, Result};

const BLOB_PREFIX: &str = "stub-kms:v1";

/// Largest plaintext the service accepts for a direct encrypt.
const MAX_PLAINTEXT_LEN: usize = 4096;

/// A request the stub has seen.
#[derive(Debug, Clone, PartialEq)]
pub struct StubCall {
    pub operation: &'static str,
    pub key_id: String,
    pub encryption_context: Option<EncryptionContext>,
}

/// Deterministic stand-in for a remote KMS.
#[derive(Debug, Default)]
pub struct StubKms {
    /// Known keys. `None` accepts every key id.
    keys: Option<HashSet<String>>,
    disabled: Mutex<HashSet<String>>,
    calls: Mutex<Vec<StubCall>>,
}

impl StubKms {
    /// A stub that accepts any key id.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub that only knows `keys`; other key ids fail with
    /// `NotFoundException`.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: Some(keys.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Make every further call with `key_id` fail with `DisabledException`.
    pub fn disable_key(&self, key_id: &str) {
        self.disabled.lock().insert(key_id.to_string());
    }

    pub fn enable_key(&self, key_id: &str) {
        self.disabled.lock().remove(key_id);
    }

    /// Requests received so far, oldest first.
    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().clone()
    }

    fn record(&self, operation: &'static str, key_id: &str, context: &Option<EncryptionContext>) {
        self.calls.lock().push(StubCall {
            operation,
            key_id: key_id.to_string(),
            encryption_context: context.clone(),
        });
    }

    fn check_key(&self, operation: &'static str, key_id: &str) -> Result<()> {
        if let Some(keys) = &self.keys {
            if !keys.contains(key_id) {
                return Err(RemoteError::new(
                    operation,
                    format!("NotFoundException: key '{}' does not exist", key_id),
                )
                .into());
            }
        }
        if self.disabled.lock().contains(key_id) {
            return Err(RemoteError::new(
                operation,
                format!("DisabledException: key '{}' is disabled", key_id),
            )
            .into());
        }
        Ok(())
    }
}

fn canonical_context(context: &Option<EncryptionContext>) -> String {
    context
        .iter()
        .flatten()
        .map(|(k, v)| format!("{}={};", k, v))
        .collect()
}

fn tag(key_id: &str, context: &str, plaintext: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(key_id.as_bytes());
    hasher.update([0]);
    hasher.update(context.as_bytes());
    hasher.update([0]);
    hasher.update(plaintext);
    hasher.finalize().to_vec()
}

struct Blob {
    key_id: String,
    context: String,
    plaintext: Vec<u8>,
    tag: Vec<u8>,
}

impl Blob {
    fn seal(&self) -> Vec<u8> {
        format!(
            "{}:{}:{}:{}:{}",
            BLOB_PREFIX,
            hex::encode(&self.key_id),
            hex::encode(&self.context),
            hex::encode(&self.plaintext),
            hex::encode(&self.tag)
        )
        .into_bytes()
    }

    fn parse(bytes: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(bytes).ok()?;
        let rest = text.strip_prefix(BLOB_PREFIX)?.strip_prefix(':')?;
        let mut parts = rest.split(':');
        let key_id = String::from_utf8(hex::decode(parts.next()?).ok()?).ok()?;
        let context = String::from_utf8(hex::decode(parts.next()?).ok()?).ok()?;
        let plaintext = hex::decode(parts.next()?).ok()?;
        let tag = hex::decode(parts.next()?).ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            key_id,
            context,
            plaintext,
            tag,
        })
    }
}

impl KmsBackend for StubKms {
    fn encrypt(&self, scope: &CallScope, request: EncryptRequest<'_>) -> Result<Vec<u8>> {
        scope.check()?;
        self.record("Encrypt", request.key_id, &request.encryption_context);
        self.check_key("Encrypt", request.key_id)?;

        if request.plaintext.is_empty() || request.plaintext.len() > MAX_PLAINTEXT_LEN {
            return Err(RemoteError::new(
                "Encrypt",
                format!(
                    "ValidationException: plaintext length {} outside 1..={}",
                    request.plaintext.len(),
                    MAX_PLAINTEXT_LEN
                ),
            )
            .into());
        }

        let context = canonical_context(&request.encryption_context);
        let blob = Blob {
            key_id: request.key_id.to_string(),
            tag: tag(request.key_id, &context, request.plaintext),
            context,
            plaintext: request.plaintext.to_vec(),
        };
        Ok(blob.seal())
    }

    fn decrypt(&self, scope: &CallScope, request: DecryptRequest<'_>) -> Result<Vec<u8>> {
        scope.check()?;
        self.record("Decrypt", request.key_id, &request.encryption_context);
        self.check_key("Decrypt", request.key_id)?;

        let invalid = || RemoteError::new("Decrypt", "InvalidCiphertextException");

        let blob = Blob::parse(request.ciphertext_blob).ok_or_else(invalid)?;
        if blob.key_id != request.key_id {
            return Err(RemoteError::new(
                "Decrypt",
                "IncorrectKeyException: ciphertext was not encrypted under the requested key",
            )
            .into());
        }
        if blob.tag != tag(&blob.key_id, &blob.context, &blob.plaintext) {
            return Err(invalid().into());
        }
        if blob.context != canonical_context(&request.encryption_context) {
            return Err(invalid().into());
        }
        Ok(blob.plaintext)
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
