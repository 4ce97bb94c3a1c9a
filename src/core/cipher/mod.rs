//! Remote KMS cipher backends.
//!
//! The adapter talks to the key management service only through the
//! [`KmsBackend`] trait: one `encrypt` and one `decrypt` over opaque byte
//! payloads plus an optional string-keyed encryption context.
//!
//! ## Backends
//!
//! - **AWS KMS**: Feature-gated (`aws`). Uses the AWS SDK.
//! - **Stub**: Always available. Deterministic in-memory fake that checks
//!   key ids and encryption contexts the way the service does.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `KmsBackend` trait
//! 2. Add the implementation in a new file
//! 3. Feature-gate if it pulls in an SDK
//! 4. Re-export from this module

use std::collections::BTreeMap;
use std::fmt;

use crate::core::scope::CallScope;
use crate::error::Result;

pub mod context;
pub mod remote;
pub mod stub;

#[cfg(feature = "aws")]
pub mod aws;

pub use context::EncryptionContextName;
pub use remote::RemoteAead;
pub use stub::StubKms;

#[cfg(feature = "aws")]
pub use aws::SdkKms;

/// Encryption context sent alongside a request.
///
/// The service authenticates it as part of the ciphertext, so decrypt must
/// present exactly the map that encrypt did.
pub type EncryptionContext = BTreeMap<String, String>;

/// Remote encrypt request.
#[derive(Debug, Clone, PartialEq)]
pub struct EncryptRequest<'a> {
    pub key_id: &'a str,
    pub plaintext: &'a [u8],
    pub encryption_context: Option<EncryptionContext>,
}

/// Remote decrypt request.
#[derive(Debug, Clone, PartialEq)]
pub struct DecryptRequest<'a> {
    pub key_id: &'a str,
    pub ciphertext_blob: &'a [u8],
    pub encryption_context: Option<EncryptionContext>,
}

/// Remote key management capability.
///
/// Implementations perform one blocking call per method and must give up
/// once `scope` is cancelled or past its deadline. Errors from the service
/// are returned as [`crate::error::RemoteError`] without interpretation.
pub trait KmsBackend: Send + Sync + fmt::Debug {
    /// Encrypt under `request.key_id`; returns the ciphertext blob.
    fn encrypt(&self, scope: &CallScope, request: EncryptRequest<'_>) -> Result<Vec<u8>>;

    /// Decrypt a ciphertext blob; returns the plaintext.
    fn decrypt(&self, scope: &CallScope, request: DecryptRequest<'_>) -> Result<Vec<u8>>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}
