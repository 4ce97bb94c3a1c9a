//! Core library components.
//!
//! The AEAD adapter over a remote KMS key, the clients that build it from
//! key URIs, the client registry, and configuration handling.

pub mod aead;
pub mod cipher;
pub mod client;
pub mod config;
pub mod constants;
pub mod key_uri;
pub mod registry;
pub mod scope;

pub use aead::Aead;
pub use cipher::{EncryptionContextName, KmsBackend, RemoteAead, StubKms};
pub use client::{AwsKmsClient, KmsClient};
pub use registry::KmsClientRegistry;
pub use scope::CallScope;
