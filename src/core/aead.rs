//! The AEAD primitive contract.

use std::fmt;

use crate::error::Result;

/// Authenticated encryption with associated data.
///
/// Associated data is authenticated but not encrypted, and must match
/// exactly at decrypt time. An empty slice means "no associated data".
pub trait Aead: Send + Sync + fmt::Debug {
    /// Encrypt `plaintext`, binding it to `associated_data`.
    fn encrypt(&self, plaintext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt `ciphertext` and verify it against `associated_data`.
    fn decrypt(&self, ciphertext: &[u8], associated_data: &[u8]) -> Result<Vec<u8>>;
}
