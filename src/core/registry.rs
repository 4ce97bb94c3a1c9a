//! Registry of KMS clients.
//!
//! Envelope encryption stores only a key URI next to the wrapped data key;
//! the registry turns that URI back into an AEAD by asking each registered
//! client, in registration order, whether it supports the URI.
//!
//! There is no process-wide instance. Whoever needs key resolution is
//! handed a registry explicitly.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::core::aead::Aead;
use crate::core::client::KmsClient;
use crate::error::{KmsError, Result};

/// Ordered, thread-safe list of [`KmsClient`]s.
#[derive(Debug, Default)]
pub struct KmsClientRegistry {
    clients: RwLock<Vec<Arc<dyn KmsClient>>>,
}

impl KmsClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `client`. Earlier registrations win when several clients
    /// support the same URI.
    pub fn register(&self, client: Arc<dyn KmsClient>) {
        let mut clients = self.clients.write();
        clients.push(client);
        debug!(clients = clients.len(), "registered KMS client");
    }

    /// Remove every registered client.
    pub fn clear_all(&self) {
        let mut clients = self.clients.write();
        debug!(clients = clients.len(), "clearing KMS clients");
        clients.clear();
    }

    /// First registered client that supports `key_uri`.
    ///
    /// # Errors
    ///
    /// Returns `KmsError::NoClientFound` if no client claims the URI.
    pub fn get_client(&self, key_uri: &str) -> Result<Arc<dyn KmsClient>> {
        self.clients
            .read()
            .iter()
            .find(|c| c.supports(key_uri))
            .cloned()
            .ok_or_else(|| KmsError::NoClientFound(key_uri.to_string()).into())
    }

    /// AEAD for `key_uri` from the first client that supports it.
    ///
    /// # Errors
    ///
    /// Returns `KmsError::NoClientFound` if no client claims the URI.
    pub fn get_aead(&self, key_uri: &str) -> Result<Arc<dyn Aead>> {
        // Release the lock before building the AEAD.
        let client = self.get_client(key_uri)?;
        debug!(key_uri = %key_uri, "resolved KMS client");
        client.get_aead(key_uri)
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }
}
