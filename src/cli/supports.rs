//! Supports command.

use crate::cli::output;
use crate::core::key_uri;
use crate::core::registry::KmsClientRegistry;
use crate::error::Result;

/// Report whether a configured client claims `key_uri`.
pub fn execute(registry: &KmsClientRegistry, key_uri: &str) -> Result<()> {
    registry.get_client(key_uri)?;

    output::success(&format!("supported: {}", output::key(key_uri)));
    output::kv("key id:", key_uri::key_id(key_uri));
    output::kv("clients:", registry.len());
    Ok(())
}
