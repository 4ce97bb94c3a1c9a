//! Constants used throughout kms-aead.
//!
//! Centralizes magic strings and configuration values.

/// Scheme prefix of every AWS KMS key URI.
pub const AWS_KMS_SCHEME: &str = "aws-kms://";

/// Encryption context key for associated data.
pub const CONTEXT_ASSOCIATED_DATA: &str = "associatedData";

/// Encryption context key used by ciphertexts from older releases.
pub const CONTEXT_LEGACY_ADDITIONAL_DATA: &str = "additionalData";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "KMS_AEAD_CONFIG";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "KMS_AEAD_LOG";

/// Config directory name under the platform config dir.
pub const CONFIG_DIR: &str = "kms-aead";

/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";
