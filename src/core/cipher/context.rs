//! Naming of the associated-data entry in the encryption context.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::constants::{CONTEXT_ASSOCIATED_DATA, CONTEXT_LEGACY_ADDITIONAL_DATA};
use crate::error::{ConfigError, Error};

/// Key under which hex-encoded associated data is placed in the
/// encryption context.
///
/// The service verifies the exact context, so ciphertexts produced under
/// one name only decrypt under the same name. Pick
/// [`LegacyAdditionalData`](Self::LegacyAdditionalData) to read data
/// written by older releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EncryptionContextName {
    /// `"associatedData"`
    #[default]
    #[serde(rename = "associatedData")]
    AssociatedData,
    /// `"additionalData"`
    #[serde(rename = "additionalData")]
    LegacyAdditionalData,
}

impl EncryptionContextName {
    /// The literal encryption context key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssociatedData => CONTEXT_ASSOCIATED_DATA,
            Self::LegacyAdditionalData => CONTEXT_LEGACY_ADDITIONAL_DATA,
        }
    }
}

impl fmt::Display for EncryptionContextName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncryptionContextName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CONTEXT_ASSOCIATED_DATA => Ok(Self::AssociatedData),
            CONTEXT_LEGACY_ADDITIONAL_DATA => Ok(Self::LegacyAdditionalData),
            other => Err(ConfigError::InvalidValue {
                field: "context_name",
                reason: format!(
                    "unknown encryption context name: {}. Supported: {}, {}",
                    other, CONTEXT_ASSOCIATED_DATA, CONTEXT_LEGACY_ADDITIONAL_DATA
                ),
            }
            .into()),
        }
    }
}
