//! kms-aead - AWS KMS keys as an AEAD primitive.
//!
//! A remote, non-exportable KMS key is wrapped so it can be used exactly
//! like a local AEAD. Associated data is hex-encoded into the request's
//! encryption context, which the service authenticates along with the
//! ciphertext.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/               # Command-line interface
//! │   ├── crypt          # encrypt / decrypt
//! │   ├── supports       # which client claims a key URI
//! │   └── output         # terminal output helpers
//! └── core/              # Core library components
//!     ├── aead           # Aead trait
//!     ├── cipher/        # Remote KMS backends
//!     │   ├── mod        # KmsBackend trait, request types
//!     │   ├── context    # EncryptionContextName
//!     │   ├── remote     # RemoteAead adapter
//!     │   ├── stub       # in-memory backend
//!     │   └── aws        # AWS SDK backend
//!     ├── client         # KmsClient, AwsKmsClient
//!     ├── registry       # KmsClientRegistry
//!     ├── scope          # CallScope (cancellation, deadlines)
//!     ├── key_uri        # scheme and region handling
//!     └── config         # TOML client configuration
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use kms_aead::core::{Aead, AwsKmsClient, KmsClient, StubKms};
//!
//! let client = AwsKmsClient::new(
//!     "aws-kms://arn:aws:kms:us-east-2:111122223333:",
//!     Arc::new(StubKms::new()),
//! )
//! .unwrap();
//! let aead = client
//!     .get_aead("aws-kms://arn:aws:kms:us-east-2:111122223333:key/abc")
//!     .unwrap();
//!
//! let ciphertext = aead.encrypt(b"plaintext", b"associatedData").unwrap();
//! assert_eq!(aead.decrypt(&ciphertext, b"associatedData").unwrap(), b"plaintext");
//! ```

pub mod cli;
pub mod core;
pub mod error;
