//! Test fixtures and constants.

use std::sync::Arc;

use kms_aead::core::{AwsKmsClient, StubKms};

/// Account-and-region prefix covering the test keys.
pub const KEY_PREFIX: &str = "aws-kms://arn:aws:kms:us-east-2:235739564943:";

pub const KEY_ALIAS_URI: &str =
    "aws-kms://arn:aws:kms:us-east-2:235739564943:alias/unit-and-integration-testing";

pub const KEY_URI: &str =
    "aws-kms://arn:aws:kms:us-east-2:235739564943:key/3ee50705-5a82-4f5b-9753-05c4f473922f";

pub const KEY_URI_2: &str =
    "aws-kms://arn:aws:kms:us-east-2:235739564943:key/b3ca2efd-a8fb-47f2-b541-7e20f8c5cd11";

/// A key in a region no test client covers.
pub const FOREIGN_KEY_URI: &str = "aws-kms://arn:aws:kms:eu-west-1:111122223333:key/foreign";

/// Config with one client covering [`KEY_PREFIX`].
pub const PREFIX_CONFIG: &str = r#"
[[client]]
key_uri = "aws-kms://arn:aws:kms:us-east-2:235739564943:"
timeout_secs = 30
"#;

/// Plaintexts exercised by property-style tests.
pub const PLAINTEXTS: &[&[u8]] = &[
    b"plaintext",
    b"x",
    b"\x00\x01\x02\xff",
    "日本語の秘密".as_bytes(),
    b"DATABASE_URL=postgres://localhost/mydb",
];

/// Non-empty associated data values.
pub const ASSOCIATED_DATA: &[&[u8]] = &[
    b"associatedData",
    b"associated data",
    b"\x00",
    b"\xff\xfe",
    b"0123456789abcdef0123456789abcdef",
];

/// A stub backend and a client for [`KEY_PREFIX`] over it.
pub fn stub_client() -> (Arc<StubKms>, AwsKmsClient) {
    let stub = Arc::new(StubKms::new());
    let client = AwsKmsClient::new(KEY_PREFIX, stub.clone()).expect("valid prefix");
    (stub, client)
}
