//! AEAD behavior of remote keys.
//!
//! Runs against the in-memory backend, which enforces key scoping and
//! encryption context matching the way the service does.

mod support;

use std::sync::Arc;
use std::thread;

use kms_aead::core::{Aead, AwsKmsClient, CallScope, EncryptionContextName, KmsClient, StubKms};
use kms_aead::error::{Error, KmsError};
use support::*;

#[test]
fn test_get_aead_encrypt_decrypt() {
    let (_, client) = stub_client();
    let aead = client.get_aead(KEY_URI).unwrap();

    let ciphertext = aead.encrypt(b"plaintext", b"associatedData").unwrap();
    let plaintext = aead.decrypt(&ciphertext, b"associatedData").unwrap();
    assert_eq!(plaintext, b"plaintext");

    assert_rejected(aead.as_ref(), &ciphertext, b"invalidAssociatedData");
}

#[test]
fn test_roundtrip_for_all_inputs() {
    let (_, client) = stub_client();
    let aead = client.get_aead(KEY_URI).unwrap();

    let empty: &[u8] = &[];
    for plaintext in PLAINTEXTS {
        for ad in ASSOCIATED_DATA.iter().copied().chain([empty]) {
            let ciphertext = aead.encrypt(plaintext, ad).unwrap();
            assert_eq!(&aead.decrypt(&ciphertext, ad).unwrap(), plaintext);
        }
    }
}

#[test]
fn test_mismatched_associated_data_fails() {
    let (_, client) = stub_client();
    let aead = client.get_aead(KEY_URI).unwrap();

    for (i, a1) in ASSOCIATED_DATA.iter().enumerate() {
        let ciphertext = aead.encrypt(b"plaintext", a1).unwrap();
        for (j, a2) in ASSOCIATED_DATA.iter().enumerate() {
            if i != j {
                assert_rejected(aead.as_ref(), &ciphertext, a2);
            }
        }
        // dropping the associated data is a mismatch too
        assert_rejected(aead.as_ref(), &ciphertext, &[]);
    }
}

#[test]
fn test_empty_and_absent_associated_data_are_equivalent() {
    let (stub, client) = stub_client();
    let aead = client.get_aead(KEY_URI).unwrap();

    let absent: Vec<u8> = Vec::new();
    let empty: &[u8] = b"";

    let ciphertext = aead.encrypt(b"plaintext", empty).unwrap();
    assert_eq!(aead.decrypt(&ciphertext, &absent).unwrap(), b"plaintext");

    let ciphertext = aead.encrypt(b"plaintext", &absent).unwrap();
    assert_eq!(aead.decrypt(&ciphertext, empty).unwrap(), b"plaintext");

    // no context at all is sent, never an empty-string value
    assert!(stub.calls().iter().all(|c| c.encryption_context.is_none()));
}

#[test]
fn test_context_carries_hex_associated_data() {
    let (stub, client) = stub_client();
    let aead = client.get_aead(KEY_URI).unwrap();

    aead.encrypt(b"plaintext", b"associatedData").unwrap();
    let context = stub.calls()[0].encryption_context.clone().unwrap();
    assert_eq!(context.len(), 1);
    assert_eq!(context["associatedData"], "6173736f63696174656444617461");
}

#[test]
fn test_key_commitment() {
    let (_, client) = stub_client();
    let aeads = [
        client.get_aead(KEY_URI).unwrap(),
        client.get_aead(KEY_URI_2).unwrap(),
    ];

    let ciphertext = aeads[0].encrypt(b"plaintext", b"associated data").unwrap();
    assert_eq!(
        aeads[0].decrypt(&ciphertext, b"associated data").unwrap(),
        b"plaintext"
    );
    assert_rejected(aeads[1].as_ref(), &ciphertext, b"associated data");

    for ad in ASSOCIATED_DATA {
        let ciphertext = aeads[1].encrypt(b"plaintext", ad).unwrap();
        assert_rejected(aeads[0].as_ref(), &ciphertext, ad);
    }
}

#[test]
fn test_alias_and_key_are_different_key_ids() {
    let (_, client) = stub_client();
    let by_alias = client.get_aead(KEY_ALIAS_URI).unwrap();
    let by_key = client.get_aead(KEY_URI).unwrap();

    let ciphertext = by_alias.encrypt(b"plaintext", b"ad").unwrap();
    assert_eq!(by_alias.decrypt(&ciphertext, b"ad").unwrap(), b"plaintext");
    assert_rejected(by_key.as_ref(), &ciphertext, b"ad");
}

#[test]
fn test_context_name_must_match() {
    let stub = Arc::new(StubKms::new());
    let current = AwsKmsClient::new(KEY_PREFIX, stub.clone()).unwrap();
    let legacy = AwsKmsClient::builder(KEY_PREFIX)
        .backend(stub)
        .context_name(EncryptionContextName::LegacyAdditionalData)
        .build()
        .unwrap();

    let ciphertext = current
        .get_aead(KEY_URI)
        .unwrap()
        .encrypt(b"plaintext", b"ad")
        .unwrap();
    assert_rejected(legacy.get_aead(KEY_URI).unwrap().as_ref(), &ciphertext, b"ad");

    // without associated data the name never appears, so both agree
    let ciphertext = current
        .get_aead(KEY_URI)
        .unwrap()
        .encrypt(b"plaintext", b"")
        .unwrap();
    assert_eq!(
        legacy.get_aead(KEY_URI).unwrap().decrypt(&ciphertext, b"").unwrap(),
        b"plaintext"
    );
}

#[test]
fn test_unsupported_key_makes_no_remote_call() {
    let (stub, client) = stub_client();
    let result = client.get_aead(FOREIGN_KEY_URI);
    assert!(matches!(result, Err(Error::Kms(KmsError::UnsupportedKey(_)))));
    assert!(stub.calls().is_empty());
}

#[test]
fn test_remote_errors_pass_through() {
    let (stub, client) = stub_client();
    let aead = client.get_aead(KEY_URI).unwrap();
    let ciphertext = aead.encrypt(b"plaintext", b"ad").unwrap();

    stub.disable_key("arn:aws:kms:us-east-2:235739564943:key/3ee50705-5a82-4f5b-9753-05c4f473922f");
    let err = aead.decrypt(&ciphertext, b"ad").unwrap_err();
    match err {
        Error::Kms(KmsError::Remote(remote)) => {
            assert_eq!(remote.operation(), "Decrypt");
            assert!(remote.to_string().contains("DisabledException"));
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[test]
fn test_cancelled_scope_stops_all_adapters() {
    let stub = Arc::new(StubKms::new());
    let scope = CallScope::background();
    let client = AwsKmsClient::builder(KEY_PREFIX)
        .backend(stub.clone())
        .scope(scope.child())
        .build()
        .unwrap();
    let a1 = client.get_aead(KEY_URI).unwrap();
    let a2 = client.get_aead(KEY_URI_2).unwrap();
    let ciphertext = a1.encrypt(b"plaintext", b"ad").unwrap();

    scope.cancel();
    assert!(matches!(
        a1.decrypt(&ciphertext, b"ad"),
        Err(Error::Kms(KmsError::Cancelled))
    ));
    assert!(matches!(
        a2.encrypt(b"plaintext", b"ad"),
        Err(Error::Kms(KmsError::Cancelled))
    ));
    assert_eq!(stub.calls().len(), 1);
}

#[test]
fn test_expired_deadline_fails() {
    let client = AwsKmsClient::builder(KEY_PREFIX)
        .backend(Arc::new(StubKms::new()))
        .scope(CallScope::background().with_deadline(std::time::Instant::now()))
        .build()
        .unwrap();
    let aead = client.get_aead(KEY_URI).unwrap();
    assert!(matches!(
        aead.encrypt(b"plaintext", b""),
        Err(Error::Kms(KmsError::DeadlineExceeded))
    ));
}

#[test]
fn test_concurrent_use_of_one_adapter() {
    let (stub, client) = stub_client();
    let aead = client.get_aead(KEY_URI).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let aead = aead.clone();
            thread::spawn(move || {
                let plaintext = format!("plaintext-{}", i);
                let ad = format!("ad-{}", i);
                let ciphertext = aead.encrypt(plaintext.as_bytes(), ad.as_bytes()).unwrap();
                let decrypted = aead.decrypt(&ciphertext, ad.as_bytes()).unwrap();
                assert_eq!(decrypted, plaintext.as_bytes());
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(stub.calls().len(), 16);
}
