// SPDX-FileCopyrightText: 2026 Net-API Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential resolution against an in-memory device store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use netapi_core::{AuthType, CallAuth, Credential, NetApiError};
use netapi_test_utils::fixtures::{secret_device, token_device};
use netapi_test_utils::MemoryDeviceStore;
use netapi_vault::{CredentialResolver, SecretCodec, SecretDecryptor};
use secrecy::{ExposeSecret, SecretString};

fn codec() -> Arc<SecretCodec> {
    Arc::new(SecretCodec::new(SecretString::from("m4ster".to_string())))
}

struct CountingCodec {
    inner: SecretCodec,
    decrypts: AtomicUsize,
}

impl SecretDecryptor for CountingCodec {
    fn decrypt(&self, ciphertext: &str, salt: &str) -> Result<SecretString, NetApiError> {
        self.decrypts.fetch_add(1, Ordering::SeqCst);
        self.inner.decrypt(ciphertext, salt)
    }
}

#[tokio::test]
async fn secret_device_resolves_to_plaintext() {
    let codec = codec();
    let sealed = codec.encrypt("Juniper-r0cks").unwrap();
    let store = Arc::new(MemoryDeviceStore::with_devices([secret_device(
        "D1",
        "10.0.0.5",
        "juniper",
        "netops",
        &sealed.ciphertext,
        &sealed.salt,
    )]));

    let resolver = CredentialResolver::new(store.clone(), codec);
    let credential = resolver.resolve("D1").await.unwrap();

    match credential {
        Credential::Secret { username, secret } => {
            assert_eq!(username, "netops");
            assert_eq!(secret.expose_secret(), "Juniper-r0cks");
        }
        other => panic!("expected secret credential, got {other:?}"),
    }
    assert_eq!(store.fetch_count(), 1);
}

#[tokio::test]
async fn token_device_passes_token_through() {
    // The codec has a different passphrase; a token device must never reach it.
    let store = Arc::new(MemoryDeviceStore::with_devices([token_device(
        "D2", "10.0.0.9", "cisco", "T",
    )]));
    let resolver = CredentialResolver::new(store, codec());

    let credential = resolver.resolve("D2").await.unwrap();
    assert_eq!(credential.auth_type(), AuthType::Token);
    assert!(matches!(credential.call_auth(), CallAuth::Token("T")));
}

#[tokio::test]
async fn missing_device_is_not_found() {
    let resolver = CredentialResolver::new(Arc::new(MemoryDeviceStore::new()), codec());
    let err = resolver.resolve("D9").await.unwrap_err();
    assert!(matches!(err, NetApiError::DeviceNotFound { device_id } if device_id == "D9"));
}

#[tokio::test]
async fn corrupted_ciphertext_is_decrypt_failed() {
    let codec = codec();
    let sealed = codec.encrypt("pw").unwrap();
    let mut corrupted = sealed.ciphertext.clone();
    corrupted.replace_range(20..24, "AAAA");
    if corrupted == sealed.ciphertext {
        corrupted.replace_range(20..24, "BBBB");
    }

    let store = Arc::new(MemoryDeviceStore::with_devices([secret_device(
        "D3", "h", "juniper", "u", &corrupted, &sealed.salt,
    )]));
    let resolver = CredentialResolver::new(store, codec);
    assert!(matches!(
        resolver.resolve("D3").await,
        Err(NetApiError::DecryptFailed)
    ));
}

#[tokio::test]
async fn store_errors_propagate() {
    let store = Arc::new(MemoryDeviceStore::new());
    store.set_failing(true);
    let resolver = CredentialResolver::new(store, codec());
    assert!(matches!(
        resolver.resolve("D1").await,
        Err(NetApiError::Storage { .. })
    ));
}

#[tokio::test]
async fn resolve_does_not_cache() {
    let codec = codec();
    let store = Arc::new(MemoryDeviceStore::with_devices([token_device(
        "D2", "h", "cisco", "old",
    )]));
    let resolver = CredentialResolver::new(store.clone(), codec);

    assert!(matches!(
        resolver.resolve("D2").await.unwrap().call_auth(),
        CallAuth::Token("old")
    ));
    store.insert(token_device("D2", "h", "cisco", "new")).await;
    assert!(matches!(
        resolver.resolve("D2").await.unwrap().call_auth(),
        CallAuth::Token("new")
    ));
    assert_eq!(store.fetch_count(), 2);
}

#[tokio::test]
async fn token_resolution_never_decrypts() {
    let codec = Arc::new(CountingCodec {
        inner: SecretCodec::new(SecretString::from("m4ster".to_string())),
        decrypts: AtomicUsize::new(0),
    });
    let sealed = codec.inner.encrypt("pw-1234").unwrap();
    let store = Arc::new(MemoryDeviceStore::with_devices([
        token_device("D2", "h", "cisco", "T"),
        secret_device("D1", "h", "juniper", "u", &sealed.ciphertext, &sealed.salt),
    ]));
    let resolver = CredentialResolver::new(store, Arc::clone(&codec) as Arc<dyn SecretDecryptor>);

    resolver.resolve("D2").await.unwrap();
    assert_eq!(codec.decrypts.load(Ordering::SeqCst), 0);

    resolver.resolve("D1").await.unwrap();
    assert_eq!(codec.decrypts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slow_store_read_is_bounded() {
    let store = Arc::new(
        MemoryDeviceStore::with_devices([token_device("D2", "h", "cisco", "T")])
            .with_delay(Duration::from_secs(10)),
    );
    let resolver =
        CredentialResolver::new(store, codec()).with_store_timeout(Duration::from_millis(50));

    let err = resolver.resolve("D2").await.unwrap_err();
    assert!(matches!(
        err,
        NetApiError::Timeout { duration } if duration == Duration::from_millis(50)
    ));
}
