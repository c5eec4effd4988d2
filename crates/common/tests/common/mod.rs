//! Shared test utilities for signing and ledger integration tests
#![allow(dead_code)]

use std::sync::OnceLock;

use common::crypto::SecretKey;
use common::ledger::{LedgerOrder, LedgerSync, MemoryLedgerProvider, Post};
use common::session::SignInSession;

/// An encoded key pair, generated once per test binary
pub struct TestKeys {
    pub public_pem: String,
    pub private_pem: String,
}

fn generate() -> TestKeys {
    let secret_key = SecretKey::generate().unwrap();
    TestKeys {
        public_pem: secret_key.public().to_pem().unwrap(),
        private_pem: secret_key.to_pem().unwrap(),
    }
}

pub fn keys() -> &'static TestKeys {
    static KEYS: OnceLock<TestKeys> = OnceLock::new();
    KEYS.get_or_init(generate)
}

/// A second, unrelated key pair
pub fn other_keys() -> &'static TestKeys {
    static KEYS: OnceLock<TestKeys> = OnceLock::new();
    KEYS.get_or_init(generate)
}

/// A session signed in with [`keys`]
pub fn signed_in_session() -> SignInSession {
    let mut session = SignInSession::new();
    session.sign_in(&keys().public_pem).unwrap();
    session
}

/// A verifying in-memory ledger behind a sync that reverses append order
pub fn setup_ledger() -> (MemoryLedgerProvider, LedgerSync<MemoryLedgerProvider>) {
    let provider = MemoryLedgerProvider::verifying();
    let sync = LedgerSync::new(provider.clone(), LedgerOrder::OldestFirst);
    (provider, sync)
}

pub fn post(key: &str, content: &str) -> Post {
    Post {
        public_key: key.to_string(),
        content: content.to_string(),
        signature: None,
    }
}
