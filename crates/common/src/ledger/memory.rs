use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::provider::LedgerProvider;
use super::Post;
use crate::crypto::PublicKey;
use crate::signer::SubmissionPayload;

/// In-memory ledger service, appending submissions in arrival order
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerProvider {
    inner: Arc<RwLock<MemoryLedgerProviderInner>>,
}

#[derive(Debug, Default)]
struct MemoryLedgerProviderInner {
    /// Posts in append order
    posts: Vec<Post>,
    /// Reject submissions whose signature does not verify
    verify_signatures: bool,
    fail_fetch: bool,
    fail_submit: bool,
    fetch_count: usize,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryLedgerProviderError {
    #[error("ledger unavailable")]
    Unavailable,
    #[error("rejected submission: {0}")]
    Rejected(String),
}

impl MemoryLedgerProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that checks every submitted signature against its public key,
    /// like the real service does
    pub fn verifying() -> Self {
        let provider = Self::new();
        provider.inner.write().verify_signatures = true;
        provider
    }

    /// Append a post directly, bypassing submission
    pub fn append(&self, post: Post) {
        self.inner.write().posts.push(post);
    }

    pub fn posts(&self) -> Vec<Post> {
        self.inner.read().posts.clone()
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.inner.write().fail_fetch = fail;
    }

    pub fn set_fail_submit(&self, fail: bool) {
        self.inner.write().fail_submit = fail;
    }

    /// Number of fetches served, failed ones included
    pub fn fetch_count(&self) -> usize {
        self.inner.read().fetch_count
    }
}

#[async_trait]
impl LedgerProvider for MemoryLedgerProvider {
    type Error = MemoryLedgerProviderError;

    async fn fetch(&self) -> Result<Vec<Post>, Self::Error> {
        let mut inner = self.inner.write();
        inner.fetch_count += 1;
        if inner.fail_fetch {
            return Err(MemoryLedgerProviderError::Unavailable);
        }
        Ok(inner.posts.clone())
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), Self::Error> {
        let mut inner = self.inner.write();
        if inner.fail_submit {
            return Err(MemoryLedgerProviderError::Unavailable);
        }

        if inner.verify_signatures {
            let public_key = PublicKey::from_pem(&payload.public_key)
                .map_err(|e| MemoryLedgerProviderError::Rejected(e.to_string()))?;
            public_key
                .verify(payload.post_content.as_bytes(), &payload.signature)
                .map_err(|e| MemoryLedgerProviderError::Rejected(e.to_string()))?;
        }

        inner.posts.push(Post {
            public_key: payload.public_key.clone(),
            content: payload.post_content.clone(),
            signature: Some(payload.signature.clone()),
        });
        Ok(())
    }
}
