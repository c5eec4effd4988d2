use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::provider::LedgerProvider;
use super::{Ledger, LedgerOrder};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LedgerSyncError {
    #[error("ledger fetch failed: {0}")]
    LedgerFetchFailed(String),
}

#[derive(Debug, Default)]
struct Displayed {
    /// Tag of the fetch that produced `ledger`, 0 before the first success
    tag: u64,
    ledger: Ledger,
}

/// Keeps the displayed ledger in step with the remote service.
///
/// Every [`LedgerSync::refresh`] is tagged with an increasing sequence number
/// when it starts. A completed fetch only replaces the displayed ledger if it
/// started after the fetch that produced it, so a slow response can never
/// overwrite a newer one.
#[derive(Debug)]
pub struct LedgerSync<P: LedgerProvider> {
    provider: P,
    order: LedgerOrder,
    issued: AtomicU64,
    displayed: RwLock<Displayed>,
}

impl<P: LedgerProvider> LedgerSync<P> {
    pub fn new(provider: P, order: LedgerOrder) -> Self {
        Self {
            provider,
            order,
            issued: AtomicU64::new(0),
            displayed: RwLock::new(Displayed::default()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn order(&self) -> LedgerOrder {
        self.order
    }

    /// The ledger currently displayed: the last good fetch, or empty
    pub fn current(&self) -> Ledger {
        self.displayed.read().ledger.clone()
    }

    /// Fetch the ledger and replace the displayed one wholesale.
    ///
    /// On failure the displayed ledger is left as it was and remains available
    /// through [`LedgerSync::current`]. If a newer refresh completed first, the
    /// response is dropped and the newer ledger is returned.
    pub async fn refresh(&self) -> Result<Ledger, LedgerSyncError> {
        let tag = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let posts = match self.provider.fetch().await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(tag, "ledger fetch failed, keeping previous ledger: {}", e);
                return Err(LedgerSyncError::LedgerFetchFailed(e.to_string()));
            }
        };
        let ledger = Ledger::from_fetch(posts, self.order);

        let mut displayed = self.displayed.write();
        if tag < displayed.tag {
            tracing::debug!(
                tag,
                displayed = displayed.tag,
                "discarding ledger from superseded fetch"
            );
            return Ok(displayed.ledger.clone());
        }

        tracing::info!(tag, posts = ledger.len(), "ledger refreshed");
        displayed.tag = tag;
        displayed.ledger = ledger.clone();
        Ok(ledger)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ledger::{MemoryLedgerProvider, Post};

    fn post(key: &str, content: &str) -> Post {
        Post {
            public_key: key.to_string(),
            content: content.to_string(),
            signature: None,
        }
    }

    #[tokio::test]
    async fn test_refresh_reverses_append_order() {
        let provider = MemoryLedgerProvider::new();
        provider.append(post("PK1", "old"));
        provider.append(post("PK2", "new"));

        let sync = LedgerSync::new(provider, LedgerOrder::OldestFirst);
        let ledger = sync.refresh().await.unwrap();
        assert_eq!(ledger.posts()[0].content, "new");
        assert_eq!(ledger.posts()[1].content, "old");
        assert_eq!(sync.current(), ledger);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous() {
        let provider = MemoryLedgerProvider::new();
        provider.append(post("PK1", "hi"));
        let sync = LedgerSync::new(provider.clone(), LedgerOrder::OldestFirst);

        let good = sync.refresh().await.unwrap();

        provider.append(post("PK2", "unseen"));
        provider.set_fail_fetch(true);
        let err = sync.refresh().await.unwrap_err();
        assert!(matches!(err, LedgerSyncError::LedgerFetchFailed(_)));
        assert_eq!(sync.current(), good);
    }

    #[tokio::test]
    async fn test_failed_first_refresh_leaves_empty() {
        let provider = MemoryLedgerProvider::new();
        provider.set_fail_fetch(true);
        let sync = LedgerSync::new(provider, LedgerOrder::OldestFirst);

        assert!(sync.refresh().await.is_err());
        assert!(sync.current().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_wholesale() {
        let provider = MemoryLedgerProvider::new();
        provider.append(post("PK1", "a"));
        let sync = LedgerSync::new(provider.clone(), LedgerOrder::NewestFirst);
        sync.refresh().await.unwrap();

        provider.append(post("PK2", "b"));
        let ledger = sync.refresh().await.unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.posts()[0].content, "a");
        assert_eq!(provider.fetch_count(), 2);
    }
}
