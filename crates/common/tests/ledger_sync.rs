//! Integration tests for ledger refresh and identity resolution

mod common;

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use ::common::ledger::{
    IdentityCache, LedgerOrder, LedgerProvider, LedgerSync, LedgerSyncError,
    MemoryLedgerProvider, Post,
};
use ::common::signer::SubmissionPayload;

#[tokio::test]
async fn test_single_post_scenario() {
    let provider = MemoryLedgerProvider::new();
    provider
        .submit(&SubmissionPayload {
            post_content: "hi".to_string(),
            public_key: "PK1".to_string(),
            signature: "c2ln".to_string(),
        })
        .await
        .unwrap();

    let sync = LedgerSync::new(provider.clone(), LedgerOrder::OldestFirst);
    let cache = IdentityCache::new();

    let ledger = sync.refresh().await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.posts()[0].public_key, "PK1");
    assert_eq!(ledger.posts()[0].content, "hi");

    let identity = ledger.render(&cache)[0].identity.clone();
    assert_eq!(cache.len(), 1);

    provider.append(common::post("PK2", "hello"));
    provider.append(common::post("PK1", "hi again"));

    let ledger = sync.refresh().await.unwrap();
    let rendered = ledger.render(&cache);
    assert_eq!(rendered.len(), 3);
    assert_eq!(rendered[0].post.content, "hi again");
    assert_eq!(rendered[0].identity, identity);
    assert_eq!(rendered[2].identity, identity);
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_identity_stable_across_refreshes() {
    let provider = MemoryLedgerProvider::new();
    for i in 0..5 {
        provider.append(common::post(&format!("PK{}", i), "post"));
    }
    let sync = LedgerSync::new(provider, LedgerOrder::OldestFirst);
    let cache = IdentityCache::new();

    let first: Vec<_> = sync
        .refresh()
        .await
        .unwrap()
        .render(&cache)
        .into_iter()
        .map(|r| r.identity)
        .collect();
    let second: Vec<_> = sync
        .refresh()
        .await
        .unwrap()
        .render(&cache)
        .into_iter()
        .map(|r| r.identity)
        .collect();

    assert_eq!(first, second);
    assert_eq!(cache.len(), 5);
}

#[tokio::test]
async fn test_failed_refresh_preserves_rendered_feed() {
    let provider = MemoryLedgerProvider::new();
    provider.append(common::post("PK1", "hi"));
    let sync = LedgerSync::new(provider.clone(), LedgerOrder::OldestFirst);

    let good = sync.refresh().await.unwrap();
    provider.set_fail_fetch(true);

    for _ in 0..3 {
        assert!(matches!(
            sync.refresh().await,
            Err(LedgerSyncError::LedgerFetchFailed(_))
        ));
        assert_eq!(sync.current(), good);
    }
    assert_eq!(provider.fetch_count(), 4);
}

/// Ledger whose fetches complete only when the test releases them
#[derive(Debug, Clone, Default)]
struct GatedProvider {
    inner: Arc<GatedProviderInner>,
}

#[derive(Debug, Default)]
struct GatedProviderInner {
    pending: Mutex<VecDeque<oneshot::Receiver<Vec<Post>>>>,
    calls: Mutex<usize>,
}

impl GatedProvider {
    fn gate(&self) -> oneshot::Sender<Vec<Post>> {
        let (tx, rx) = oneshot::channel();
        self.inner.pending.lock().push_back(rx);
        tx
    }

    fn calls(&self) -> usize {
        *self.inner.calls.lock()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("gate dropped")]
struct GateDropped;

#[async_trait]
impl LedgerProvider for GatedProvider {
    type Error = GateDropped;

    async fn fetch(&self) -> Result<Vec<Post>, Self::Error> {
        *self.inner.calls.lock() += 1;
        let next = self.inner.pending.lock().pop_front();
        let rx = next.ok_or(GateDropped)?;
        rx.await.map_err(|_| GateDropped)
    }

    async fn submit(&self, _payload: &SubmissionPayload) -> Result<(), Self::Error> {
        Ok(())
    }
}

async fn wait_for_calls(provider: &GatedProvider, calls: usize) {
    while provider.calls() < calls {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_stale_fetch_does_not_overwrite_newer() {
    let provider = GatedProvider::default();
    let older_gate = provider.gate();
    let newer_gate = provider.gate();
    let sync = Arc::new(LedgerSync::new(provider.clone(), LedgerOrder::NewestFirst));

    let older = tokio::spawn({
        let sync = sync.clone();
        async move { sync.refresh().await }
    });
    wait_for_calls(&provider, 1).await;

    let newer = tokio::spawn({
        let sync = sync.clone();
        async move { sync.refresh().await }
    });
    wait_for_calls(&provider, 2).await;

    let newer_posts = vec![common::post("PK1", "b"), common::post("PK1", "a")];
    newer_gate.send(newer_posts.clone()).unwrap();
    let newer_ledger = newer.await.unwrap().unwrap();
    assert_eq!(newer_ledger.posts(), newer_posts.as_slice());

    older_gate.send(vec![common::post("PK1", "a")]).unwrap();
    let older_result = older.await.unwrap().unwrap();

    assert_eq!(older_result, newer_ledger);
    assert_eq!(sync.current(), newer_ledger);
}

#[tokio::test]
async fn test_in_order_completion_applies_latest() {
    let provider = GatedProvider::default();
    let first_gate = provider.gate();
    let second_gate = provider.gate();
    let sync = Arc::new(LedgerSync::new(provider.clone(), LedgerOrder::NewestFirst));

    let first = tokio::spawn({
        let sync = sync.clone();
        async move { sync.refresh().await }
    });
    wait_for_calls(&provider, 1).await;
    let second = tokio::spawn({
        let sync = sync.clone();
        async move { sync.refresh().await }
    });
    wait_for_calls(&provider, 2).await;

    first_gate.send(vec![common::post("PK1", "a")]).unwrap();
    first.await.unwrap().unwrap();
    assert_eq!(sync.current().len(), 1);

    second_gate
        .send(vec![common::post("PK2", "b"), common::post("PK1", "a")])
        .unwrap();
    second.await.unwrap().unwrap();
    assert_eq!(sync.current().len(), 2);
}
