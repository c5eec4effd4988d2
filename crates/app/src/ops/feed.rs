use clap::Args;
use common::ledger::{IdentityCache, LedgerSyncError};

use crate::render;

#[derive(Args, Debug, Clone)]
pub struct Feed {
    /// Show at most this many posts
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error(transparent)]
    Sync(#[from] LedgerSyncError),
}

#[async_trait::async_trait]
impl crate::op::Op for Feed {
    type Error = FeedError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let sync = ctx.ledger_sync();
        let ledger = sync.refresh().await?;

        let cache = IdentityCache::new();
        Ok(render::feed(&ledger, &cache, self.limit))
    }
}
