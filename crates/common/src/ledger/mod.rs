//! Client view of the remote post ledger
//!
//! The ledger service is the authority: it verifies signatures and persists
//! posts. This module only fetches it, puts it in display order, and pairs
//! every post with a locally synthesized [`DisplayIdentity`].

mod identity;
mod memory;
mod provider;
mod sync;

use serde::{Deserialize, Serialize};

use crate::crypto::codec;

pub use identity::{DisplayIdentity, IdentityCache, AVATARS, FIRST_NAMES, LAST_NAMES};
pub use memory::{MemoryLedgerProvider, MemoryLedgerProviderError};
pub use provider::LedgerProvider;
pub use sync::{LedgerSync, LedgerSyncError};

/// One signed post as reported by the ledger service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Author's public key (the service reports it as `author`)
    #[serde(alias = "author")]
    pub public_key: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Order in which the ledger service returns posts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOrder {
    /// Append order; reversed for display
    #[default]
    OldestFirst,
    NewestFirst,
}

/// A fetched ledger in display order, newest post first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    posts: Vec<Post>,
}

impl Ledger {
    /// Put the posts of a single fetch into display order.
    ///
    /// Beyond the optional reversal the transport order is kept verbatim.
    pub fn from_fetch(mut posts: Vec<Post>, order: LedgerOrder) -> Self {
        if order == LedgerOrder::OldestFirst {
            posts.reverse();
        }
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Post> {
        self.posts.iter()
    }

    /// Pair each post with its display identity, minting identities for
    /// authors `cache` has not seen yet.
    pub fn render<'a>(&'a self, cache: &IdentityCache) -> Vec<RenderedPost<'a>> {
        self.posts
            .iter()
            .map(|post| RenderedPost {
                identity: cache.resolve(&post.public_key),
                post,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Post;
    type IntoIter = std::slice::Iter<'a, Post>;

    fn into_iter(self) -> Self::IntoIter {
        self.posts.iter()
    }
}

/// A post ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPost<'a> {
    pub post: &'a Post,
    pub identity: DisplayIdentity,
}

impl RenderedPost<'_> {
    /// Abbreviated fingerprint of the author's key
    pub fn author_tag(&self) -> String {
        codec::digest(self.post.public_key.as_bytes()).short()
    }
}
