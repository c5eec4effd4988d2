use std::fmt::{Debug, Display};

use async_trait::async_trait;

use super::Post;
use crate::signer::SubmissionPayload;

/// Transport to the remote ledger service
///
/// Implementations perform no retries and enforce no timeouts of their own
/// beyond what the underlying transport does.
#[async_trait]
pub trait LedgerProvider: Send + Sync + Debug + 'static {
    type Error: Display + Debug + Send + Sync;

    /// Read the whole ledger in the service's own order
    ///
    /// # Returns
    /// * `Ok(Vec<Post>)` - Every post the service currently holds
    /// * `Err(Self::Error)` - Transport failure or a non-success status
    async fn fetch(&self) -> Result<Vec<Post>, Self::Error>;

    /// Hand a signed post to the service
    ///
    /// Any success status counts as accepted, whatever the response body says.
    /// Signature checks happen on the service side.
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), Self::Error>;
}
