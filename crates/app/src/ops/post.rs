use std::path::{Path, PathBuf};

use clap::Args;
use common::ledger::IdentityCache;
use common::session::{SessionError, SignInSession};
use common::signer::{ContentSigner, SubmitError};

use crate::render;

#[derive(Args, Debug, Clone)]
pub struct Post {
    /// Public key file identifying the author
    #[arg(long)]
    pub public_key: PathBuf,

    /// Private key file to sign with
    #[arg(long)]
    pub private_key: PathBuf,

    /// Post content
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("post content is empty")]
    EmptyContent,
}

#[async_trait::async_trait]
impl crate::op::Op for Post {
    type Error = PostError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        if self.content.trim().is_empty() {
            return Err(PostError::EmptyContent);
        }

        let public_text = read(&self.public_key).await?;
        let mut session = SignInSession::new();
        session.sign_in(&public_text)?;

        // Read the private key only now, right before the one call that uses it
        let private_text = read(&self.private_key).await?;
        let sync = ctx.ledger_sync();
        let submission = ContentSigner::new(&session)
            .submit(&sync, &self.content, &private_text)
            .await?;
        drop(private_text);

        let cache = IdentityCache::new();
        match submission.refresh {
            Ok(ledger) => Ok(format!(
                "Posted.\n\n{}",
                render::feed(&ledger, &cache, None)
            )),
            Err(e) => Ok(format!("Posted, but the feed could not be refreshed: {}", e)),
        }
    }
}

async fn read(path: &Path) -> Result<String, PostError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PostError::Read(path.to_path_buf(), e))
}
