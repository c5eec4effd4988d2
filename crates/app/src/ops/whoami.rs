use std::path::PathBuf;

use clap::Args;
use common::session::{SessionError, SignInSession};

#[derive(Args, Debug, Clone)]
pub struct Whoami {
    /// Public key file to sign in with
    pub public_key: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum WhoamiError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[async_trait::async_trait]
impl crate::op::Op for Whoami {
    type Error = WhoamiError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let text = tokio::fs::read_to_string(&self.public_key)
            .await
            .map_err(|e| WhoamiError::Read(self.public_key.clone(), e))?;

        let mut session = SignInSession::new();
        let identity = session.sign_in(&text)?;

        Ok(format!(
            "Fingerprint: {}\nShort: {}",
            identity.fingerprint,
            identity.fingerprint.short()
        ))
    }
}
