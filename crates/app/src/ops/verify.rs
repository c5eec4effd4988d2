use std::path::PathBuf;

use clap::Args;
use common::crypto::{KeyError, PublicKey};

#[derive(Args, Debug, Clone)]
pub struct Verify {
    /// Public key file of the claimed author
    #[arg(long)]
    pub public_key: PathBuf,

    /// Base64 signature to check
    #[arg(long)]
    pub signature: String,

    /// Content the signature was made over
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("invalid public key: {0}")]
    InvalidPublicKey(KeyError),
    #[error("signature rejected: {0}")]
    Rejected(KeyError),
}

#[async_trait::async_trait]
impl crate::op::Op for Verify {
    type Error = VerifyError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let text = tokio::fs::read_to_string(&self.public_key)
            .await
            .map_err(|e| VerifyError::Read(self.public_key.clone(), e))?;

        let public_key = PublicKey::from_pem(&text).map_err(VerifyError::InvalidPublicKey)?;
        public_key
            .verify(self.content.as_bytes(), &self.signature)
            .map_err(VerifyError::Rejected)?;

        Ok("Signature is valid".to_string())
    }
}
