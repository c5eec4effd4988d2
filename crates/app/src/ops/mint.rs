use std::path::PathBuf;

use clap::Args;
use common::crypto::{self, codec, DirectorySink, MintError, PRIVATE_KEY_FILE_NAME, PUBLIC_KEY_FILE_NAME};

#[derive(Args, Debug, Clone)]
pub struct Mint {
    /// Directory to write public_key.pem and private_key.pem to
    /// (defaults to the configured artifact directory)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum MintOpError {
    #[error(transparent)]
    Mint(#[from] MintError),
    #[error("minting task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[async_trait::async_trait]
impl crate::op::Op for Mint {
    type Error = MintOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let dir = self
            .out
            .clone()
            .unwrap_or_else(|| ctx.config.artifact_dir.clone());
        mint_in_background(dir).await
    }
}

/// Mint a key pair into `dir` on the blocking pool, keeping RSA key
/// generation off the runtime thread
pub async fn mint_in_background(dir: PathBuf) -> Result<String, MintOpError> {
    let summary = tokio::task::spawn_blocking(move || mint_into(dir)).await??;
    Ok(summary)
}

fn mint_into(dir: PathBuf) -> Result<String, MintError> {
    let sink = DirectorySink::new(dir);
    let artifacts = crypto::mint(&sink)?;
    let fingerprint = codec::digest(artifacts.public_artifact.as_bytes());

    Ok(format!(
        "Minted a new key pair\n\
         - Public key: {}\n\
         - Private key: {}\n\
         - Fingerprint: {}\n\
         Keep the private key somewhere safe; chirp does not store it.",
        sink.dir().join(PUBLIC_KEY_FILE_NAME).display(),
        sink.dir().join(PRIVATE_KEY_FILE_NAME).display(),
        fingerprint,
    ))
}
