use std::path::PathBuf;

use clap::Args;
use common::ledger::LedgerOrder;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Path of the ledger read endpoint
    #[arg(long, default_value = "/chain")]
    pub ledger_path: String,

    /// Path of the submission endpoint
    #[arg(long, default_value = "/message")]
    pub submission_path: String,

    /// The ledger service returns posts newest first
    #[arg(long)]
    pub newest_first: bool,

    /// Directory minted key files are written to
    #[arg(long, default_value = ".")]
    pub artifact_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

#[async_trait::async_trait]
impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let ledger_order = if self.newest_first {
            LedgerOrder::NewestFirst
        } else {
            LedgerOrder::OldestFirst
        };

        let config = AppConfig {
            remote: ctx.client.base_url().to_string(),
            ledger_path: self.ledger_path.clone(),
            submission_path: self.submission_path.clone(),
            ledger_order,
            artifact_dir: self.artifact_dir.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized chirp directory at: {}\n\
             - Config: {}\n\
             - Remote: {}\n\
             - Ledger: {} ({:?})\n\
             - Submissions: {}\n\
             - Key files: {}",
            state.chirp_dir.display(),
            state.config_path.display(),
            state.config.remote,
            state.config.ledger_path,
            state.config.ledger_order,
            state.config.submission_path,
            state.config.artifact_dir.display(),
        );

        Ok(output)
    }
}
