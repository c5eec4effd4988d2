use std::error::Error;
use std::path::PathBuf;

use url::Url;

use common::ledger::LedgerSync;

use crate::client::{ApiClient, ApiError, HttpLedgerProvider};
use crate::state::{AppConfig, AppState, DEFAULT_REMOTE};

/// Resolve the remote URL for the API client.
///
/// Priority: explicit `--remote` flag > config file `remote` > `http://localhost:8080`.
pub fn resolve_remote(explicit: Option<Url>, config_path: Option<PathBuf>) -> Result<Url, ApiError> {
    if let Some(url) = explicit {
        return Ok(url);
    }
    if let Ok(state) = AppState::load(config_path) {
        if let Ok(url) = state.config.remote_url() {
            return Ok(url);
        }
    }
    Ok(Url::parse(DEFAULT_REMOTE)?)
}

#[derive(Clone)]
pub struct OpContext {
    /// API client (always initialized with default or custom URL)
    pub client: ApiClient,
    /// Optional custom config path (defaults to ~/.chirp)
    pub config_path: Option<PathBuf>,
    /// Loaded configuration, or defaults when not initialized
    pub config: AppConfig,
}

impl OpContext {
    /// Create context with custom remote URL and optional config path
    pub fn new(remote: Url, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match AppState::load(config_path.clone()) {
            Ok(state) => state.config,
            Err(e) => {
                tracing::debug!("using default config: {}", e);
                AppConfig::default()
            }
        };

        Ok(Self {
            client: ApiClient::new(&remote)?,
            config_path,
            config,
        })
    }

    /// Ledger sync over HTTP, using the configured endpoints and order
    pub fn ledger_sync(&self) -> LedgerSync<HttpLedgerProvider> {
        let provider = HttpLedgerProvider::new(
            self.client.clone(),
            &self.config.ledger_path,
            &self.config.submission_path,
        );
        LedgerSync::new(provider, self.config.ledger_order)
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
