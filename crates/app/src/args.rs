pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "chirp")]
#[command(about = "Sign posts and read the shared post ledger")]
pub struct Args {
    /// Ledger service URL (defaults to the configured remote)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the chirp config directory (defaults to ~/.chirp)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: crate::Command,
}
