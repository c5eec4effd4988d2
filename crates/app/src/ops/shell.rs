use std::path::{Path, PathBuf};

use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use common::ledger::{IdentityCache, LedgerProvider, LedgerSync};
use common::session::SignInSession;
use common::signer::ContentSigner;

use crate::ops::mint::mint_in_background;
use crate::render;

const HELP: &str = "\
Commands:
  login <public_key_file>          sign in with a public key
  whoami                           show the signed-in fingerprint
  post <private_key_file> <text>   sign and submit a post
  refresh                          re-fetch the ledger
  feed                             show the last fetched ledger
  mint [dir]                       mint a new key pair
  help                             show this help
  quit                             leave the shell";

#[derive(Args, Debug, Clone)]
pub struct Shell {
    /// Public key file to sign in with on start
    #[arg(long)]
    pub public_key: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
impl crate::op::Op for Shell {
    type Error = ShellError;
    type Output = String;

    async fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut shell = ShellSession::new(ctx.ledger_sync(), ctx.config.artifact_dir.clone());
        let mut stdout = tokio::io::stdout();

        if let Some(path) = &self.public_key {
            let outcome = shell.handle(&format!("login {}", path.display())).await;
            write_outcome(&mut stdout, &outcome).await?;
        }
        let initial = shell.refresh().await;
        write_outcome(&mut stdout, &ShellOutcome::Continue(initial)).await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let outcome = shell.handle(&line).await;
            if outcome == ShellOutcome::Quit {
                break;
            }
            write_outcome(&mut stdout, &outcome).await?;
        }

        Ok("Bye".to_string())
    }
}

async fn write_outcome(
    stdout: &mut tokio::io::Stdout,
    outcome: &ShellOutcome,
) -> Result<(), std::io::Error> {
    if let ShellOutcome::Continue(text) = outcome {
        if !text.is_empty() {
            stdout.write_all(text.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOutcome {
    Continue(String),
    Quit,
}

/// One interactive session: the sign-in state, the identity cache and the
/// synced ledger live exactly as long as the shell does.
#[derive(Debug)]
pub struct ShellSession<P: LedgerProvider> {
    session: SignInSession,
    cache: IdentityCache,
    sync: LedgerSync<P>,
    artifact_dir: PathBuf,
}

impl<P: LedgerProvider> ShellSession<P> {
    pub fn new(sync: LedgerSync<P>, artifact_dir: PathBuf) -> Self {
        Self {
            session: SignInSession::new(),
            cache: IdentityCache::new(),
            sync,
            artifact_dir,
        }
    }

    pub async fn handle(&mut self, line: &str) -> ShellOutcome {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(c, r)| (c, r.trim()))
            .unwrap_or((line, ""));

        let text = match command {
            "" => String::new(),
            "quit" | "exit" => return ShellOutcome::Quit,
            "help" => HELP.to_string(),
            "login" => self.login(rest).await,
            "whoami" => match self.session.identity() {
                Some(identity) => format!("Signed in as {}", identity.fingerprint),
                None => "Not signed in".to_string(),
            },
            "post" => self.post(rest).await,
            "refresh" => self.refresh().await,
            "feed" => render::feed(&self.sync.current(), &self.cache, None),
            "mint" => {
                let dir = if rest.is_empty() {
                    self.artifact_dir.clone()
                } else {
                    PathBuf::from(rest)
                };
                match mint_in_background(dir).await {
                    Ok(text) => text,
                    Err(e) => format!("Error: {}", e),
                }
            }
            other => format!("Unknown command '{}'. Type 'help' for commands.", other),
        };
        ShellOutcome::Continue(text)
    }

    /// Re-fetch and render the ledger, falling back to the last good one
    pub async fn refresh(&self) -> String {
        match self.sync.refresh().await {
            Ok(ledger) => render::feed(&ledger, &self.cache, None),
            Err(e) => format!(
                "Error: {}\n\n{}",
                e,
                render::feed(&self.sync.current(), &self.cache, None)
            ),
        }
    }

    async fn login(&mut self, path: &str) -> String {
        if path.is_empty() {
            return "Usage: login <public_key_file>".to_string();
        }
        let text = match read(Path::new(path)).await {
            Ok(text) => text,
            Err(e) => return e,
        };
        match self.session.sign_in(&text) {
            Ok(identity) => format!("Signed in as {}", identity.fingerprint),
            Err(e) => format!("Error: {}", e),
        }
    }

    async fn post(&mut self, args: &str) -> String {
        let Some((path, content)) = args
            .split_once(char::is_whitespace)
            .map(|(p, c)| (p, c.trim()))
            .filter(|(_, c)| !c.is_empty())
        else {
            return "Usage: post <private_key_file> <text>".to_string();
        };
        if !self.session.is_logged_in() {
            return "Error: no public key established for this session".to_string();
        }

        let private_text = match read(Path::new(path)).await {
            Ok(text) => text,
            Err(e) => return e,
        };
        let result = ContentSigner::new(&self.session)
            .submit(&self.sync, content, &private_text)
            .await;
        drop(private_text);

        match result {
            Ok(submission) => match submission.refresh {
                Ok(ledger) => render::feed(&ledger, &self.cache, None),
                Err(e) => format!("Posted, but the feed could not be refreshed: {}", e),
            },
            Err(e) => format!("Error: {}", e),
        }
    }
}

async fn read(path: &Path) -> Result<String, String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Error: failed to read {}: {}", path.display(), e))
}
