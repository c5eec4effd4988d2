use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::keys::{KeyError, SecretKey};

pub const PUBLIC_KEY_FILE_NAME: &str = "public_key.pem";
pub const PRIVATE_KEY_FILE_NAME: &str = "private_key.pem";

#[derive(Debug, thiserror::Error)]
pub enum MintError {
    #[error("key generation failure: {0}")]
    KeyGenerationFailure(#[from] KeyError),
    #[error("failed to save {name}: {source}")]
    Save {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Destination for downloadable artifacts, i.e. "save these bytes as a named file"
pub trait ArtifactSink {
    fn save(&self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes artifacts as files inside a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(name), bytes)
    }
}

/// Both halves of a freshly minted key pair, already encoded for the file boundary
#[derive(Clone)]
pub struct MintedArtifacts {
    pub public_artifact: String,
    pub private_artifact: String,
}

impl std::fmt::Debug for MintedArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MintedArtifacts")
            .field("public_artifact", &self.public_artifact)
            .finish_non_exhaustive()
    }
}

/// Generate a new key pair and hand both encoded halves to `sink` as
/// `public_key.pem` and `private_key.pem`.
///
/// Generation failures are returned as-is and never retried.
pub fn mint(sink: &impl ArtifactSink) -> Result<MintedArtifacts, MintError> {
    mint_with(sink, SecretKey::generate)
}

fn mint_with(
    sink: &impl ArtifactSink,
    generate: impl FnOnce() -> Result<SecretKey, KeyError>,
) -> Result<MintedArtifacts, MintError> {
    let secret_key = generate()?;
    let artifacts = MintedArtifacts {
        public_artifact: secret_key.public().to_pem()?,
        private_artifact: secret_key.to_pem()?,
    };
    drop(secret_key);

    save(sink, PUBLIC_KEY_FILE_NAME, &artifacts.public_artifact)?;
    save(sink, PRIVATE_KEY_FILE_NAME, &artifacts.private_artifact)?;

    tracing::info!("minted new key pair");
    Ok(artifacts)
}

fn save(sink: &impl ArtifactSink, name: &str, artifact: &str) -> Result<(), MintError> {
    sink.save(name, artifact.as_bytes())
        .map_err(|source| MintError::Save {
            name: name.to_string(),
            source,
        })
}
