use std::fmt;

use pem::{EncodeConfig, LineEnding, Pem};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Size of a fingerprint digest in bytes
pub const FINGERPRINT_SIZE: usize = 32;
/// Number of hex characters shown for an abbreviated fingerprint
pub const SHORT_FINGERPRINT_LEN: usize = 8;

const PUBLIC_KEY_TAG: &str = "PUBLIC KEY";
const PRIVATE_KEY_TAG: &str = "PRIVATE KEY";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("malformed key encoding: {0}")]
    MalformedKeyEncoding(String),
}

/// Which half of a key pair an encoded artifact carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Public,
    Private,
}

impl KeyKind {
    /// The label between `BEGIN`/`END` in the artifact markers
    pub fn tag(&self) -> &'static str {
        match self {
            KeyKind::Public => PUBLIC_KEY_TAG,
            KeyKind::Private => PRIVATE_KEY_TAG,
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            PUBLIC_KEY_TAG => Some(KeyKind::Public),
            PRIVATE_KEY_TAG => Some(KeyKind::Private),
            _ => None,
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Wrap raw key bytes in a `-----BEGIN <KIND> KEY-----` / `-----END <KIND> KEY-----`
/// envelope with a newline-delimited base64 body.
pub fn encode(kind: KeyKind, raw: &[u8]) -> String {
    let pem = Pem::new(kind.tag(), raw);
    pem::encode_config(&pem, EncodeConfig::new().set_line_ending(LineEnding::LF))
}

/// Strip the markers of an encoded key and return the decoded body.
///
/// Accepts either a public or a private key envelope. Use [`decode_kind`]
/// when the caller needs one half specifically.
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    decode_tagged(text).map(|(_, bytes)| bytes)
}

/// Decode an encoded key, requiring its markers to name `kind`.
pub fn decode_kind(kind: KeyKind, text: &str) -> Result<Vec<u8>, CodecError> {
    let (found, bytes) = decode_tagged(text)?;
    if found != kind {
        return Err(CodecError::MalformedKeyEncoding(format!(
            "expected {} markers, found {}",
            kind, found
        )));
    }
    Ok(bytes)
}

fn decode_tagged(text: &str) -> Result<(KeyKind, Vec<u8>), CodecError> {
    let normalized = format!("{}\n", text.trim());
    let pem = pem::parse(normalized)
        .map_err(|e| CodecError::MalformedKeyEncoding(e.to_string()))?;

    let kind = KeyKind::from_tag(pem.tag()).ok_or_else(|| {
        CodecError::MalformedKeyEncoding(format!("unsupported key marker: {}", pem.tag()))
    })?;

    if pem.contents().is_empty() {
        return Err(CodecError::MalformedKeyEncoding(
            "key body is empty".to_string(),
        ));
    }

    Ok((kind, pem.into_contents()))
}

/// Hash `bytes` with SHA-256 into a [`Fingerprint`].
pub fn digest(bytes: &[u8]) -> Fingerprint {
    let hash = Sha256::digest(bytes);
    let mut buff = [0u8; FINGERPRINT_SIZE];
    buff.copy_from_slice(&hash);
    Fingerprint(buff)
}

/// SHA-256 digest of an encoded public key, rendered as 64 lowercase hex characters.
///
/// The digest is taken over the encoded text exactly as supplied, so the
/// same artifact always yields the same fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Fingerprint([u8; FINGERPRINT_SIZE]);

impl Fingerprint {
    pub fn to_bytes(&self) -> [u8; FINGERPRINT_SIZE] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(hex: &str) -> Result<Self, CodecError> {
        let mut buff = [0u8; FINGERPRINT_SIZE];
        hex::decode_to_slice(hex, &mut buff)
            .map_err(|e| CodecError::MalformedKeyEncoding(format!("fingerprint: {}", e)))?;
        Ok(Self(buff))
    }

    /// Leading hex characters, as shown beside a post's author
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(SHORT_FINGERPRINT_LEN);
        hex
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.to_hex()
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = CodecError;
    fn try_from(hex: String) -> Result<Self, Self::Error> {
        Self::from_hex(&hex)
    }
}
