//! Key material for chirp
//!
//! - **Codec**: `BEGIN`/`END` framed base64 artifacts and SHA-256 fingerprints
//! - **Keys**: RSA-2048 key pairs signing with PKCS#1 v1.5 over SHA-256
//! - **Minter**: fresh key pairs emitted as `public_key.pem` / `private_key.pem`
//!
//! Keys are never stored by this crate. A minted pair leaves through an
//! [`ArtifactSink`], and a private key is parsed only for the duration of a
//! single signing call.

pub mod codec;
mod keys;
mod minter;

pub use codec::{CodecError, Fingerprint, KeyKind};
pub use keys::{KeyError, PublicKey, SecretKey, RSA_KEY_BITS, SIGNATURE_SIZE};
pub use minter::{
    mint, ArtifactSink, DirectorySink, MintError, MintedArtifacts, PRIVATE_KEY_FILE_NAME,
    PUBLIC_KEY_FILE_NAME,
};
