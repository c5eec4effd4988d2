use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand_core::{CryptoRngCore, OsRng};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use super::codec::{self, CodecError, KeyKind};

/// Modulus size of minted keys
pub const RSA_KEY_BITS: usize = 2048;
/// Size of a PKCS#1 v1.5 signature made with a minted key
pub const SIGNATURE_SIZE: usize = RSA_KEY_BITS / 8;

/// Errors that can occur during key operations
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("key error: {0}")]
    Default(#[from] anyhow::Error),
}

/// RSA public key used to verify PKCS#1 v1.5 / SHA-256 signatures
///
/// Exported as SubjectPublicKeyInfo DER and wrapped in `PUBLIC KEY` markers
/// when it crosses the file boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl From<RsaPublicKey> for PublicKey {
    fn from(key: RsaPublicKey) -> Self {
        PublicKey(key)
    }
}

impl PublicKey {
    /// Parse a public key from SubjectPublicKeyInfo DER bytes
    pub fn from_der(der: &[u8]) -> Result<Self, KeyError> {
        let key = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| anyhow::anyhow!("invalid public key: {}", e))?;
        Ok(Self(key))
    }

    /// Export as SubjectPublicKeyInfo DER bytes
    pub fn to_der(&self) -> Result<Vec<u8>, KeyError> {
        let doc = self
            .0
            .to_public_key_der()
            .map_err(|e| anyhow::anyhow!("public key export failed: {}", e))?;
        Ok(doc.as_bytes().to_vec())
    }

    /// Encode as a `PUBLIC KEY` artifact
    pub fn to_pem(&self) -> Result<String, KeyError> {
        Ok(codec::encode(KeyKind::Public, &self.to_der()?))
    }

    /// Parse a `PUBLIC KEY` artifact
    pub fn from_pem(text: &str) -> Result<Self, KeyError> {
        let der = codec::decode_kind(KeyKind::Public, text)?;
        Self::from_der(&der)
    }

    /// Verify a base64 PKCS#1 v1.5 / SHA-256 signature over `msg`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The signature is not valid base64 or has the wrong shape
    /// - The signature does not match `msg` under this key
    pub fn verify(&self, msg: &[u8], signature_b64: &str) -> Result<(), KeyError> {
        let bytes = BASE64
            .decode(signature_b64.trim())
            .map_err(|e| anyhow::anyhow!("signature base64 decode error: {}", e))?;
        let signature = Signature::try_from(bytes.as_slice())
            .map_err(|e| anyhow::anyhow!("malformed signature: {}", e))?;

        VerifyingKey::<Sha256>::new(self.0.clone())
            .verify(msg, &signature)
            .map_err(|_| anyhow::anyhow!("signature does not match").into())
    }
}

/// RSA private key used to produce PKCS#1 v1.5 / SHA-256 signatures
///
/// Exported as PKCS#8 DER and wrapped in `PRIVATE KEY` markers. Nothing in
/// this crate holds one longer than the call that needs it.
#[derive(Clone)]
pub struct SecretKey(RsaPrivateKey);

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

impl SecretKey {
    /// Generate a fresh 2048-bit key (public exponent 65537) from the OS RNG
    pub fn generate() -> Result<Self, KeyError> {
        Self::generate_with(&mut OsRng)
    }

    /// Generate a fresh 2048-bit key from the supplied RNG
    pub fn generate_with<R: CryptoRngCore + ?Sized>(rng: &mut R) -> Result<Self, KeyError> {
        let key = RsaPrivateKey::new(rng, RSA_KEY_BITS)
            .map_err(|e| anyhow::anyhow!("rsa key generation failed: {}", e))?;
        Ok(Self(key))
    }

    /// Derive the public half of this key
    pub fn public(&self) -> PublicKey {
        PublicKey(self.0.to_public_key())
    }

    /// Parse a private key from PKCS#8 DER bytes
    pub fn from_der(der: &[u8]) -> Result<Self, KeyError> {
        let key = RsaPrivateKey::from_pkcs8_der(der)
            .map_err(|e| anyhow::anyhow!("invalid private key: {}", e))?;
        Ok(Self(key))
    }

    /// Export as PKCS#8 DER bytes
    pub fn to_der(&self) -> Result<Vec<u8>, KeyError> {
        let doc = self
            .0
            .to_pkcs8_der()
            .map_err(|e| anyhow::anyhow!("private key export failed: {}", e))?;
        Ok(doc.as_bytes().to_vec())
    }

    /// Encode as a `PRIVATE KEY` artifact
    pub fn to_pem(&self) -> Result<String, KeyError> {
        Ok(codec::encode(KeyKind::Private, &self.to_der()?))
    }

    /// Parse a `PRIVATE KEY` artifact
    pub fn from_pem(text: &str) -> Result<Self, KeyError> {
        let der = codec::decode_kind(KeyKind::Private, text)?;
        Self::from_der(&der)
    }

    /// Sign `msg` with PKCS#1 v1.5 over SHA-256, returning the raw signature bytes
    pub fn sign(&self, msg: &[u8]) -> Vec<u8> {
        let signing_key = SigningKey::<Sha256>::new(self.0.clone());
        signing_key.sign(msg).to_vec()
    }

    /// Sign `msg` and encode the signature as standard base64
    pub fn sign_b64(&self, msg: &[u8]) -> String {
        BASE64.encode(self.sign(msg))
    }
}
