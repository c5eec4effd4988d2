//! Signing and submission of user-authored posts
//!
//! The signer never checks that the supplied private key belongs to the
//! session's public key. The ledger service verifies every submission and is
//! expected to reject mismatched pairs, so a mismatch surfaces as
//! [`SubmitError::SubmissionFailed`] rather than as a local error.

use serde::{Deserialize, Serialize};

use crate::crypto::{KeyError, SecretKey};
use crate::ledger::{Ledger, LedgerProvider, LedgerSync, LedgerSyncError};
use crate::session::SignInSession;

/// Body of a ledger submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub post_content: String,
    pub public_key: String,
    /// Base64 PKCS#1 v1.5 / SHA-256 signature over the UTF-8 content
    pub signature: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("no public key established for this session")]
    NotSignedIn,
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(#[from] KeyError),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Sign(#[from] SignError),
    #[error("submission failed: {0}")]
    SubmissionFailed(String),
}

/// Outcome of an accepted submission
#[derive(Debug)]
pub struct Submission {
    pub payload: SubmissionPayload,
    /// The re-fetch triggered by the acceptance
    pub refresh: Result<Ledger, LedgerSyncError>,
}

/// Signs content on behalf of the signed-in session
#[derive(Debug, Clone, Copy)]
pub struct ContentSigner<'a> {
    session: &'a SignInSession,
}

impl<'a> ContentSigner<'a> {
    pub fn new(session: &'a SignInSession) -> Self {
        Self { session }
    }

    /// Sign `content` with the private key artifact and assemble the payload.
    ///
    /// The private key is parsed for this call only and dropped before returning.
    pub fn sign(
        &self,
        content: &str,
        private_artifact: &str,
    ) -> Result<SubmissionPayload, SignError> {
        let identity = self.session.identity().ok_or(SignError::NotSignedIn)?;
        let secret_key = SecretKey::from_pem(private_artifact)?;

        Ok(SubmissionPayload {
            post_content: content.to_string(),
            public_key: identity.raw_public_key.clone(),
            signature: secret_key.sign_b64(content.as_bytes()),
        })
    }

    /// Sign `content`, submit it, and re-fetch the ledger once it is accepted.
    ///
    /// A rejected or failed submission is not retried.
    pub async fn submit<P: LedgerProvider>(
        &self,
        sync: &LedgerSync<P>,
        content: &str,
        private_artifact: &str,
    ) -> Result<Submission, SubmitError> {
        let payload = self.sign(content, private_artifact)?;

        if let Err(e) = sync.provider().submit(&payload).await {
            tracing::warn!("submission failed: {}", e);
            return Err(SubmitError::SubmissionFailed(e.to_string()));
        }
        tracing::info!(bytes = payload.post_content.len(), "post submitted");

        let refresh = sync.refresh().await;
        Ok(Submission { payload, refresh })
    }
}
