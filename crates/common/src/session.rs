use serde::{Deserialize, Serialize};

use crate::crypto::codec::{self, CodecError, Fingerprint, KeyKind};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(#[from] CodecError),
}

/// The local user's identity for the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub fingerprint: Fingerprint,
    /// The public key artifact exactly as it was supplied
    pub raw_public_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn(SessionIdentity),
}

/// Sign-in state machine: `LoggedOut` until a public key is supplied, then
/// `LoggedIn` for the rest of the process.
///
/// A later sign-in replaces the identity outright. There is no logout.
#[derive(Debug, Clone, Default)]
pub struct SignInSession {
    state: SessionState,
}

impl SignInSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        match &self.state {
            SessionState::LoggedIn(identity) => Some(identity),
            SessionState::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.identity().is_some()
    }

    /// Establish the session from an uploaded public key artifact.
    ///
    /// The fingerprint is taken over the artifact text as uploaded. On a decode
    /// failure the current state is left untouched.
    pub fn sign_in(&mut self, public_key_text: &str) -> Result<SessionIdentity, SessionError> {
        codec::decode_kind(KeyKind::Public, public_key_text)?;

        let identity = SessionIdentity {
            fingerprint: codec::digest(public_key_text.as_bytes()),
            raw_public_key: public_key_text.to_string(),
        };

        if let Some(previous) = self.identity() {
            if previous.fingerprint != identity.fingerprint {
                tracing::info!(
                    previous = %previous.fingerprint.short(),
                    fingerprint = %identity.fingerprint.short(),
                    "switching session identity"
                );
            }
        } else {
            tracing::info!(fingerprint = %identity.fingerprint.short(), "signed in");
        }

        self.state = SessionState::LoggedIn(identity.clone());
        Ok(identity)
    }
}
