/**
 * Key material.
 *  - Framed base64 artifacts and fingerprints
 *  - RSA key pairs and PKCS#1 v1.5 signatures
 *  - Minting new pairs as downloadable artifacts
 */
pub mod crypto;
/**
 * Client view of the remote post ledger:
 *  fetching, display ordering, and the
 *  session-local identity cache.
 */
pub mod ledger;
/**
 * Sign-in state for the local user.
 */
pub mod session;
/**
 * Signing user content and submitting it
 *  to the ledger.
 */
pub mod signer;
/**
 * Helper for reporting build version information
 *  captured at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::crypto::{mint, DirectorySink, Fingerprint, PublicKey, SecretKey};
    pub use crate::ledger::{
        DisplayIdentity, IdentityCache, Ledger, LedgerOrder, LedgerProvider, LedgerSync, Post,
    };
    pub use crate::session::{SessionIdentity, SignInSession};
    pub use crate::signer::{ContentSigner, SubmissionPayload};
    pub use crate::version::build_info;
}
