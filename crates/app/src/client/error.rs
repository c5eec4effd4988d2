use reqwest::StatusCode;

/// Failures reaching the ledger service's read and submission endpoints
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, TLS, or response body decoding failed
    #[error("ledger transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The remote or an endpoint path does not form a valid URL
    #[error("invalid ledger url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The service answered with a non-2xx status; for a submission this
    /// means the post was rejected
    #[error("ledger service returned {0}: {1}")]
    Status(StatusCode, String),
}
