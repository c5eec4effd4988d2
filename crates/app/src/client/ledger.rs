use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use url::Url;

use common::ledger::{LedgerProvider, Post};
use common::signer::SubmissionPayload;

use super::{ApiClient, ApiError, ApiRequest};

/// `GET <ledger_path>`: the whole ledger in append order
#[derive(Debug, Clone)]
pub struct ChainRequest {
    pub path: String,
}

impl ApiRequest for ChainRequest {
    type Response = Vec<Post>;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&self.path)?;
        Ok(client.get(full_url))
    }
}

/// `POST <submission_path>` with a signed post
#[derive(Debug, Clone)]
pub struct MessageRequest {
    pub path: String,
    pub payload: SubmissionPayload,
}

impl ApiRequest for MessageRequest {
    /// Only the status of the reply matters
    type Response = serde_json::Value;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&self.path)?;
        Ok(client.post(full_url).json(&self.payload))
    }
}

/// Ledger service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpLedgerProvider {
    client: ApiClient,
    ledger_path: String,
    submission_path: String,
}

impl HttpLedgerProvider {
    pub fn new(client: ApiClient, ledger_path: &str, submission_path: &str) -> Self {
        Self {
            client,
            ledger_path: ledger_path.to_string(),
            submission_path: submission_path.to_string(),
        }
    }
}

#[async_trait]
impl LedgerProvider for HttpLedgerProvider {
    type Error = ApiError;

    async fn fetch(&self) -> Result<Vec<Post>, Self::Error> {
        let request = ChainRequest {
            path: self.ledger_path.clone(),
        };
        self.client.call(request).await
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), Self::Error> {
        let request = MessageRequest {
            path: self.submission_path.clone(),
            payload: payload.clone(),
        };
        self.client.call_accepted(request).await
    }
}
