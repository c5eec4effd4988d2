use reqwest::{header::HeaderMap, header::HeaderValue, Client, Response};
use url::Url;

use super::error::ApiError;
use super::ApiRequest;

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    /// Send a request and decode its JSON response body
    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let response = self.send(request).await?;
        Ok(response.json::<T::Response>().await?)
    }

    /// Send a request, treating any success status as done and ignoring the body
    pub async fn call_accepted<T: ApiRequest>(&self, request: T) -> Result<(), ApiError> {
        self.send(request).await?;
        Ok(())
    }

    async fn send<T: ApiRequest>(&self, request: T) -> Result<Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client)?;
        let response = request_builder.send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status(
                response.status(),
                response.text().await?,
            ))
        }
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }
}
