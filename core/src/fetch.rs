//! Network primitive used by the transport.
//!
//! # Design
//! `Fetch` performs exactly one HTTP round-trip and knows nothing about
//! retries or timeouts. It receives a `CancellationToken` scoped to a single
//! attempt and must give up with `FetchError::Cancelled` once the token
//! fires. Non-2xx statuses are *not* errors at this layer; they come back as
//! an `HttpResponse` for the transport to classify.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(
        &self,
        request: &HttpRequest,
        cancel: CancellationToken,
    ) -> Result<HttpResponse, FetchError>;
}

#[async_trait]
impl<F: Fetch + ?Sized> Fetch for Arc<F> {
    async fn fetch(
        &self,
        request: &HttpRequest,
        cancel: CancellationToken,
    ) -> Result<HttpResponse, FetchError> {
        (**self).fetch(request, cancel).await
    }
}

/// `Fetch` over a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut builder = self.client.request(reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // An error status already answers the call; a body that cannot be
        // read leaves the message to the status text.
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(FetchError::Connection(e.to_string())),
            Err(e) => {
                tracing::debug!(status = status.as_u16(), error = %e, "error body unreadable");
                String::new()
            }
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
        })
    }
}

#[async_trait]
impl Fetch for ReqwestFetcher {
    async fn fetch(
        &self,
        request: &HttpRequest,
        cancel: CancellationToken,
    ) -> Result<HttpResponse, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.execute(request) => result,
        }
    }
}

fn reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}
