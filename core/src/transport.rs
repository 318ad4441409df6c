//! The network seam: anything that can execute one `HttpRequest`.
//!
//! # Design
//! `Transport::execute` performs exactly one round trip and reports the raw
//! status, headers and body. Status interpretation happens afterwards in
//! `RequestOutcome`, so every transport (real or fake) is classified the
//! same way: `[200, 300)` is success, anything else is a failure that the
//! service reports uniformly as `NetworkFailure`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::NetworkError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a single HTTP request. No retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError>;
}

/// Classified result of one transport round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Status in `[200, 300)`. `None` when the body was empty.
    Success(Option<Bytes>),
    TransportFailure(NetworkError),
    HttpFailure(u16),
}

impl From<Result<HttpResponse, NetworkError>> for RequestOutcome {
    fn from(result: Result<HttpResponse, NetworkError>) -> Self {
        match result {
            Ok(response) if response.is_success() => {
                if response.body.is_empty() {
                    RequestOutcome::Success(None)
                } else {
                    RequestOutcome::Success(Some(response.body))
                }
            }
            Ok(response) => RequestOutcome::HttpFailure(response.status),
            Err(err) => RequestOutcome::TransportFailure(err),
        }
    }
}

impl RequestOutcome {
    pub fn into_result(self) -> Result<Option<Bytes>, NetworkError> {
        match self {
            RequestOutcome::Success(body) => Ok(body),
            RequestOutcome::TransportFailure(err) => Err(err),
            RequestOutcome::HttpFailure(status) => Err(NetworkError::BadStatus(status)),
        }
    }
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client that gives up after `timeout`, reporting
    /// `NetworkError::Timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NetworkError::Connection(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, NetworkError> {
        match config.request_timeout {
            Some(timeout) => Self::with_timeout(timeout),
            None => Ok(Self::new()),
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

fn network_error(err: reqwest::Error) -> NetworkError {
    if err.is_timeout() {
        NetworkError::Timeout
    } else {
        NetworkError::Connection(err.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
        let mut builder = self
            .client
            .request(reqwest_method(request.method), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            debug!(url = %request.url, error = %e, "request failed before a response arrived");
            network_error(e)
        })?;

        let status = response.status().as_u16();
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
        let body = response.bytes().await.map_err(network_error)?;
        debug!(url = %request.url, status, bytes = body.len(), "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
