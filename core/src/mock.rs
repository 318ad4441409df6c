//! Deterministic in-process transport for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::NetworkError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Answers every request with the same canned result and counts calls.
#[derive(Debug)]
pub struct MockTransport {
    response: Result<HttpResponse, NetworkError>,
    calls: AtomicUsize,
}

impl MockTransport {
    pub fn responding(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            response: Ok(HttpResponse::new(status, body)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: NetworkError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `execute` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}
