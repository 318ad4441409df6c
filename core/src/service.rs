//! The single entry point callers use to run an endpoint.
//!
//! # Design
//! `DataTransferService` owns nothing but a shared handle to a `Transport`.
//! Every call is one fresh round trip with no retries and no cached
//! results, so the service can be cloned freely and used from many tasks at
//! once. Dropping a returned future abandons the call; nothing else needs
//! cleaning up.

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::decoder::ResponseDecoder;
use crate::endpoint::{NoContent, Requestable};
use crate::error::TransferError;
use crate::transport::{RequestOutcome, Transport};

#[derive(Clone)]
pub struct DataTransferService {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for DataTransferService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTransferService").finish_non_exhaustive()
    }
}

impl DataTransferService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Run an endpoint that answers with a value and decode it into `T`.
    pub async fn request<E, T>(&self, endpoint: &E) -> Result<T, TransferError>
    where
        E: Requestable<Response = T>,
        T: DeserializeOwned,
    {
        let body = self.execute(endpoint).await?.ok_or_else(|| {
            warn!(url = %endpoint.request().url, "empty body where a value was expected");
            TransferError::NoResponse
        })?;

        endpoint.decoder().decode(&body).map_err(|e| {
            warn!(url = %endpoint.request().url, error = %e, "response did not decode");
            TransferError::ParsingFailed(e)
        })
    }

    /// Run an endpoint whose success carries no content.
    pub async fn request_empty<E>(&self, endpoint: &E) -> Result<(), TransferError>
    where
        E: Requestable<Response = NoContent>,
    {
        let body = self.execute(endpoint).await?.unwrap_or_default();
        endpoint
            .decoder()
            .decode_empty(&body)
            .map_err(TransferError::ParsingFailed)
    }

    async fn execute<E: Requestable>(&self, endpoint: &E) -> Result<Option<Bytes>, TransferError> {
        let request = endpoint.request();
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            kind = ?endpoint.response_kind(),
            "dispatching request"
        );

        let outcome = RequestOutcome::from(self.transport.execute(request).await);
        outcome.into_result().map_err(|e| {
            warn!(method = request.method.as_str(), url = %request.url, error = %e, "request failed");
            TransferError::NetworkFailure(e)
        })
    }
}
