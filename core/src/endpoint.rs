//! Endpoint descriptors: immutable descriptions of one API call.
//!
//! # Design
//! An `Endpoint<R, D>` binds a resolved `HttpRequest` to the response type `R`
//! it is expected to produce and the decoder `D` that produces it. The
//! response type is a phantom parameter, so the service can only hand back
//! what the descriptor promised. Endpoints that succeed without content use
//! the `NoContent` marker, which has no `Deserialize` impl and therefore can
//! only go through `DataTransferService::request_empty`.
//!
//! Descriptors are built from a `Url` that already passed
//! `UrlBuilder::build`, so an unresolvable URL never yields a descriptor.

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::decoder::{JsonResponseDecoder, ResponseDecoder};
use crate::error::TransferError;
use crate::http::{HttpMethod, HttpRequest};

/// What a successful response is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Value,
    Empty,
}

/// Marker response type for endpoints whose success has no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoContent;

/// Capabilities the data-transfer service needs from a descriptor.
pub trait Requestable: Send + Sync {
    type Response;
    type Decoder: ResponseDecoder;

    fn request(&self) -> &HttpRequest;
    fn response_kind(&self) -> ResponseKind;
    fn decoder(&self) -> &Self::Decoder;
}

/// A resolved request paired with its expected response type and decoder.
pub struct Endpoint<R, D = JsonResponseDecoder> {
    request: HttpRequest,
    kind: ResponseKind,
    decoder: D,
    response: PhantomData<fn() -> R>,
}

impl<R, D: ResponseDecoder> Requestable for Endpoint<R, D> {
    type Response = R;
    type Decoder = D;

    fn request(&self) -> &HttpRequest {
        &self.request
    }

    fn response_kind(&self) -> ResponseKind {
        self.kind
    }

    fn decoder(&self) -> &D {
        &self.decoder
    }
}

impl<R, D: Clone> Clone for Endpoint<R, D> {
    fn clone(&self) -> Self {
        Self {
            request: self.request.clone(),
            kind: self.kind,
            decoder: self.decoder.clone(),
            response: PhantomData,
        }
    }
}

impl<R, D> fmt::Debug for Endpoint<R, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("method", &self.request.method)
            .field("url", &self.request.url.as_str())
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Accumulates headers and body, then fixes the response type.
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    request: HttpRequest,
}

impl EndpointBuilder {
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            request: HttpRequest {
                method,
                url,
                headers: Vec::new(),
                body: None,
            },
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: Url) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn patch(url: Url) -> Self {
        Self::new(HttpMethod::Patch, url)
    }

    pub fn delete(url: Url) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push((name.into(), value.into()));
        self
    }

    /// Attach an already encoded body with its content type.
    pub fn body(self, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        let mut builder = self.header("content-type", content_type);
        builder.request.body = Some(body.into());
        builder
    }

    pub fn json_body<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, TransferError> {
        let encoded =
            serde_json::to_vec(body).map_err(|e| TransferError::EncodingFailed(e.to_string()))?;
        Ok(self.body("application/json", encoded))
    }

    /// Expect a JSON body decoding into `T`.
    pub fn returning<T: DeserializeOwned>(self) -> Endpoint<T> {
        self.decode_with(JsonResponseDecoder)
    }

    /// Expect a body decoding into `T` through `decoder`.
    pub fn decode_with<T: DeserializeOwned, D: ResponseDecoder>(self, decoder: D) -> Endpoint<T, D> {
        Endpoint {
            request: self.request,
            kind: ResponseKind::Value,
            decoder,
            response: PhantomData,
        }
    }

    /// Expect success without content.
    pub fn returning_nothing(self) -> Endpoint<NoContent> {
        Endpoint {
            request: self.request,
            kind: ResponseKind::Empty,
            decoder: JsonResponseDecoder,
            response: PhantomData,
        }
    }
}
