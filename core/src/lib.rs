//! Data-transfer layer for the OpenMarket product catalog.
//!
//! # Overview
//! Callers describe a call with an `Endpoint` (usually via
//! `ProductEndpoints`), then hand it to `DataTransferService`, which runs it
//! through a `Transport` and decodes the body with the endpoint's
//! `ResponseDecoder`. Failures come back as one `TransferError`.
//!
//! # Design
//! - Building an endpoint is pure; a URL that does not resolve never becomes
//!   an endpoint (`TransferError::ResolutionFailed`).
//! - `Transport` is the only I/O seam. `ReqwestTransport` talks to the real
//!   service; `MockTransport` answers deterministically in tests.
//! - Non-2xx statuses are not told apart: all of them surface as
//!   `TransferError::NetworkFailure`.
//! - No retries, no caches. The service is stateless and cheap to clone.

pub mod catalog;
pub mod config;
pub mod decoder;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod mock;
pub mod multipart;
pub mod service;
pub mod transport;
pub mod types;
pub mod url_builder;

pub use catalog::ProductEndpoints;
pub use config::{ClientConfig, ConfigError};
pub use decoder::{JsonResponseDecoder, RawTextResponseDecoder, ResponseDecoder};
pub use endpoint::{Endpoint, EndpointBuilder, NoContent, Requestable, ResponseKind};
pub use error::{DecodeError, NetworkError, TransferError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mock::MockTransport;
pub use multipart::MultipartForm;
pub use service::DataTransferService;
pub use transport::{ReqwestTransport, RequestOutcome, Transport};
pub use types::{
    Currency, ImageFile, NewProduct, Product, ProductDetail, ProductImage, ProductPage, ProductUpdate,
    SecretRequest, Vendor,
};
pub use url_builder::UrlBuilder;
