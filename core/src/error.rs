//! Error types for the catalog data-transfer layer.
//!
//! # Design
//! `TransferError` is the only error callers of `DataTransferService` see.
//! Every non-2xx response lands in `NetworkFailure` regardless of status
//! family; the status code travels inside `NetworkError::BadStatus` for
//! diagnostics only. `ParsingFailed` keeps the decoder's error as its source
//! so the cause can be logged or displayed.

use thiserror::Error;

/// Errors surfaced by `DataTransferService` and the endpoint builders.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The URL components did not form a valid absolute URL. Never reaches
    /// the network.
    #[error("invalid URL: {0}")]
    ResolutionFailed(String),

    /// The transport failed, or the server answered outside `[200, 300)`.
    #[error("network connection is bad")]
    NetworkFailure(#[source] NetworkError),

    /// The server answered successfully but sent no body where one was
    /// required.
    #[error("no response body")]
    NoResponse,

    /// The body could not be decoded into the expected type.
    #[error("failed to decode response")]
    ParsingFailed(#[source] DecodeError),

    /// The request payload could not be encoded.
    #[error("failed to encode request body: {0}")]
    EncodingFailed(String),
}

/// Transport-level failure reasons, all reported as
/// `TransferError::NetworkFailure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Connection, TLS or I/O failure before a status line was read.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The transport's timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// A response arrived with a status outside `[200, 300)`.
    #[error("unexpected HTTP status {0}")]
    BadStatus(u16),
}

/// Reasons a response body could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("response is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("unexpected text response: {0}")]
    Text(#[from] serde::de::value::Error),
}
