//! Response decoders: raw bytes in, typed values out.

use serde::de::{DeserializeOwned, IntoDeserializer};

use crate::error::DecodeError;

/// Turns a response body into a typed value.
///
/// Implementations are pure: the same bytes and target type always give the
/// same result.
pub trait ResponseDecoder: Send + Sync {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, DecodeError>;

    /// Decode for endpoints whose success carries no content. Any body is
    /// accepted.
    fn decode_empty(&self, _data: &[u8]) -> Result<(), DecodeError> {
        Ok(())
    }
}

/// JSON bodies via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResponseDecoder;

impl ResponseDecoder for JsonResponseDecoder {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, DecodeError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Plain-text bodies. The UTF-8 text is handed to `T`'s deserializer as a
/// single string, so `String` and string-like newtypes decode directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTextResponseDecoder;

impl ResponseDecoder for RawTextResponseDecoder {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, DecodeError> {
        let text = std::str::from_utf8(data)?;
        let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
            text.into_deserializer();
        Ok(T::deserialize(deserializer)?)
    }
}
