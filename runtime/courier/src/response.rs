//! Deserialize response bodies.
use std::sync::Arc;

use http::HeaderMap;
use http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

use crate::serializer::{FormatError, SerializerRegistry};

/// Deserializes response bodies with the inbound serializer registered for the target type.
///
/// The `Content-Type` of the response is used to pick among the serializers available for
/// the target type, see [`SerializerRegistry::resolve_for_content_type`].
#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    registry: Arc<SerializerRegistry>,
}

impl ResponseDecoder {
    pub fn new(registry: Arc<SerializerRegistry>) -> Self {
        Self { registry }
    }

    /// Deserialize a buffered body into `T`.
    pub fn decode<T>(&self, headers: &HeaderMap, body: &[u8]) -> Result<T, DecodeError>
    where
        T: DeserializeOwned + 'static,
    {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());
        let serializer = self.registry.resolve_for_content_type::<T>(content_type);
        tracing::trace!(
            type_name = std::any::type_name::<T>(),
            content_type = serializer.content_type(),
            "Decoding response body"
        );
        Ok(serializer.deserialize(body)?)
    }

    /// Buffer the body of `response` in memory, then deserialize it into `T`.
    #[tracing::instrument(name = "decode_response", skip_all, fields(status = %response.status()))]
    pub async fn decode_body<T, B>(&self, response: http::Response<B>) -> Result<T, DecodeError>
    where
        T: DeserializeOwned + 'static,
        B: http_body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = response.into_parts();
        let bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => return Err(UnexpectedBufferError { source: e.into() }.into()),
        };
        self.decode(&parts.headers, &bytes)
    }
}

/// The error returned by [`ResponseDecoder`] when a response body can't be decoded.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(transparent)]
    /// See [`FormatError`] for details.
    Format(#[from] FormatError),
    #[error(transparent)]
    /// See [`UnexpectedBufferError`] for details.
    Buffer(#[from] UnexpectedBufferError),
}

#[derive(Debug, thiserror::Error)]
#[error("Something went wrong when reading the response body")]
#[non_exhaustive]
/// The body stream failed before it was fully read.
pub struct UnexpectedBufferError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}
