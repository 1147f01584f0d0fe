//! Errors that can happen when (de)serializing payloads or configuring serializers.
use super::Charset;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
#[error(
    "Failed to deserialize the payload into `{}`{}",
    .type_name.unwrap_or("the target type"),
    .path.as_ref().map(|p| format!(" (at `{p}`)")).unwrap_or_default()
)]
#[non_exhaustive]
/// The payload doesn't match the shape of the target type.
///
/// It is surfaced as is: courier never retries a failed deserialization.
pub struct FormatError {
    /// The name of the type we tried to deserialize into, when known.
    pub type_name: Option<&'static str>,
    /// The location of the offending value inside the payload, when the format can track it.
    pub path: Option<String>,
    #[source]
    source: BoxError,
}

impl FormatError {
    /// Build a new [`FormatError`] from the underlying parsing error.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            type_name: None,
            path: None,
            source: source.into(),
        }
    }

    /// Record where, inside the payload, deserialization failed.
    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub(crate) fn for_type(mut self, type_name: &'static str) -> Self {
        self.type_name.get_or_insert(type_name);
        self
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to serialize the payload as `{content_type}`")]
#[non_exhaustive]
/// A value couldn't be represented in the target format.
pub struct SerializeError {
    /// The content type of the serializer that failed.
    pub content_type: String,
    #[source]
    source: BoxError,
}

impl SerializeError {
    /// Build a new [`SerializeError`] for a serializer emitting `content_type`.
    pub fn new(content_type: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            content_type: content_type.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("`{serializer}` can't encode payloads as `{charset}`. It only supports UTF-8")]
#[non_exhaustive]
/// A serializer was asked to use a text encoding it doesn't support.
///
/// It is returned when the serializer is built, never when it's used.
pub struct UnsupportedCharset {
    /// The name of the serializer.
    pub serializer: &'static str,
    /// The requested encoding.
    pub charset: Charset,
}
