use std::io::Read;

use bytes::Bytes;

use super::{Charset, DeserializeSink, FormatError, SerializeError, Serializer, UnsupportedCharset};

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// A [`Serializer`] for JSON payloads, backed by [`serde_json`].
///
/// It is the default serializer for both directions in a fresh [`SerializerRegistry`].
///
/// # Errors carry a path
///
/// When a payload fails to deserialize, the returned [`FormatError`] points at the
/// offending value (e.g. `items[2].price`).
///
/// # Encoding
///
/// JSON payloads are always UTF-8. [`JsonSerializer::with_charset`] rejects any other
/// charset upfront.
///
/// [`SerializerRegistry`]: super::SerializerRegistry
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    content_type: String,
    pretty: bool,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSerializer {
    /// A compact JSON serializer emitting `application/json`.
    pub fn new() -> Self {
        Self {
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            pretty: false,
        }
    }

    /// A JSON serializer using the given text encoding.
    ///
    /// Only [`Charset::Utf8`] is accepted.
    pub fn with_charset(charset: Charset) -> Result<Self, UnsupportedCharset> {
        if charset != Charset::Utf8 {
            return Err(UnsupportedCharset {
                serializer: "JsonSerializer",
                charset,
            });
        }
        Ok(Self::new())
    }

    /// Emit indented JSON.
    pub fn set_pretty(&mut self, pretty: bool) -> &mut Self {
        self.pretty = pretty;
        self
    }

    /// Returns `true` if the serializer emits indented JSON.
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Use a different JSON media type, e.g. `application/vnd.api+json`.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = content_type.into();
        self
    }
}

impl Serializer for JsonSerializer {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn serialize(&self, value: &dyn erased_serde::Serialize) -> Result<Bytes, SerializeError> {
        let outcome = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        outcome
            .map(Bytes::from)
            .map_err(|e| SerializeError::new(self.content_type.clone(), e))
    }

    fn deserialize_erased(
        &self,
        input: &mut dyn Read,
        sink: &mut DeserializeSink<'_>,
    ) -> Result<(), FormatError> {
        let mut deserializer = serde_json::Deserializer::from_reader(input);
        let mut track = serde_path_to_error::Track::new();
        let outcome = {
            let tracked = serde_path_to_error::Deserializer::new(&mut deserializer, &mut track);
            let mut erased = <dyn erased_serde::Deserializer>::erase(tracked);
            sink(&mut erased)
        };
        if let Err(e) = outcome {
            let path = track.path().to_string();
            let error = FormatError::new(e);
            // `.` is the path of the document root: it carries no information.
            return Err(if path == "." { error } else { error.at_path(path) });
        }
        // Reject trailing characters after the JSON document.
        deserializer.end().map_err(FormatError::new)
    }
}
