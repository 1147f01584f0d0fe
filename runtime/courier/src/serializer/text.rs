use std::io::Read;

use bytes::Bytes;

use super::{Charset, DeserializeSink, FormatError, SerializeError, Serializer};

/// A [`Serializer`] for scalar `text/plain` payloads.
///
/// Outbound, the value must serialize to a string, a number, a boolean or a character.
/// Inbound, the decoded text is parsed into the target type: strings, numbers, booleans,
/// characters and unit enum variants are supported.
///
/// Unlike JSON and url-encoded forms, plain text can be encoded with any of the supported
/// [`Charset`]s.
#[derive(Debug, Default, Clone)]
pub struct PlainTextSerializer {
    charset: Charset,
}

impl PlainTextSerializer {
    /// A UTF-8 plain text serializer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain text serializer using the given text encoding.
    pub fn with_charset(charset: Charset) -> Self {
        Self { charset }
    }

    /// Change the text encoding used by this serializer.
    pub fn set_charset(&mut self, charset: Charset) -> &mut Self {
        self.charset = charset;
        self
    }
}

impl Serializer for PlainTextSerializer {
    fn content_type(&self) -> &str {
        "text/plain"
    }

    fn charset(&self) -> Option<Charset> {
        Some(self.charset)
    }

    fn serialize(&self, value: &dyn erased_serde::Serialize) -> Result<Bytes, SerializeError> {
        let text = match serde_json::to_value(value)
            .map_err(|e| SerializeError::new(self.content_type(), e))?
        {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            other => {
                return Err(SerializeError::new(
                    self.content_type(),
                    format!("plain text payloads must be scalar values, got `{other}`"),
                ));
            }
        };
        self.charset.encode(&text).map(Bytes::from).map_err(|c| {
            SerializeError::new(
                self.content_type(),
                format!("`{c}` can't be represented as {}", self.charset),
            )
        })
    }

    fn deserialize_erased(
        &self,
        input: &mut dyn Read,
        sink: &mut DeserializeSink<'_>,
    ) -> Result<(), FormatError> {
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer).map_err(FormatError::new)?;
        let text = self.charset.decode(&buffer).map_err(FormatError::new)?;
        let deserializer = serde_plain::Deserializer::new(&text);
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        sink(&mut erased).map_err(FormatError::new)
    }
}
