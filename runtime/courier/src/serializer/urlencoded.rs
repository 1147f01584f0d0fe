use std::io::Read;

use bytes::Bytes;

use super::{Charset, DeserializeSink, FormatError, SerializeError, Serializer, UnsupportedCharset};

/// A [`Serializer`] for `application/x-www-form-urlencoded` payloads,
/// backed by [`serde_html_form`].
///
/// Sequences are encoded by repeating the key (`id=1&id=2`), the same convention
/// used by HTML forms.
#[derive(Debug, Default, Clone)]
pub struct UrlEncodedSerializer {
    _private: (),
}

impl UrlEncodedSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A url-encoded serializer using the given text encoding.
    ///
    /// Only [`Charset::Utf8`] is accepted.
    pub fn with_charset(charset: Charset) -> Result<Self, UnsupportedCharset> {
        if charset != Charset::Utf8 {
            return Err(UnsupportedCharset {
                serializer: "UrlEncodedSerializer",
                charset,
            });
        }
        Ok(Self::new())
    }
}

impl Serializer for UrlEncodedSerializer {
    fn content_type(&self) -> &str {
        "application/x-www-form-urlencoded"
    }

    fn serialize(&self, value: &dyn erased_serde::Serialize) -> Result<Bytes, SerializeError> {
        serde_html_form::to_string(value)
            .map(Bytes::from)
            .map_err(|e| SerializeError::new(self.content_type(), e))
    }

    fn deserialize_erased(
        &self,
        input: &mut dyn Read,
        sink: &mut DeserializeSink<'_>,
    ) -> Result<(), FormatError> {
        let mut buffer = Vec::new();
        input.read_to_end(&mut buffer).map_err(FormatError::new)?;
        let deserializer = serde_html_form::Deserializer::new(form_urlencoded::parse(&buffer));
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        sink(&mut erased).map_err(FormatError::new)
    }
}
