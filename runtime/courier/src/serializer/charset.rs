use std::fmt::{Display, Formatter};

/// A text encoding supported by courier's text serializers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Charset {
    /// UTF-8, the default for every text serializer.
    #[default]
    Utf8,
    /// UTF-16, little-endian, without a byte order mark.
    Utf16Le,
    /// ISO-8859-1 (Latin-1).
    Latin1,
}

impl Charset {
    /// The name used for the `charset` parameter of a `Content-Type` header.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Utf16Le => "utf-16le",
            Charset::Latin1 => "iso-8859-1",
        }
    }

    /// Encode `text` using this charset.
    ///
    /// Returns the first character that can't be represented, if any.
    pub(crate) fn encode(&self, text: &str) -> Result<Vec<u8>, char> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Utf16Le => Ok(text
                .encode_utf16()
                .flat_map(|unit| unit.to_le_bytes())
                .collect()),
            Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).map_err(|_| c))
                .collect(),
        }
    }

    /// Decode `bytes` using this charset.
    pub(crate) fn decode(&self, bytes: &[u8]) -> Result<String, String> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string()),
            Charset::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err("a UTF-16 payload must have an even number of bytes".into());
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|e| e.to_string())
            }
            Charset::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl Display for Charset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
