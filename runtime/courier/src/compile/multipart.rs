use bytes::{BufMut, Bytes, BytesMut};
use xxhash_rust::xxh3::Xxh3;

use crate::encode::{BinaryPart, EncodedPair};

/// A field of a form body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FormPart {
    Text(EncodedPair),
    Binary(BinaryPart),
}

impl FormPart {
    pub(crate) fn name(&self) -> &str {
        match self {
            FormPart::Text(pair) => &pair.key,
            FormPart::Binary(part) => &part.name,
        }
    }
}

/// A boundary derived from the content of the parts.
///
/// The same parts always get the same boundary.
pub(crate) fn boundary_for(parts: &[FormPart]) -> String {
    let mut hasher = Xxh3::new();
    for part in parts {
        hasher.update(part.name().as_bytes());
        hasher.update(&[0]);
        match part {
            FormPart::Text(pair) => hasher.update(pair.value.as_bytes()),
            FormPart::Binary(part) => {
                hasher.update(part.file_name.as_deref().unwrap_or_default().as_bytes());
                hasher.update(&[0]);
                hasher.update(part.content_type.as_bytes());
                hasher.update(&[0]);
                hasher.update(&part.bytes);
            }
        }
        hasher.update(&[0xff]);
    }
    format!("courier-{:016x}", hasher.digest())
}

/// Serialize `parts` as a `multipart/form-data` body.
pub(crate) fn write_multipart(parts: &[FormPart], boundary: &str) -> Bytes {
    let mut body = BytesMut::new();
    for part in parts {
        body.put_slice(b"--");
        body.put_slice(boundary.as_bytes());
        body.put_slice(b"\r\nContent-Disposition: form-data; name=\"");
        body.put_slice(escape(part.name()).as_bytes());
        body.put_u8(b'"');
        match part {
            FormPart::Text(pair) => {
                body.put_slice(b"\r\n\r\n");
                body.put_slice(pair.value.as_bytes());
            }
            FormPart::Binary(part) => {
                if let Some(file_name) = &part.file_name {
                    body.put_slice(b"; filename=\"");
                    body.put_slice(escape(file_name).as_bytes());
                    body.put_u8(b'"');
                }
                body.put_slice(b"\r\nContent-Type: ");
                body.put_slice(part.content_type.as_bytes());
                body.put_slice(b"\r\n\r\n");
                body.put_slice(&part.bytes);
            }
        }
        body.put_slice(b"\r\n");
    }
    body.put_slice(b"--");
    body.put_slice(boundary.as_bytes());
    body.put_slice(b"--\r\n");
    body.freeze()
}

/// Escape a name for a quoted `Content-Disposition` parameter.
fn escape(name: &str) -> String {
    name.replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
