//! Turn binding values into strings, header values and form parts.
//!
//! Both compilation strategies go through this module: it is the only place where the
//! textual representation of a value is decided.
use std::borrow::Cow;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use http::{HeaderName, HeaderValue};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::compile::EncodingError;
use crate::request::{
    BindingValue, CollectionMode, EncodeOptions, EnumMode, Location, ParameterBinding, Scalar,
};

/// Characters escaped in query keys and values.
///
/// Everything but RFC 3986's unreserved characters and the sub-delimiters that carry no
/// meaning in a query string.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b':')
    .remove(b'@')
    .remove(b',')
    .remove(b'/')
    .remove(b'!')
    .remove(b'$')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b';');

/// Characters escaped in a route parameter, which must stay within one path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b':')
    .remove(b'@')
    .remove(b',');

const DEFAULT_PART_CONTENT_TYPE: &str = "application/octet-stream";

/// The outcome of encoding a binding that has a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    /// Key/value pairs, not yet percent-encoded. Query, route and text form bindings.
    Text(Vec<EncodedPair>),
    /// Header bindings.
    Headers(Vec<(HeaderName, HeaderValue)>),
    /// Binary form parts, one per byte sequence.
    Binary(Vec<BinaryPart>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPair {
    pub key: String,
    pub value: String,
}

/// A file-like part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Encode a binding according to its location and options.
///
/// Returns `Ok(None)` if the binding has no value.
pub fn encode_binding(binding: &ParameterBinding<'_>) -> Result<Option<Encoded>, EncodingError> {
    let Some(value) = binding.value() else {
        return Ok(None);
    };
    let options = binding.options();
    let encoded = match binding.location() {
        Location::Route => {
            if matches!(value, BindingValue::Collection(_))
                && options.collection_mode != CollectionMode::Concatenated
            {
                return Err(EncodingError::UnsupportedCollectionMode {
                    name: binding.name().to_owned(),
                    location: Location::Route,
                    mode: options.collection_mode,
                });
            }
            Encoded::Text(pairs(binding.name(), value, options))
        }
        Location::Query => Encoded::Text(pairs(binding.name(), value, options)),
        Location::Form => match value {
            BindingValue::Bytes(bytes) => Encoded::Binary(vec![binary_part(binding, bytes)]),
            BindingValue::Collection(items)
                if items.iter().all(|item| matches!(item, BindingValue::Bytes(_))) =>
            {
                Encoded::Binary(
                    items
                        .iter()
                        .filter_map(|item| match item {
                            BindingValue::Bytes(bytes) => Some(binary_part(binding, bytes)),
                            _ => None,
                        })
                        .collect(),
                )
            }
            _ => Encoded::Text(pairs(binding.name(), value, options)),
        },
        Location::Header => Encoded::Headers(
            pairs(binding.name(), value, options)
                .into_iter()
                .map(header)
                .collect::<Result<_, _>>()?,
        ),
    };
    Ok(Some(encoded))
}

fn binary_part(binding: &ParameterBinding<'_>, bytes: &[u8]) -> BinaryPart {
    let options = binding.options();
    BinaryPart {
        name: binding.name().to_owned(),
        file_name: options.file_name.map(ToOwned::to_owned),
        content_type: options
            .content_type
            .unwrap_or(DEFAULT_PART_CONTENT_TYPE)
            .to_owned(),
        bytes: Bytes::copy_from_slice(bytes),
    }
}

/// The textual representation of `value`.
///
/// Collections are joined with the configured separator, whatever their collection mode.
pub fn stringify(value: &BindingValue<'_>, options: &EncodeOptions) -> String {
    match value {
        BindingValue::Scalar(scalar) => stringify_scalar(scalar).into_owned(),
        BindingValue::Enum(variant) => match options.enum_mode {
            EnumMode::Numeric => variant.discriminant.to_string(),
            EnumMode::StringLower => variant.name.to_lowercase(),
            EnumMode::StringUpper => variant.name.to_uppercase(),
        },
        BindingValue::Collection(items) => {
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(options.separator);
                }
                out.push_str(&stringify(item, options));
            }
            out
        }
        BindingValue::Bytes(bytes) => STANDARD.encode(bytes),
        BindingValue::Composite(representation) => representation.to_string(),
    }
}

fn stringify_scalar<'a>(scalar: &'a Scalar<'_>) -> Cow<'a, str> {
    match scalar {
        Scalar::Str(s) => Cow::Borrowed(s.as_ref()),
        Scalar::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Scalar::Int(i) => Cow::Owned(i.to_string()),
        Scalar::UInt(u) => Cow::Owned(u.to_string()),
        Scalar::F32(f) => stringify_float(f64::from(*f), || f.to_string()),
        Scalar::F64(f) => stringify_float(*f, || f.to_string()),
        Scalar::Char(c) => Cow::Owned(c.to_string()),
    }
}

// Shortest round-trip decimal for finite values, never scientific notation.
fn stringify_float<'a>(value: f64, finite: impl FnOnce() -> String) -> Cow<'a, str> {
    if value.is_nan() {
        Cow::Borrowed("NaN")
    } else if value == f64::INFINITY {
        Cow::Borrowed("Infinity")
    } else if value == f64::NEG_INFINITY {
        Cow::Borrowed("-Infinity")
    } else {
        Cow::Owned(finite())
    }
}

fn pairs(name: &str, value: &BindingValue<'_>, options: &EncodeOptions) -> Vec<EncodedPair> {
    let pair = |key: String, value: &BindingValue<'_>| EncodedPair {
        key,
        value: stringify(value, options),
    };
    match value {
        BindingValue::Collection(items) => match options.collection_mode {
            CollectionMode::Concatenated => vec![pair(name.to_owned(), value)],
            CollectionMode::Recursive => items
                .iter()
                .map(|item| pair(name.to_owned(), item))
                .collect(),
            CollectionMode::Indexed => items
                .iter()
                .enumerate()
                .map(|(i, item)| pair(format!("{name}[{i}]"), item))
                .collect(),
            CollectionMode::Unordered => items
                .iter()
                .map(|item| pair(format!("{name}[]"), item))
                .collect(),
        },
        _ => vec![pair(name.to_owned(), value)],
    }
}

fn header(pair: EncodedPair) -> Result<(HeaderName, HeaderValue), EncodingError> {
    let name = HeaderName::try_from(pair.key.as_str())
        .map_err(|_| EncodingError::InvalidHeaderName { name: pair.key.clone() })?;
    let value = HeaderValue::try_from(pair.value)
        .map_err(|_| EncodingError::InvalidHeaderValue { name: pair.key })?;
    Ok((name, value))
}

/// Percent-encode a query key or value.
pub fn encode_query_component(raw: &str) -> Cow<'_, str> {
    utf8_percent_encode(raw, QUERY).into()
}

/// Percent-encode a route parameter value.
pub fn encode_path_segment(raw: &str) -> Cow<'_, str> {
    utf8_percent_encode(raw, PATH_SEGMENT).into()
}
