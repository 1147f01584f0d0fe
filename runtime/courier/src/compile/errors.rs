//! Errors that can occur while compiling a request descriptor into a [`WireRequest`].
//!
//! [`WireRequest`]: crate::WireRequest
use std::borrow::Cow;

use crate::request::{CollectionMode, Location};
use crate::serializer::SerializeError;

/// The error returned by [`RequestCompiler::compile`] when compilation fails.
///
/// Both compilation strategies fail with the same error for the same descriptor.
///
/// [`RequestCompiler::compile`]: super::RequestCompiler::compile
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CompileError {
    #[error(transparent)]
    /// See [`ValidationError`] for details.
    Validation(#[from] ValidationError),
    #[error(transparent)]
    /// See [`MissingRouteParameterError`] for details.
    MissingRouteParameter(#[from] MissingRouteParameterError),
    #[error(transparent)]
    /// See [`ConflictingBodyError`] for details.
    ConflictingBody(#[from] ConflictingBodyError),
    #[error(transparent)]
    /// See [`EncodingError`] for details.
    Encoding(#[from] EncodingError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
#[non_exhaustive]
/// The descriptor is structurally invalid, or one of its validation hooks rejected it.
pub struct ValidationError {
    message: Cow<'static, str>,
}

impl ValidationError {
    /// Build a new [`ValidationError`] with a human-readable explanation.
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn missing_path() -> Self {
        Self::new("The request doesn't have a path template, nor does any of its ancestors")
    }

    pub(crate) fn missing_binding(location: Location, name: &str) -> Self {
        Self::new(format!(
            "`{name}` is a required {location} parameter, but it has no value"
        ))
    }

    pub(crate) fn unclosed_placeholder(template: &str) -> Self {
        Self::new(format!(
            "The path template `{template}` has a `{{` without a matching `}}`"
        ))
    }

    pub(crate) fn missing_base_url(path: &str) -> Self {
        Self::new(format!(
            "`{path}` is a relative path, but no base URL has been configured"
        ))
    }

    pub(crate) fn invalid_uri(uri: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(format!("`{uri}` is not a valid URI: {reason}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("There is no value for the `{parameter}` placeholder in `{template}`")]
#[non_exhaustive]
/// A `{name}` placeholder in the path template has no matching route binding,
/// or the binding has no value.
pub struct MissingRouteParameterError {
    /// The name of the placeholder.
    pub parameter: String,
    /// The path template.
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "The request has a body payload and form fields ({}). Only one of them can be sent",
    .form_fields.join(", ")
)]
#[non_exhaustive]
/// The descriptor declares both a body payload and form fields.
pub struct ConflictingBodyError {
    /// The names of the form fields.
    pub form_fields: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// A value couldn't be encoded into the request.
pub enum EncodingError {
    #[error("`{name}` is not a valid HTTP header name")]
    InvalidHeaderName { name: String },
    #[error(
        "The value of the `{name}` header contains characters that are not allowed in HTTP headers"
    )]
    InvalidHeaderValue { name: String },
    #[error("`{name}` is a {location} parameter: it can't use the `{mode}` collection mode")]
    UnsupportedCollectionMode {
        name: String,
        location: Location,
        mode: CollectionMode,
    },
    #[error(
        "`{name}` is a binary form field, but the form is url-encoded. Use a multipart form instead"
    )]
    BinaryPartInUrlEncodedForm { name: String },
    #[error(transparent)]
    /// The body payload couldn't be serialized.
    Body(#[from] SerializeError),
}
