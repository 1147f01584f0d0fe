use std::borrow::Cow;
use std::collections::HashMap;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};
use indexmap::IndexMap;

use super::multipart::{FormPart, boundary_for, write_multipart};
use super::route::substitute;
use super::{CompileError, ConflictingBodyError, EncodingError, ValidationError};
use crate::config::ClientConfig;
use crate::encode::{Encoded, EncodedPair, encode_binding, encode_path_segment, encode_query_component};
use crate::request::{BindingKey, BodyPayload, FormKind, Location, ParameterBinding};
use crate::serializer::{Direction, SerializerRegistry, TypeDirectionKey};
use crate::wire::{WireBody, WireRequest};

/// The settings of a request, collected from a descriptor and its ancestors.
///
/// Both compilation strategies fill a [`RequestParts`] and then turn it into a
/// [`WireRequest`]: this is where the two paths converge.
/// Later calls override earlier ones, so ancestors must be pushed first.
#[derive(Debug, Default)]
pub struct RequestParts<'a> {
    method: Option<Method>,
    path: Option<Cow<'a, str>>,
    bindings: IndexMap<BindingKey, ParameterBinding<'a>>,
    body: Option<BodyPayload<'a>>,
    form_kind: Option<FormKind>,
}

impl<'a> RequestParts<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_method(&mut self, method: Method) -> &mut Self {
        self.method = Some(method);
        self
    }

    pub fn set_path(&mut self, path: impl Into<Cow<'a, str>>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    pub fn set_form_kind(&mut self, form_kind: FormKind) -> &mut Self {
        self.form_kind = Some(form_kind);
        self
    }

    pub fn set_body(&mut self, body: BodyPayload<'a>) -> &mut Self {
        self.body = Some(body);
        self
    }

    /// Add a binding.
    ///
    /// A binding with the same location and name is removed first: the new binding is
    /// appended at the end.
    pub fn push(&mut self, binding: ParameterBinding<'a>) -> &mut Self {
        let key = binding.key();
        self.bindings.shift_remove(&key);
        self.bindings.insert(key, binding);
        self
    }

    /// The bindings pushed so far, in order.
    pub fn bindings(&self) -> impl Iterator<Item = &ParameterBinding<'a>> {
        self.bindings.values()
    }

    /// Assemble the final request.
    pub(crate) fn finish(
        self,
        registry: &SerializerRegistry,
        config: &ClientConfig,
    ) -> Result<WireRequest, CompileError> {
        let method = self.method.unwrap_or(Method::GET);
        let template = self.path.ok_or_else(ValidationError::missing_path)?;

        if let Some(missing) = self
            .bindings
            .values()
            .find(|b| b.is_required() && b.value().is_none())
        {
            return Err(ValidationError::missing_binding(missing.location(), missing.name()).into());
        }
        if self.body.is_some() {
            let form_fields: Vec<String> = self
                .bindings
                .values()
                .filter(|b| b.location() == Location::Form)
                .map(|b| b.name().to_owned())
                .collect();
            if !form_fields.is_empty() {
                return Err(ConflictingBodyError { form_fields }.into());
            }
        }

        let mut route_values: HashMap<String, String> = HashMap::new();
        let mut query: Vec<EncodedPair> = Vec::new();
        let mut header_groups: Vec<Vec<(HeaderName, HeaderValue)>> = Vec::new();
        let mut form: Vec<FormPart> = Vec::new();
        for binding in self.bindings.values() {
            let Some(encoded) = encode_binding(binding)? else {
                continue;
            };
            match (binding.location(), encoded) {
                (Location::Route, Encoded::Text(pairs)) => {
                    route_values.extend(pairs.into_iter().map(|pair| {
                        let value = encode_path_segment(&pair.value).into_owned();
                        (pair.key, value)
                    }));
                }
                (Location::Query, Encoded::Text(pairs)) => query.extend(pairs),
                (Location::Form, Encoded::Text(pairs)) => {
                    form.extend(pairs.into_iter().map(FormPart::Text))
                }
                (Location::Form, Encoded::Binary(parts)) => {
                    form.extend(parts.into_iter().map(FormPart::Binary))
                }
                (Location::Header, Encoded::Headers(values)) => header_groups.push(values),
                (location, encoded) => {
                    unreachable!("A {location} binding was encoded as {encoded:?}")
                }
            }
        }

        let path = substitute(&template, |name| {
            route_values.get(name).map(String::as_str)
        })?;

        let body = match self.body {
            Some(payload) => {
                let serializer = match payload.serializer() {
                    Some(serializer) => serializer.clone(),
                    None => registry.resolve_key(&TypeDirectionKey::new(
                        payload.type_key(),
                        Direction::Outbound,
                    )),
                };
                let bytes = serializer
                    .serialize(payload.value())
                    .map_err(EncodingError::from)?;
                WireBody::Payload {
                    content_type: serializer.media_type(),
                    bytes,
                }
            }
            None if form.is_empty() => WireBody::Empty,
            None => form_body(form, self.form_kind, config)?,
        };

        let mut headers = HeaderMap::new();
        for group in header_groups {
            let mut values = group.into_iter();
            if let Some((name, value)) = values.next() {
                headers.insert(name.clone(), value);
                for (_, value) in values {
                    headers.append(name.clone(), value);
                }
            }
        }
        if let Some(content_type) = body.content_type() {
            if !headers.contains_key(CONTENT_TYPE) {
                let value = HeaderValue::try_from(content_type).map_err(|_| {
                    EncodingError::InvalidHeaderValue {
                        name: CONTENT_TYPE.to_string(),
                    }
                })?;
                headers.insert(CONTENT_TYPE, value);
            }
        }
        if let Some(user_agent) = &config.user_agent {
            let value = HeaderValue::try_from(user_agent.as_str()).map_err(|_| {
                EncodingError::InvalidHeaderValue {
                    name: USER_AGENT.to_string(),
                }
            })?;
            headers.insert(USER_AGENT, value);
        }
        for (name, value) in &config.headers {
            let header_name = HeaderName::try_from(name.as_str())
                .map_err(|_| EncodingError::InvalidHeaderName { name: name.clone() })?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|_| EncodingError::InvalidHeaderValue { name: name.clone() })?;
            headers.insert(header_name, value);
        }

        let uri = build_uri(&path, &query, config)?;
        tracing::trace!(%method, %uri, "Compiled request");
        Ok(WireRequest {
            method,
            uri,
            headers,
            body,
        })
    }
}

fn form_body(
    form: Vec<FormPart>,
    form_kind: Option<FormKind>,
    config: &ClientConfig,
) -> Result<WireBody, CompileError> {
    let binary = form.iter().find_map(|part| match part {
        FormPart::Binary(part) => Some(part.name.as_str()),
        FormPart::Text(_) => None,
    });
    match (form_kind, binary) {
        (Some(FormKind::UrlEncoded), Some(name)) => {
            Err(EncodingError::BinaryPartInUrlEncodedForm {
                name: name.to_owned(),
            }
            .into())
        }
        (Some(FormKind::Multipart), _) | (None, Some(_)) => {
            let boundary = config
                .multipart_boundary
                .clone()
                .unwrap_or_else(|| boundary_for(&form));
            let bytes = write_multipart(&form, &boundary);
            Ok(WireBody::Multipart { boundary, bytes })
        }
        (Some(FormKind::UrlEncoded) | None, None) => {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for part in &form {
                if let FormPart::Text(pair) = part {
                    serializer.append_pair(&pair.key, &pair.value);
                }
            }
            Ok(WireBody::UrlEncoded(Bytes::from(serializer.finish())))
        }
    }
}

// Schemes are case-insensitive.
fn is_absolute(path: &str) -> bool {
    path.split_once("://").is_some_and(|(scheme, _)| {
        scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
    })
}

fn build_uri(
    path: &str,
    query: &[EncodedPair],
    config: &ClientConfig,
) -> Result<Uri, CompileError> {
    let mut uri = if is_absolute(path) {
        path.to_owned()
    } else {
        let base = config
            .base_url
            .as_deref()
            .ok_or_else(|| ValidationError::missing_base_url(path))?
            .trim_end_matches('/');
        match path {
            "" => base.to_owned(),
            p if p.starts_with('/') => format!("{base}{p}"),
            p => format!("{base}/{p}"),
        }
    };
    for (i, pair) in query.iter().enumerate() {
        let separator = if i == 0 && !uri.contains('?') { '?' } else { '&' };
        uri.push(separator);
        uri.push_str(&encode_query_component(&pair.key));
        uri.push('=');
        uri.push_str(&encode_query_component(&pair.value));
    }
    Uri::try_from(uri.as_str()).map_err(|e| ValidationError::invalid_uri(&uri, e).into())
}
