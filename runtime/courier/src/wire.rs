use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

/// A fully-formed HTTP request, ready to be handed over to a transport.
///
/// It is the output of a [`RequestCompiler`](crate::RequestCompiler) and it can't be
/// modified.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    pub(crate) method: Method,
    pub(crate) uri: Uri,
    pub(crate) headers: HeaderMap,
    pub(crate) body: WireBody,
}

impl WireRequest {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The absolute URI of the request, including the query string.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request headers, including `Content-Type` when there is a body.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &WireBody {
        &self.body
    }

    /// Convert into an [`http::Request`].
    pub fn into_http(self) -> http::Request<Bytes> {
        let mut request = http::Request::new(self.body.into_bytes());
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }
}

impl From<WireRequest> for http::Request<Bytes> {
    fn from(request: WireRequest) -> Self {
        request.into_http()
    }
}

/// The body of a [`WireRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireBody {
    Empty,
    /// A serialized body payload.
    Payload { content_type: String, bytes: Bytes },
    /// `application/x-www-form-urlencoded` form fields.
    UrlEncoded(Bytes),
    /// A `multipart/form-data` body.
    Multipart { boundary: String, bytes: Bytes },
}

impl WireBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            WireBody::Empty => &[],
            WireBody::Payload { bytes, .. }
            | WireBody::UrlEncoded(bytes)
            | WireBody::Multipart { bytes, .. } => bytes,
        }
    }

    /// The value of the `Content-Type` header for this body, if there is one.
    pub fn content_type(&self) -> Option<String> {
        match self {
            WireBody::Empty => None,
            WireBody::Payload { content_type, .. } => Some(content_type.clone()),
            WireBody::UrlEncoded(_) => Some(mime::APPLICATION_WWW_FORM_URLENCODED.to_string()),
            WireBody::Multipart { boundary, .. } => {
                Some(format!("{}; boundary={boundary}", mime::MULTIPART_FORM_DATA))
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    fn into_bytes(self) -> Bytes {
        match self {
            WireBody::Empty => Bytes::new(),
            WireBody::Payload { bytes, .. }
            | WireBody::UrlEncoded(bytes)
            | WireBody::Multipart { bytes, .. } => bytes,
        }
    }
}
