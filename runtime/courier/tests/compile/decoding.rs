use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use courier::bytes::Bytes;
use courier::http::header::CONTENT_TYPE;
use courier::http::{HeaderMap, HeaderValue, Response};
use courier::{
    DecodeError, DirectionScope, PlainTextSerializer, ResponseDecoder, SerializerRegistry,
    UrlEncodedSerializer,
};
use http_body::Frame;
use http_body_util::Full;

#[derive(Debug, PartialEq, serde::Deserialize)]
struct Issue {
    title: String,
    number: u64,
}

fn headers(content_type: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
    headers
}

fn response(content_type: &str, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .header(CONTENT_TYPE, content_type)
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap()
}

#[tokio::test]
async fn json_is_the_default() {
    let decoder = ResponseDecoder::new(Arc::new(SerializerRegistry::new()));
    let issue: Issue = decoder
        .decode_body(response(
            "application/json",
            r#"{"title": "Build fails", "number": 7}"#,
        ))
        .await
        .unwrap();
    assert_eq!(
        issue,
        Issue {
            title: "Build fails".into(),
            number: 7
        }
    );
}

#[tokio::test]
async fn the_content_type_picks_among_the_available_serializers() {
    let registry = Arc::new(SerializerRegistry::new());
    registry.register::<String>(DirectionScope::Inbound, PlainTextSerializer::new());
    let decoder = ResponseDecoder::new(registry);

    let text: String = decoder
        .decode_body(response("text/plain; charset=utf-8", "\"quoted\""))
        .await
        .unwrap();
    assert_eq!(text, "\"quoted\"");

    // The registered serializer doesn't speak JSON: the default one does.
    let json: String = decoder
        .decode_body(response("application/json", "\"quoted\""))
        .await
        .unwrap();
    assert_eq!(json, "quoted");
}

#[test]
fn registered_serializers_are_used_without_a_content_type() {
    let registry = Arc::new(SerializerRegistry::new());
    registry.register::<Issue>(DirectionScope::Both, UrlEncodedSerializer::new());
    let decoder = ResponseDecoder::new(registry);
    let issue: Issue = decoder
        .decode(&HeaderMap::new(), b"title=Build+fails&number=7")
        .unwrap();
    assert_eq!(issue.number, 7);
}

#[test]
fn format_errors_are_surfaced() {
    let decoder = ResponseDecoder::new(Arc::new(SerializerRegistry::new()));
    let err = decoder
        .decode::<Issue>(
            &headers("application/json"),
            br#"{"title": "Build fails", "number": "seven"}"#,
        )
        .unwrap_err();
    let DecodeError::Format(err) = err else {
        panic!("Expected a format error, got {err:?}");
    };
    assert_eq!(err.path.as_deref(), Some("number"));
    assert!(err.type_name.unwrap().ends_with("Issue"));
}

struct BrokenBody;

impl http_body::Body for BrokenBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Poll::Ready(Some(Err(std::io::Error::other("connection reset"))))
    }
}

#[tokio::test]
async fn body_errors_are_reported() {
    let decoder = ResponseDecoder::new(Arc::new(SerializerRegistry::new()));
    let response = Response::builder()
        .header(CONTENT_TYPE, "application/json")
        .body(BrokenBody)
        .unwrap();
    let err = decoder.decode_body::<Issue, _>(response).await.unwrap_err();
    assert!(matches!(err, DecodeError::Buffer(_)));
    insta::assert_snapshot!(err, @"Something went wrong when reading the response body");
}
