use std::sync::Arc;

use courier::bytes::Bytes;
use courier::http::Method;
use courier::http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use courier::{
    ClientConfig, Compiler, DirectionScope, RequestCompiler, SerializerRegistry, Strategy,
    UrlEncodedSerializer, WireBody,
};

use crate::fixtures::{
    AttachmentsRequest, BasicEchoRequest, Case, CreateIssue, EnumRequest, HealthCheck, MultipartFormRequest, NewIssue,
    SpecialTypeRequest, UpdateNote, WindowRequest,
};
use crate::{BASE_URL, body_text, compile, compile_with, config, query};

#[test]
fn query_parameters_follow_declaration_order() {
    let request = compile(&BasicEchoRequest::default());
    assert_eq!(request.method(), Method::GET);
    assert_eq!(
        request.uri(),
        "https://echo.example.com/anything?q1=test_query_1&q2=test_query_2&q3=test_query_3"
    );
    assert_eq!(request.body(), &WireBody::Empty);
    assert!(request.headers().is_empty());
}

#[test]
fn absent_parameters_are_omitted() {
    let request = compile(&BasicEchoRequest {
        second: None,
        ..Default::default()
    });
    assert_eq!(query(&request), "q1=test_query_1&q3=test_query_3");
}

#[test]
fn composite_and_collection_values() {
    let request = compile(&SpecialTypeRequest::default());
    assert_eq!(query(&request), "users=test:test_1a&ids=1,2");
}

#[test]
fn enum_modes() {
    let request = compile(&EnumRequest {
        numeric: Case::Upper,
        lower: Case::Upper,
        upper: Case::Upper,
        header: Some(Case::TitleCase),
    });
    assert_eq!(query(&request), "numeric=2&lower=upper&upper=UPPER");
    assert_eq!(request.headers()["x-case"], "TITLE");
}

#[test]
fn route_parameters_and_json_bodies() {
    let request = compile(&CreateIssue::default());
    assert_eq!(request.method(), Method::POST);
    assert_eq!(
        request.uri(),
        "https://echo.example.com/repos/rust%20lang/cargo/issues"
    );
    assert_eq!(request.headers()["x-request-id"], "42");
    assert_eq!(request.headers()[ACCEPT], "application/vnd.github+json");
    assert_eq!(
        request.headers()[CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    assert_eq!(
        body_text(&request),
        r#"{"title":"Build fails on nightly","labels":["bug"]}"#
    );
}

#[test]
fn body_serializers_come_from_the_registry() {
    let registry = Arc::new(SerializerRegistry::new());
    registry.register::<NewIssue>(DirectionScope::Outbound, UrlEncodedSerializer::new());
    let request = compile_with(&CreateIssue::default(), registry, &config());
    assert_eq!(
        request.headers()[CONTENT_TYPE],
        "application/x-www-form-urlencoded; charset=utf-8"
    );
    assert_eq!(
        body_text(&request),
        "title=Build+fails+on+nightly&labels=bug"
    );
}

#[test]
fn body_serializers_can_be_overridden_per_field() {
    let request = compile(&UpdateNote {
        id: 7,
        text: Some("Remember the milk".into()),
    });
    assert_eq!(request.method(), Method::PUT);
    assert_eq!(request.uri(), "https://echo.example.com/notes/7");
    assert_eq!(request.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
    assert_eq!(body_text(&request), "Remember the milk");

    let request = compile(&UpdateNote { id: 7, text: None });
    assert_eq!(request.body(), &WireBody::Empty);
    assert!(request.headers().get(CONTENT_TYPE).is_none());
}

#[test]
fn multipart_forms() {
    let request = compile(&MultipartFormRequest::default());
    assert_eq!(query(&request), "c=content");

    let WireBody::Multipart { boundary, .. } = request.body() else {
        panic!("Expected a multipart body, got {:?}", request.body());
    };
    assert_eq!(
        request.headers()[CONTENT_TYPE],
        format!("multipart/form-data; boundary={boundary}").as_str()
    );
    let expected = format!(
        "--{boundary}\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"file.txt\"\r\n\
Content-Type: text/plain\r\n\
\r\n\
content\r\n\
--{boundary}\r\n\
Content-Disposition: form-data; name=\"bytes\"\r\n\
Content-Type: application/octet-stream\r\n\
\r\n\
content\r\n\
--{boundary}\r\n\
Content-Disposition: form-data; name=\"note\"\r\n\
\r\n\
a \"quoted\" note\r\n\
--{boundary}--\r\n"
    );
    assert_eq!(body_text(&request), expected);
}

#[test]
fn byte_collections_become_one_part_per_element() {
    let request = compile(&AttachmentsRequest {
        files: vec![
            Bytes::from_static(b"\x00\x01"),
            Bytes::from_static(b"\x02"),
        ],
        label: "logs".into(),
    });
    let WireBody::Multipart { boundary, .. } = request.body() else {
        panic!("Expected a multipart body, got {:?}", request.body());
    };
    let expected = format!(
        "--{boundary}\r\n\
Content-Disposition: form-data; name=\"files\"; filename=\"f.bin\"\r\n\
Content-Type: application/octet-stream\r\n\
\r\n\
\x00\x01\r\n\
--{boundary}\r\n\
Content-Disposition: form-data; name=\"files\"; filename=\"f.bin\"\r\n\
Content-Type: application/octet-stream\r\n\
\r\n\
\x02\r\n\
--{boundary}\r\n\
Content-Disposition: form-data; name=\"label\"\r\n\
\r\n\
logs\r\n\
--{boundary}--\r\n"
    );
    assert_eq!(body_text(&request), expected);
}

#[test]
fn multipart_boundaries_depend_on_the_content() {
    let first = compile(&MultipartFormRequest::default());
    let second = compile(&MultipartFormRequest {
        file: Bytes::from_static(b"other content"),
        ..Default::default()
    });
    assert_ne!(first.body().content_type(), second.body().content_type());
}

#[test]
fn configured_multipart_boundaries_are_used() {
    let config = config().multipart_boundary("fixed-boundary");
    let request = compile_with(
        &MultipartFormRequest::default(),
        Arc::new(SerializerRegistry::new()),
        &config,
    );
    assert_eq!(
        request.headers()[CONTENT_TYPE],
        "multipart/form-data; boundary=fixed-boundary"
    );
    assert!(body_text(&request).starts_with("--fixed-boundary\r\n"));
}

#[test]
fn absolute_templates_ignore_the_base_url() {
    let request = compile(&HealthCheck { verbose: true });
    assert_eq!(request.uri(), "https://status.example.com/health?verbose=true");

    let registry = Arc::new(SerializerRegistry::new());
    let request = compile_with(&HealthCheck { verbose: false }, registry, &ClientConfig::new());
    assert_eq!(request.uri(), "https://status.example.com/health?verbose=false");
}

#[test]
fn formatters_produce_the_value() {
    let request = compile(&WindowRequest { window: (3, 9) });
    assert_eq!(query(&request), "window=3..9");
}

#[test]
fn caller_headers_are_applied_last() {
    let config = config()
        .user_agent("courier-tests/1.0")
        .header("accept", "application/json")
        .header("x-tenant", "acme");
    let request = compile_with(
        &CreateIssue::default(),
        Arc::new(SerializerRegistry::new()),
        &config,
    );
    assert_eq!(request.headers()[USER_AGENT], "courier-tests/1.0");
    assert_eq!(request.headers()[ACCEPT], "application/json");
    assert_eq!(request.headers().get_all(ACCEPT).iter().count(), 1);
    assert_eq!(request.headers()["x-tenant"], "acme");
}

#[test]
fn the_facade_dispatches_to_the_selected_strategy() {
    let registry = Arc::new(SerializerRegistry::new());
    let request = BasicEchoRequest::default();
    let outputs: Vec<_> = [Strategy::Static, Strategy::Dynamic]
        .into_iter()
        .map(|strategy| {
            let compiler = Compiler::new(registry.clone(), strategy);
            assert_eq!(compiler.strategy(), strategy);
            compiler.compile(&request, &config()).unwrap()
        })
        .collect();
    assert_eq!(outputs[0], outputs[1]);
    assert!(outputs[0].uri().to_string().starts_with(BASE_URL));
    assert_eq!(Strategy::default(), Strategy::Static);
}

#[test]
fn wire_requests_convert_into_http_requests() {
    let wire = compile(&CreateIssue::default());
    let expected_body = wire.body().as_bytes().to_vec();
    let request: courier::http::Request<Bytes> = wire.into();
    assert_eq!(request.method(), Method::POST);
    assert_eq!(request.headers()["x-request-id"], "42");
    assert_eq!(request.body().as_ref(), expected_body.as_slice());
}
