use courier::http::Method;
use courier::http::header::CONTENT_TYPE;
use courier::{DynamicCompiler, RequestDescriptor, SerializerRegistry, WireBody};

use crate::fixtures::{
    BasicEchoRequest, InheritedEchoRequest, QuietEchoRequest, ValidatedChild, WindowRequest,
};
use crate::{body_text, compile, config, query};

#[test]
fn inherited_settings_are_overridden_by_the_child() {
    let request = compile(&InheritedEchoRequest::default());

    assert_eq!(request.method(), Method::POST);
    assert_eq!(request.uri().path(), "/anything");
    // The overridden `q1` moves to the position of the child's binding.
    assert_eq!(
        query(&request),
        "q2=test_query_2&q3=test_query_3&q1=overridden"
    );
    assert_eq!(request.headers()["x-echo-mode"], "verbose");
    assert_eq!(
        request.headers()[CONTENT_TYPE],
        "application/x-www-form-urlencoded"
    );
    assert!(matches!(request.body(), WireBody::UrlEncoded(_)));
    assert_eq!(body_text(&request), "name=Ferris+the+crab&q2=from+the+form");
}

#[test]
fn an_absent_override_hides_the_inherited_value() {
    let request = compile(&InheritedEchoRequest {
        q1_override: None,
        ..Default::default()
    });
    assert_eq!(query(&request), "q2=test_query_2&q3=test_query_3");
}

#[test]
fn header_overrides_ignore_the_case_of_the_name() {
    let request = compile(&QuietEchoRequest {
        base: InheritedEchoRequest::default(),
        mode: None,
    });
    assert!(request.headers().get("x-echo-mode").is_none());

    let request = compile(&QuietEchoRequest {
        base: InheritedEchoRequest::default(),
        mode: Some("quiet".into()),
    });
    let values: Vec<_> = request.headers().get_all("x-echo-mode").iter().collect();
    assert_eq!(values, ["quiet"]);
}

#[test]
fn constants_are_inherited() {
    let request = compile(&InheritedEchoRequest {
        base: BasicEchoRequest {
            q1: "ignored".into(),
            second: None,
        },
        ..Default::default()
    });
    assert_eq!(query(&request), "q3=test_query_3&q1=overridden");
}

#[test]
fn the_method_is_inherited_when_the_child_has_none() {
    let request = compile(&ValidatedChild {
        base: WindowRequest { window: (1, 2) },
        dry_run: true,
    });
    assert_eq!(request.method(), Method::DELETE);
    assert_eq!(request.uri(), "https://echo.example.com/metrics?window=1..2&dry_run=true");
}

#[test]
fn descriptors_expose_their_own_metadata() {
    let request = InheritedEchoRequest::default();
    assert_eq!(request.method(), Some(Method::POST));
    assert_eq!(request.path(), None);

    let parent = request.parent().expect("The request has a parent");
    assert_eq!(parent.path(), Some("/anything"));
    let names: Vec<_> = parent
        .bindings()
        .iter()
        .map(|b| b.name().to_owned())
        .collect();
    assert_eq!(names, ["q1", "q2", "q3"]);

    // Metadata can be compiled without any prebuilt logic.
    let registry = std::sync::Arc::new(SerializerRegistry::new());
    let wire = DynamicCompiler::new(registry)
        .compile_descriptor(parent, &config())
        .unwrap();
    assert_eq!(
        query(&wire),
        "q1=test_query_1&q2=test_query_2&q3=test_query_3"
    );
}
