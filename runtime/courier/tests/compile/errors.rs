use std::sync::Arc;

use courier::bytes::Bytes;
use courier::{ClientConfig, CompileError, EncodingError, SerializerRegistry};

use crate::fixtures::{
    BinaryUrlEncodedRequest, ConflictingRequest, IndexedRouteRequest, InvalidHeaderRequest,
    MissingRouteRequest, NewIssue, NoPathRequest, RequiredQueryRequest, ValidatedChild,
    WindowRequest,
};
use crate::{compile_both, compile_err};

#[test]
fn a_body_and_form_fields_conflict() {
    let request = ConflictingRequest {
        payload: NewIssue {
            title: "Conflict".into(),
            labels: vec![],
        },
        extra: Some("field".into()),
    };
    let err = compile_err(&request);
    let CompileError::ConflictingBody(conflict) = &err else {
        panic!("Expected a conflicting body error, got {err:?}");
    };
    assert_eq!(conflict.form_fields, ["extra"]);
    insta::assert_snapshot!(err, @"The request has a body payload and form fields (extra). Only one of them can be sent");
}

#[test]
fn declared_form_fields_conflict_even_without_a_value() {
    let request = ConflictingRequest {
        payload: NewIssue {
            title: "Conflict".into(),
            labels: vec![],
        },
        extra: None,
    };
    assert!(matches!(
        compile_err(&request),
        CompileError::ConflictingBody(_)
    ));
}

#[test]
fn placeholders_need_a_value() {
    let err = compile_err(&MissingRouteRequest { id: None });
    let CompileError::MissingRouteParameter(missing) = &err else {
        panic!("Expected a missing route parameter error, got {err:?}");
    };
    assert_eq!(missing.parameter, "id");
    insta::assert_snapshot!(err, @"There is no value for the `id` placeholder in `/users/{id}/keys`");
}

#[test]
fn required_parameters_need_a_value() {
    let err = compile_err(&RequiredQueryRequest { token: None });
    assert!(matches!(err, CompileError::Validation(_)));
    insta::assert_snapshot!(err, @"`token` is a required query parameter, but it has no value");
}

#[test]
fn requests_need_a_path() {
    let err = compile_err(&NoPathRequest { q: "x".into() });
    insta::assert_snapshot!(err, @"The request doesn't have a path template, nor does any of its ancestors");
}

#[test]
fn relative_paths_need_a_base_url() {
    let (dynamic, prebuilt) = compile_both(
        &RequiredQueryRequest {
            token: Some("secret".into()),
        },
        Arc::new(SerializerRegistry::new()),
        &ClientConfig::new(),
    );
    insta::allow_duplicates! {
        for result in [dynamic, prebuilt] {
            let err = result.unwrap_err();
            insta::assert_snapshot!(err, @"`/tokens` is a relative path, but no base URL has been configured");
        }
    }
}

#[test]
fn validation_hooks_run_for_every_ancestor() {
    let err = compile_err(&WindowRequest { window: (9, 3) });
    insta::assert_snapshot!(err, @"The window must start before it ends");

    let err = compile_err(&ValidatedChild {
        base: WindowRequest { window: (9, 3) },
        dry_run: false,
    });
    let CompileError::Validation(err) = err else {
        panic!("Expected a validation error");
    };
    assert_eq!(err.message(), "The window must start before it ends");
}

#[test]
fn invalid_header_values_are_rejected() {
    let err = compile_err(&InvalidHeaderRequest {
        note: "line one\nline two".into(),
    });
    assert!(matches!(
        err,
        CompileError::Encoding(EncodingError::InvalidHeaderValue { .. })
    ));
}

#[test]
fn route_parameters_only_support_concatenation() {
    let err = compile_err(&IndexedRouteRequest { ids: vec![1, 2] });
    insta::assert_snapshot!(err, @"`ids` is a route parameter: it can't use the `indexed` collection mode");
}

#[test]
fn binary_fields_need_a_multipart_form() {
    let err = compile_err(&BinaryUrlEncodedRequest {
        blob: Bytes::from_static(b"\x00"),
    });
    insta::assert_snapshot!(err, @"`blob` is a binary form field, but the form is url-encoded. Use a multipart form instead");
}

#[test]
fn invalid_caller_headers_are_rejected() {
    let config = crate::config().header("bad header", "value");
    let (dynamic, prebuilt) = compile_both(
        &RequiredQueryRequest {
            token: Some("secret".into()),
        },
        Arc::new(SerializerRegistry::new()),
        &config,
    );
    for result in [dynamic, prebuilt] {
        assert!(matches!(
            result.unwrap_err(),
            CompileError::Encoding(EncodingError::InvalidHeaderName { .. })
        ));
    }
}
