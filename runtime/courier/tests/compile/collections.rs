use courier::WireBody;

use crate::fixtures::{CollectionRequest, UrlEncodedFormRequest};
use crate::{body_text, compile, query};

#[test]
fn every_collection_mode_in_the_query_string() {
    let request = compile(&CollectionRequest::default());
    assert_eq!(
        query(&request),
        "concatenated=1,2,3\
         &piped=a%7Cb\
         &recursive=4&recursive=5\
         &indexed%5B0%5D=x&indexed%5B1%5D=y%20z\
         &unordered%5B%5D=1&unordered%5B%5D=2"
    );
}

#[test]
fn text_forms_are_url_encoded_by_default() {
    let request = compile(&UrlEncodedFormRequest {
        display_name: "Ferris".into(),
        interests: vec!["rust".into(), "crabs & shells".into()],
        bio: None,
    });
    assert!(matches!(request.body(), WireBody::UrlEncoded(_)));
    assert_eq!(
        body_text(&request),
        "display_name=Ferris&interests=rust&interests=crabs+%26+shells"
    );
}

#[test]
fn forms_without_values_have_no_body() {
    let request = compile(&UrlEncodedFormRequest {
        display_name: String::new(),
        interests: vec![],
        bio: None,
    });
    // An empty string is still a value.
    assert_eq!(body_text(&request), "display_name=");

    let request = compile(&CollectionRequest {
        concatenated: vec![],
        piped: vec![],
        recursive: vec![],
        indexed: vec![],
        unordered: vec![],
        empty: vec![],
    });
    assert_eq!(request.uri().query(), None);
}
