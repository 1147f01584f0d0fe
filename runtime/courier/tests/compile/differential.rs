use std::sync::Arc;

use courier::SerializerRegistry;
use itertools::Itertools;
use proptest::prelude::*;

use crate::fixtures::{
    BasicEchoRequest, Case, CollectionRequest, InheritedEchoRequest, WindowRequest,
};
use crate::{assert_identical, compile_both, config, query};

/// Compile with both strategies and check that they either produce the same request
/// or fail with the same error.
fn assert_agree<R: courier::ApiRequest>(request: &R) {
    match compile_both(request, Arc::new(SerializerRegistry::new()), &config()) {
        (Ok(dynamic), Ok(prebuilt)) => assert_identical(&dynamic, &prebuilt),
        (Err(dynamic), Err(prebuilt)) => assert_eq!(dynamic.to_string(), prebuilt.to_string()),
        (dynamic, prebuilt) => panic!(
            "The strategies disagree.\nDynamic: {dynamic:?}\nStatic: {prebuilt:?}"
        ),
    }
}

fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 &=?/%+éü-]{0,12}",
        any::<String>(),
    ]
}

fn case() -> impl Strategy<Value = Case> {
    prop::sample::select(vec![Case::Lower, Case::Upper, Case::TitleCase])
}

proptest! {
    #[test]
    fn basic_requests(q1 in text(), second in proptest::option::of(text())) {
        let request = BasicEchoRequest { q1, second };
        assert_agree(&request);

        let wire = crate::compile(&request);
        let keys = query(&wire)
            .split('&')
            .filter_map(|pair| pair.split_once('=').map(|(key, _)| key))
            .join(",");
        let expected = if request.second.is_some() { "q1,q2,q3" } else { "q1,q3" };
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn inherited_requests(
        q1 in text(),
        second in proptest::option::of(text()),
        name in text(),
        form_q2 in proptest::option::of(text()),
        q1_override in proptest::option::of(text()),
        mode in proptest::option::of(text()),
    ) {
        assert_agree(&InheritedEchoRequest {
            base: BasicEchoRequest { q1, second },
            name,
            form_q2,
            q1_override,
            mode,
        });
    }

    #[test]
    fn collections(
        concatenated in prop::collection::vec(any::<u32>(), 0..4),
        piped in prop::collection::vec(prop::sample::select(vec!["a", "b c", "d|e", "ü"]), 0..4),
        recursive in prop::collection::vec(any::<u32>(), 0..4),
        indexed in prop::collection::vec(text(), 0..4),
        unordered in prop::collection::vec(case(), 0..4),
    ) {
        assert_agree(&CollectionRequest {
            concatenated,
            piped,
            recursive,
            indexed,
            unordered,
            empty: vec![],
        });
    }

    #[test]
    fn validated_requests(start in 0..10u32, end in 0..10u32) {
        let request = WindowRequest { window: (start, end) };
        assert_agree(&request);
        let outcome = compile_both(&request, Arc::new(SerializerRegistry::new()), &config()).1;
        prop_assert_eq!(outcome.is_ok(), start <= end);
    }
}
