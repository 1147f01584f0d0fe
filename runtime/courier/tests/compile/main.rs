use std::sync::Arc;

use courier::{
    ApiRequest, ClientConfig, CompileError, DynamicCompiler, RequestCompiler, SerializerRegistry,
    StaticCompiler, WireRequest,
};

mod collections;
mod decoding;
mod differential;
mod errors;
mod inheritance;
mod parity;

pub const BASE_URL: &str = "https://echo.example.com";

pub fn config() -> ClientConfig {
    ClientConfig::new().base_url(BASE_URL)
}

/// Compile `request` with both strategies.
pub fn compile_both<R: ApiRequest>(
    request: &R,
    registry: Arc<SerializerRegistry>,
    config: &ClientConfig,
) -> (
    Result<WireRequest, CompileError>,
    Result<WireRequest, CompileError>,
) {
    let dynamic = DynamicCompiler::new(registry.clone()).compile(request, config);
    let prebuilt = StaticCompiler::new(registry).compile(request, config);
    (dynamic, prebuilt)
}

/// Compile `request` with both strategies, check that they agree and return the result.
pub fn compile<R: ApiRequest>(request: &R) -> WireRequest {
    compile_with(request, Arc::new(SerializerRegistry::new()), &config())
}

pub fn compile_with<R: ApiRequest>(
    request: &R,
    registry: Arc<SerializerRegistry>,
    config: &ClientConfig,
) -> WireRequest {
    let (dynamic, prebuilt) = compile_both(request, registry, config);
    let dynamic = dynamic.expect("The dynamic strategy failed to compile the request");
    let prebuilt = prebuilt.expect("The static strategy failed to compile the request");
    assert_identical(&dynamic, &prebuilt);
    prebuilt
}

/// Compile `request` with both strategies, expecting both to fail with the same error.
pub fn compile_err<R: ApiRequest>(request: &R) -> CompileError {
    let (dynamic, prebuilt) = compile_both(request, Arc::new(SerializerRegistry::new()), &config());
    let dynamic = dynamic.expect_err("The dynamic strategy should have failed");
    let prebuilt = prebuilt.expect_err("The static strategy should have failed");
    assert_eq!(dynamic.to_string(), prebuilt.to_string());
    prebuilt
}

/// Same method, same URI, same headers in the same order, same body bytes.
pub fn assert_identical(left: &WireRequest, right: &WireRequest) {
    assert_eq!(left.method(), right.method());
    assert_eq!(left.uri().to_string(), right.uri().to_string());
    let headers = |r: &WireRequest| {
        r.headers()
            .iter()
            .map(|(name, value)| (name.to_string(), value.as_bytes().to_vec()))
            .collect::<Vec<_>>()
    };
    assert_eq!(headers(left), headers(right));
    assert_eq!(left.body(), right.body());
}

/// The query string of a compiled request.
pub fn query(request: &WireRequest) -> &str {
    request.uri().query().unwrap_or_default()
}

pub fn body_text(request: &WireRequest) -> String {
    String::from_utf8(request.body().as_bytes().to_vec()).unwrap()
}
