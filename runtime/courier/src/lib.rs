//! # courier
//!
//! Describe HTTP requests as Rust types, compile them into wire-level requests and
//! decode the responses.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use courier::{ApiRequest, ClientConfig, Compiler, RequestCompiler, SerializerRegistry, Strategy};
//!
//! #[derive(ApiRequest)]
//! #[request(method = "GET", path = "/repos/{owner}/{repo}/issues")]
//! pub struct ListIssues {
//!     #[route]
//!     pub owner: String,
//!     #[route]
//!     pub repo: String,
//!     #[query]
//!     pub labels: Vec<String>,
//! }
//!
//! let registry = Arc::new(SerializerRegistry::new());
//! let compiler = Compiler::new(registry, Strategy::Static);
//! let config = ClientConfig::new().base_url("https://api.github.com");
//!
//! let request = ListIssues {
//!     owner: "rust-lang".into(),
//!     repo: "cargo".into(),
//!     labels: vec!["bug".into(), "help wanted".into()],
//! };
//! let wire = compiler.compile(&request, &config).unwrap();
//! assert_eq!(
//!     wire.uri(),
//!     "https://api.github.com/repos/rust-lang/cargo/issues?labels=bug,help%20wanted"
//! );
//! ```
//!
//! # Modules
//!
//! - [`serializer`]: the wire formats for bodies and the registry that picks one per type.
//! - [`request`]: the request descriptor model.
//! - [`compile`]: the two compilation strategies.
//! - [`encode`]: the textual representation of parameter values.
//! - [`response`]: response decoding.

// Allow the code generated by `courier_macros` to refer to `::courier` from within this crate.
extern crate self as courier;

pub use bytes;
pub use http;

pub use compile::{
    CompileError, Compiler, ConflictingBodyError, DynamicCompiler, EncodingError,
    MissingRouteParameterError, RequestCompiler, RequestParts, StaticCompiler, Strategy,
    ValidationError,
};
pub use config::ClientConfig;
pub use courier_macros::{ApiRequest, EnumValue};
pub use request::{
    ApiRequest, BindingKey, BindingValue, BodyPayload, CollectionMode, EncodeOptions, EnumMode,
    EnumValue, EnumVariant, FormKind, Location, ParameterBinding, PrebuiltRequest,
    Representable, RequestDescriptor, Scalar, ToBindingValue, merge_bindings,
};
pub use response::{DecodeError, ResponseDecoder, UnexpectedBufferError};
pub use serializer::{
    Charset, Direction, DirectionScope, FormatError, JsonSerializer, PlainTextSerializer,
    SerializeError, Serializer, SerializerRegistry, TypeDirectionKey, TypeKey,
    UnsupportedCharset, UrlEncodedSerializer,
};
pub use wire::{WireBody, WireRequest};

pub mod compile;
mod config;
pub mod encode;
pub mod request;
pub mod response;
pub mod serializer;
mod wire;
