//! Compile request descriptors into [`WireRequest`]s.
//!
//! # Strategies
//!
//! There are two ways to compile a descriptor:
//!
//! - [`DynamicCompiler`] walks the [`RequestDescriptor`] metadata of the descriptor, and of
//!   its ancestors, on every call;
//! - [`StaticCompiler`] runs the [`PrebuiltRequest`] logic generated by
//!   `#[derive(ApiRequest)]`.
//!
//! They implement the same [`RequestCompiler`] trait and produce identical requests,
//! byte for byte. [`Compiler`] picks one at runtime, according to a [`Strategy`].
//!
//! [`RequestDescriptor`]: crate::RequestDescriptor
//! [`PrebuiltRequest`]: crate::PrebuiltRequest
use std::sync::Arc;

pub use dynamic::DynamicCompiler;
pub use errors::{
    CompileError, ConflictingBodyError, EncodingError, MissingRouteParameterError,
    ValidationError,
};
pub use parts::RequestParts;
pub use prebuilt::StaticCompiler;

use crate::config::ClientConfig;
use crate::request::ApiRequest;
use crate::serializer::SerializerRegistry;
use crate::wire::WireRequest;

mod dynamic;
mod errors;
mod multipart;
mod parts;
mod prebuilt;
mod route;

/// Turns a request descriptor into a [`WireRequest`].
pub trait RequestCompiler {
    fn compile<R>(&self, request: &R, config: &ClientConfig) -> Result<WireRequest, CompileError>
    where
        R: ApiRequest;
}

/// The compilation strategy used by a [`Compiler`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Use the logic generated by `#[derive(ApiRequest)]`.
    #[default]
    Static,
    /// Walk the descriptor metadata on every call.
    Dynamic,
}

/// A [`RequestCompiler`] that dispatches to either strategy.
#[derive(Debug, Clone)]
pub struct Compiler {
    dynamic: DynamicCompiler,
    static_: StaticCompiler,
    strategy: Strategy,
}

impl Compiler {
    pub fn new(registry: Arc<SerializerRegistry>, strategy: Strategy) -> Self {
        Self {
            dynamic: DynamicCompiler::new(registry.clone()),
            static_: StaticCompiler::new(registry),
            strategy,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl RequestCompiler for Compiler {
    fn compile<R>(&self, request: &R, config: &ClientConfig) -> Result<WireRequest, CompileError>
    where
        R: ApiRequest,
    {
        match self.strategy {
            Strategy::Static => self.static_.compile(request, config),
            Strategy::Dynamic => self.dynamic.compile(request, config),
        }
    }
}
