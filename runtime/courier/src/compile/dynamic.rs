use std::sync::Arc;

use super::{CompileError, RequestCompiler, RequestParts};
use crate::config::ClientConfig;
use crate::request::{ApiRequest, RequestDescriptor, merge_bindings};
use crate::serializer::SerializerRegistry;
use crate::wire::WireRequest;

/// Compiles requests by walking their [`RequestDescriptor`] metadata.
///
/// Nothing is cached: the descriptor, and its ancestors, are inspected on every call.
#[derive(Debug, Clone)]
pub struct DynamicCompiler {
    registry: Arc<SerializerRegistry>,
}

impl DynamicCompiler {
    pub fn new(registry: Arc<SerializerRegistry>) -> Self {
        Self { registry }
    }

    /// Compile a descriptor that only exposes its metadata.
    #[tracing::instrument(name = "compile_request", skip_all, fields(strategy = "dynamic"))]
    pub fn compile_descriptor(
        &self,
        request: &dyn RequestDescriptor,
        config: &ClientConfig,
    ) -> Result<WireRequest, CompileError> {
        let mut chain = vec![request];
        let mut current = request;
        while let Some(parent) = current.parent() {
            chain.push(parent);
            current = parent;
        }
        // Ancestors first.
        chain.reverse();

        let mut parts = RequestParts::new();
        let mut bindings = Vec::new();
        for descriptor in chain {
            descriptor.validate()?;
            if let Some(method) = descriptor.method() {
                parts.set_method(method);
            }
            if let Some(path) = descriptor.path() {
                parts.set_path(path);
            }
            if let Some(form_kind) = descriptor.form_kind() {
                parts.set_form_kind(form_kind);
            }
            if let Some(body) = descriptor.body() {
                parts.set_body(body);
            }
            bindings = merge_bindings(bindings, descriptor.bindings());
        }
        for binding in bindings {
            parts.push(binding);
        }
        parts.finish(&self.registry, config)
    }
}

impl RequestCompiler for DynamicCompiler {
    fn compile<R>(&self, request: &R, config: &ClientConfig) -> Result<WireRequest, CompileError>
    where
        R: ApiRequest,
    {
        self.compile_descriptor(request, config)
    }
}
