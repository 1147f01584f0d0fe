use std::sync::Arc;

use super::{CompileError, RequestCompiler, RequestParts};
use crate::config::ClientConfig;
use crate::request::{ApiRequest, PrebuiltRequest};
use crate::serializer::SerializerRegistry;
use crate::wire::WireRequest;

/// Compiles requests with the [`PrebuiltRequest`] logic generated for their type.
#[derive(Debug, Clone)]
pub struct StaticCompiler {
    registry: Arc<SerializerRegistry>,
}

impl StaticCompiler {
    pub fn new(registry: Arc<SerializerRegistry>) -> Self {
        Self { registry }
    }

    /// Compile a descriptor that only exposes prebuilt logic.
    #[tracing::instrument(name = "compile_request", skip_all, fields(strategy = "static"))]
    pub fn compile_prebuilt(
        &self,
        request: &dyn PrebuiltRequest,
        config: &ClientConfig,
    ) -> Result<WireRequest, CompileError> {
        request.prevalidate()?;
        let mut parts = RequestParts::new();
        request.prebuild(&mut parts);
        parts.finish(&self.registry, config)
    }
}

impl RequestCompiler for StaticCompiler {
    fn compile<R>(&self, request: &R, config: &ClientConfig) -> Result<WireRequest, CompileError>
    where
        R: ApiRequest,
    {
        self.compile_prebuilt(request, config)
    }
}
