use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::serializer::{Serializer, TypeKey};

/// The body of a request, before serialization.
///
/// The serializer is looked up in the [`SerializerRegistry`](crate::SerializerRegistry)
/// using the payload type, unless an override is attached.
#[derive(Clone)]
pub struct BodyPayload<'a> {
    value: &'a dyn erased_serde::Serialize,
    type_key: TypeKey,
    serializer: Option<Arc<dyn Serializer>>,
}

impl<'a> BodyPayload<'a> {
    pub fn new<T>(value: &'a T) -> Self
    where
        T: serde::Serialize + 'static,
    {
        Self {
            value,
            type_key: TypeKey::of::<T>(),
            serializer: None,
        }
    }

    /// Serialize the payload with `serializer`, bypassing the registry.
    pub fn with_serializer(mut self, serializer: Arc<dyn Serializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn value(&self) -> &'a dyn erased_serde::Serialize {
        self.value
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn serializer(&self) -> Option<&Arc<dyn Serializer>> {
        self.serializer.as_ref()
    }
}

impl Debug for BodyPayload<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyPayload")
            .field("type", &self.type_key)
            .field("serializer", &self.serializer)
            .finish_non_exhaustive()
    }
}

/// The encoding of a form body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// `application/x-www-form-urlencoded`. Text fields only.
    UrlEncoded,
    /// `multipart/form-data`.
    Multipart,
}
