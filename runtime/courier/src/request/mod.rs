//! Describe requests as Rust types.
//!
//! # Descriptors
//!
//! A request descriptor is a struct whose fields are the parameters of an HTTP call.
//! It is usually annotated with `#[derive(ApiRequest)]`, which implements both
//! [`RequestDescriptor`] (the metadata walked by [`DynamicCompiler`]) and
//! [`PrebuiltRequest`] (the straight-line logic run by [`StaticCompiler`]).
//!
//! ```rust
//! use courier::ApiRequest;
//!
//! #[derive(ApiRequest)]
//! #[request(method = "GET", path = "/users/{id}/repos")]
//! pub struct ListRepos {
//!     #[route]
//!     pub id: u64,
//!     #[query(name = "per_page")]
//!     pub page_size: Option<u32>,
//!     #[header(name = "x-request-id")]
//!     pub request_id: String,
//! }
//! ```
//!
//! # Composition
//!
//! A descriptor can embed another one with `#[base]`: it inherits its method, its path
//! template and its bindings.
//! Its own settings override the inherited ones, see [`merge_bindings`] for the rules.
//!
//! [`DynamicCompiler`]: crate::DynamicCompiler
//! [`StaticCompiler`]: crate::StaticCompiler
use http::Method;

pub use binding::{
    BindingKey, CollectionMode, EncodeOptions, EnumMode, Location, ParameterBinding,
    merge_bindings,
};
pub use body::{BodyPayload, FormKind};
pub use value::{BindingValue, EnumValue, EnumVariant, Representable, Scalar, ToBindingValue};

use crate::compile::{RequestParts, ValidationError};

mod binding;
mod body;
mod value;

/// The runtime metadata of a request descriptor.
///
/// Every method except [`bindings`](Self::bindings) describes this descriptor alone:
/// inherited settings are reached through [`parent`](Self::parent).
pub trait RequestDescriptor {
    /// The HTTP method, if this descriptor sets one.
    fn method(&self) -> Option<Method> {
        None
    }

    /// The path template, e.g. `/users/{id}`, if this descriptor sets one.
    ///
    /// Absolute templates (`https://...`) are used as they are, relative ones are joined
    /// to [`ClientConfig::base_url`](crate::ClientConfig::base_url).
    fn path(&self) -> Option<&str> {
        None
    }

    /// The descriptor this one extends.
    fn parent(&self) -> Option<&dyn RequestDescriptor> {
        None
    }

    /// The parameters declared by this descriptor, in declaration order.
    fn bindings(&self) -> Vec<ParameterBinding<'_>>;

    fn body(&self) -> Option<BodyPayload<'_>> {
        None
    }

    fn form_kind(&self) -> Option<FormKind> {
        None
    }

    /// A custom check, run before anything is encoded.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Compilation logic generated ahead of time for a request descriptor.
///
/// It must produce the same [`RequestParts`] a [`DynamicCompiler`](crate::DynamicCompiler)
/// would assemble from the [`RequestDescriptor`] metadata.
pub trait PrebuiltRequest {
    /// Run the validation hooks of the descriptor and of its ancestors, root first.
    fn prevalidate(&self) -> Result<(), ValidationError>;

    /// Push the request settings into `parts`, inherited ones first.
    fn prebuild<'a>(&'a self, parts: &mut RequestParts<'a>);
}

/// A request descriptor that can be compiled with either strategy.
///
/// It is implemented for every type that implements both [`RequestDescriptor`] and
/// [`PrebuiltRequest`].
pub trait ApiRequest: RequestDescriptor + PrebuiltRequest {}

impl<T> ApiRequest for T where T: RequestDescriptor + PrebuiltRequest {}
