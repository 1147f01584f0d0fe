//! Procedural macros for `courier`.
//!
//! Don't depend on this crate directly: the derives are re-exported by `courier`.
use proc_macro::TokenStream;

mod api_request;
mod enum_value;

/// Derive [`RequestDescriptor`] and [`PrebuiltRequest`] for a struct with named fields.
///
/// # Struct attributes
///
/// - `#[request(method = "POST")]`: the HTTP method. Defaults to the parent's, or `GET`.
/// - `#[request(path = "/users/{id}")]`: the path template, absolute or relative to the
///   configured base URL.
/// - `#[request(form = "url_encoded")]` or `#[request(form = "multipart")]`: force a form
///   encoding. Without it, forms are url-encoded unless they contain binary fields.
/// - `#[request(validate = "path::to::check")]`: a `fn(&Self) -> Result<(), ValidationError>`
///   run before the request is compiled.
/// - `#[constant(header = "accept", value = "application/json")]`: a binding whose value
///   never changes. It can target `query`, `route`, `header` or `form` and can be repeated.
///   Constants come after the bindings declared by fields.
///
/// # Field attributes
///
/// Every field must be annotated with exactly one of:
///
/// - `#[query]`, `#[route]`, `#[header]` or `#[form]`: bind the field to that location.
///   The binding name defaults to the field name; it can be changed with `#[query = "q"]`
///   or `#[query(name = "q")]`. Further options:
///   - `required`: fail compilation if the field has no value;
///   - `enum_mode = "numeric" | "lower" | "upper"`;
///   - `collection = "concatenated" | "recursive" | "indexed" | "unordered"`;
///   - `separator = ","`, for concatenated collections;
///   - `file_name = "..."` and `content_type = "..."`, for binary form parts;
///   - `formatter = "path::to::fn"`, a `fn(&FieldType) -> String` producing the value.
/// - `#[body]`: the body payload. It must implement `serde::Serialize`; an `Option` payload
///   can be absent. Use `#[body(serializer = "path::to::fn")]` to bypass the serializer
///   registry with a `fn() -> Arc<dyn Serializer>`.
/// - `#[base]`: the parent request, whose settings are inherited.
///
/// [`RequestDescriptor`]: https://docs.rs/courier/latest/courier/request/trait.RequestDescriptor.html
/// [`PrebuiltRequest`]: https://docs.rs/courier/latest/courier/request/trait.PrebuiltRequest.html
#[proc_macro_derive(
    ApiRequest,
    attributes(request, constant, query, route, header, form, body, base)
)]
pub fn derive_api_request(input: TokenStream) -> TokenStream {
    api_request::derive_api_request(input)
}

/// Derive `EnumValue` and `ToBindingValue` for an enum with unit variants.
///
/// The variant name can be changed with `#[enum_value(rename = "...")]`.
#[proc_macro_derive(EnumValue, attributes(enum_value))]
pub fn derive_enum_value(input: TokenStream) -> TokenStream {
    enum_value::derive_enum_value(input)
}
