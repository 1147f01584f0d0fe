use darling::{
    FromDeriveInput, FromField, FromMeta,
    util::{Flag, Ignored},
};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::{DeriveInput, Ident, Type, ext::IdentExt, parse_macro_input, spanned::Spanned};

const METHODS: [&str; 9] = [
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "TRACE", "CONNECT",
];

#[derive(FromDeriveInput)]
#[darling(attributes(request), forward_attrs(constant), supports(struct_named))]
struct ApiRequestInput {
    data: darling::ast::Data<Ignored, ParsedField>,
    generics: syn::Generics,
    ident: Ident,
    attrs: Vec<syn::Attribute>,
    method: Option<String>,
    path: Option<String>,
    form: Option<String>,
    validate: Option<syn::Path>,
}

#[derive(Debug)]
struct ParsedField {
    ident: Ident,
    ty: Type,
    source: FieldSource,
}

#[derive(Debug)]
enum FieldSource {
    Binding(Location, BindingAttr),
    Body(BodyAttr),
    Base,
}

#[derive(Debug, Clone, Copy)]
enum Location {
    Query,
    Route,
    Header,
    Form,
}

impl Location {
    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "query" => Some(Location::Query),
            "route" => Some(Location::Route),
            "header" => Some(Location::Header),
            "form" => Some(Location::Form),
            _ => None,
        }
    }

    fn tokens(self) -> TokenStream2 {
        match self {
            Location::Query => quote! { ::courier::Location::Query },
            Location::Route => quote! { ::courier::Location::Route },
            Location::Header => quote! { ::courier::Location::Header },
            Location::Form => quote! { ::courier::Location::Form },
        }
    }
}

// Nested meta for `#[query(name = "...", ...)]` and its siblings.
#[derive(Default, Debug, FromMeta)]
#[darling(default, from_word = || Ok(Default::default()))]
struct BindingAttr {
    name: Option<String>,
    required: Flag,
    enum_mode: Option<String>,
    collection: Option<String>,
    separator: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    formatter: Option<syn::Path>,
}

impl BindingAttr {
    /// Accept both `#[query = "q"]` and `#[query(name = "q", ..)]`.
    fn parse(meta: &syn::Meta) -> darling::Result<Self> {
        if let syn::Meta::NameValue(syn::MetaNameValue {
            value:
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(name),
                    ..
                }),
            ..
        }) = meta
        {
            return Ok(Self {
                name: Some(name.value()),
                ..Default::default()
            });
        }
        Self::from_meta(meta)
    }
}

// Nested meta for `#[body(serializer = "...")]`
#[derive(Default, Debug, FromMeta)]
#[darling(default, from_word = || Ok(Default::default()))]
struct BodyAttr {
    serializer: Option<syn::Path>,
}

// `#[constant(header = "accept", value = "application/json")]`
#[derive(Debug, FromMeta)]
struct ConstantAttr {
    query: Option<String>,
    route: Option<String>,
    header: Option<String>,
    form: Option<String>,
    value: String,
}

impl FromField for ParsedField {
    fn from_field(field: &syn::Field) -> darling::Result<Self> {
        let mut sources = Vec::new();
        for attr in &field.attrs {
            // Doc comments, `#[serde(..)]` and friends are none of our business.
            let Some(ident) = attr.path().get_ident().map(Ident::to_string) else {
                continue;
            };
            let source = if let Some(location) = Location::from_ident(&ident) {
                FieldSource::Binding(location, BindingAttr::parse(&attr.meta)?)
            } else if ident == "body" {
                FieldSource::Body(BodyAttr::from_meta(&attr.meta)?)
            } else if ident == "base" {
                if attr.meta.require_path_only().is_err() {
                    let error =
                        darling::Error::custom("There are no additional parameters for `#[base]`.")
                            .with_span(&attr.meta);
                    return Err(error);
                }
                FieldSource::Base
            } else {
                continue;
            };
            sources.push((ident, source));
        }

        let Some(ident) = field.ident.clone() else {
            return Err(darling::Error::unsupported_shape("tuple struct").with_span(field));
        };
        match sources.len() {
            1 => Ok(Self {
                ident,
                ty: field.ty.clone(),
                source: sources.remove(0).1,
            }),
            0 => Err(darling::Error::custom(format!(
                "Field `{ident}` must specify where it goes in the request.\nUse one of the following: \
                 #[query], #[route], #[header], #[form], #[body] or #[base].",
            ))
            .with_span(&ident)),
            _ => {
                let used = sources
                    .iter()
                    .map(|(name, _)| format!("#[{name}]"))
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(darling::Error::custom(format!(
                    "There are multiple conflicting sources for field `{ident}`: {used}.\nUse only **one** of them.",
                ))
                .with_span(&ident))
            }
        }
    }
}

pub(super) fn derive_api_request(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match _derive_api_request(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}

fn _derive_api_request(input: DeriveInput) -> Result<TokenStream2, darling::Error> {
    let input = ApiRequestInput::from_derive_input(&input)?;
    reject_invalid_inputs(&input)?;

    let struct_ident = &input.ident;
    let Some(fields) = input.data.as_ref().take_struct() else {
        return Err(darling::Error::unsupported_shape("enum").with_span(struct_ident));
    };

    let method = input
        .method
        .as_deref()
        .map(|m| method_tokens(m, struct_ident))
        .transpose()?;
    let form_kind = input
        .form
        .as_deref()
        .map(|f| form_kind_tokens(f, struct_ident))
        .transpose()?;
    let path = input.path.as_deref();

    let mut bindings = Vec::new();
    let mut body = None;
    let mut base = None;
    for field in fields.iter() {
        match &field.source {
            FieldSource::Binding(location, attr) => {
                bindings.push(binding_tokens(field, *location, attr)?);
            }
            FieldSource::Body(attr) => {
                if body.is_some() {
                    return Err(darling::Error::custom(
                        "A request can't have more than one `#[body]` field.",
                    )
                    .with_span(&field.ident));
                }
                body = Some(body_tokens(field, attr));
            }
            FieldSource::Base => {
                if base.is_some() {
                    return Err(darling::Error::custom(
                        "A request can't extend more than one `#[base]` request.",
                    )
                    .with_span(&field.ident));
                }
                base = Some(&field.ident);
            }
        }
    }
    for attr in &input.attrs {
        bindings.push(constant_tokens(attr)?);
    }

    let method_fn = method.as_ref().map(|method| {
        quote! {
            fn method(&self) -> ::core::option::Option<::courier::http::Method> {
                ::core::option::Option::Some(#method)
            }
        }
    });
    let path_fn = path.map(|path| {
        quote! {
            fn path(&self) -> ::core::option::Option<&str> {
                ::core::option::Option::Some(#path)
            }
        }
    });
    let parent_fn = base.map(|base| {
        quote! {
            fn parent(&self) -> ::core::option::Option<&dyn ::courier::RequestDescriptor> {
                ::core::option::Option::Some(&self.#base)
            }
        }
    });
    let body_fn = body.as_ref().map(|body| {
        quote! {
            fn body(&self) -> ::core::option::Option<::courier::BodyPayload<'_>> {
                #body
            }
        }
    });
    let form_kind_fn = form_kind.as_ref().map(|form_kind| {
        quote! {
            fn form_kind(&self) -> ::core::option::Option<::courier::FormKind> {
                ::core::option::Option::Some(#form_kind)
            }
        }
    });
    let validate_fn = input.validate.as_ref().map(|validate| {
        quote! {
            fn validate(&self) -> ::core::result::Result<(), ::courier::ValidationError> {
                #validate(self)
            }
        }
    });

    let prevalidate_base = base.map(|base| {
        quote! { ::courier::PrebuiltRequest::prevalidate(&self.#base)?; }
    });
    let prevalidate_own = input
        .validate
        .as_ref()
        .map(|validate| quote! { #validate(self)?; });
    let prebuild_base = base.map(|base| {
        quote! { ::courier::PrebuiltRequest::prebuild(&self.#base, parts); }
    });
    let set_method = method.map(|method| quote! { parts.set_method(#method); });
    let set_path = path.map(|path| quote! { parts.set_path(#path); });
    let set_form_kind = form_kind.map(|form_kind| quote! { parts.set_form_kind(#form_kind); });
    let set_body = body.map(|body| {
        quote! {
            if let ::core::option::Option::Some(body) = #body {
                parts.set_body(body);
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::courier::RequestDescriptor for #struct_ident #ty_generics #where_clause {
            #method_fn
            #path_fn
            #parent_fn

            fn bindings(&self) -> ::std::vec::Vec<::courier::ParameterBinding<'_>> {
                ::std::vec![#(#bindings),*]
            }

            #body_fn
            #form_kind_fn
            #validate_fn
        }

        #[automatically_derived]
        impl #impl_generics ::courier::PrebuiltRequest for #struct_ident #ty_generics #where_clause {
            fn prevalidate(&self) -> ::core::result::Result<(), ::courier::ValidationError> {
                #prevalidate_base
                #prevalidate_own
                ::core::result::Result::Ok(())
            }

            fn prebuild<'a>(&'a self, parts: &mut ::courier::RequestParts<'a>) {
                #prebuild_base
                #set_method
                #set_path
                #set_form_kind
                #set_body
                #(parts.push(#bindings);)*
            }
        }
    })
}

fn reject_invalid_inputs(input: &ApiRequestInput) -> Result<(), darling::Error> {
    let struct_ident = &input.ident;
    if let Some(generic) = input.generics.type_params().next() {
        return Err(darling::Error::custom(format!(
            "`#[derive(ApiRequest)]` can't be applied to structs with generic type parameters, such as `{struct_ident}`.\n\n\
            help: Consider using concrete types instead.",
        ))
        .with_span(generic));
    }
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(darling::Error::custom(format!(
            "`#[derive(ApiRequest)]` can't be applied to structs with generic lifetimes, such as `{struct_ident}`.\n\n\
            help: Use owned types for the fields of `{struct_ident}`.",
        ))
        .with_span(lifetime));
    }
    Ok(())
}

fn method_tokens(method: &str, span: &Ident) -> darling::Result<TokenStream2> {
    let upper = method.trim().to_uppercase();
    if !METHODS.contains(&upper.as_str()) {
        return Err(darling::Error::custom(format!(
            "`{method}` isn't a supported HTTP method.\nUse one of the following: {}.",
            METHODS.join(", ")
        ))
        .with_span(span));
    }
    let ident = Ident::new(&upper, span.span());
    Ok(quote! { ::courier::http::Method::#ident })
}

fn form_kind_tokens(form: &str, span: &Ident) -> darling::Result<TokenStream2> {
    match form.trim() {
        "url_encoded" => Ok(quote! { ::courier::FormKind::UrlEncoded }),
        "multipart" => Ok(quote! { ::courier::FormKind::Multipart }),
        other => Err(darling::Error::custom(format!(
            "`{other}` isn't a supported form encoding. Use either `url_encoded` or `multipart`."
        ))
        .with_span(span)),
    }
}

fn binding_tokens(
    field: &ParsedField,
    location: Location,
    attr: &BindingAttr,
) -> darling::Result<TokenStream2> {
    let field_ident = &field.ident;
    let ty_span = field.ty.span();
    let name = attr
        .name
        .clone()
        .unwrap_or_else(|| field_ident.unraw().to_string());

    let mut options = quote! { ::courier::EncodeOptions::DEFAULT };
    if let Some(mode) = &attr.enum_mode {
        let mode = match mode.trim() {
            "numeric" => quote! { ::courier::EnumMode::Numeric },
            "lower" => quote! { ::courier::EnumMode::StringLower },
            "upper" => quote! { ::courier::EnumMode::StringUpper },
            other => {
                return Err(darling::Error::custom(format!(
                    "`{other}` isn't a valid `enum_mode`. Use one of `numeric`, `lower` or `upper`."
                ))
                .with_span(field_ident));
            }
        };
        options = quote! { #options.enum_mode(#mode) };
    }
    if let Some(collection) = &attr.collection {
        let mode = match collection.trim() {
            "concatenated" => quote! { ::courier::CollectionMode::Concatenated },
            "recursive" => quote! { ::courier::CollectionMode::Recursive },
            "indexed" => quote! { ::courier::CollectionMode::Indexed },
            "unordered" => quote! { ::courier::CollectionMode::Unordered },
            other => {
                return Err(darling::Error::custom(format!(
                    "`{other}` isn't a valid `collection` mode. \
                     Use one of `concatenated`, `recursive`, `indexed` or `unordered`."
                ))
                .with_span(field_ident));
            }
        };
        options = quote! { #options.collection_mode(#mode) };
    }
    if let Some(separator) = &attr.separator {
        options = quote! { #options.separator(#separator) };
    }
    if let Some(file_name) = &attr.file_name {
        options = quote! { #options.file_name(#file_name) };
    }
    if let Some(content_type) = &attr.content_type {
        options = quote! { #options.content_type(#content_type) };
    }

    let value = match &attr.formatter {
        Some(formatter) => quote_spanned! { ty_span =>
            ::core::option::Option::Some(::courier::BindingValue::Composite(
                ::std::borrow::Cow::Owned(#formatter(&self.#field_ident)),
            ))
        },
        None => quote_spanned! { ty_span =>
            ::courier::ToBindingValue::to_binding_value(&self.#field_ident)
        },
    };
    let required = attr.required.is_present().then(|| quote! { .required() });
    let location = location.tokens();
    Ok(quote! {
        ::courier::ParameterBinding::new(#location, #name, #value)
            .with_options(#options)
            #required
    })
}

fn body_tokens(field: &ParsedField, attr: &BodyAttr) -> TokenStream2 {
    let field_ident = &field.ident;
    let ty_span = field.ty.span();
    let payload = if is_option(&field.ty) {
        quote_spanned! { ty_span =>
            self.#field_ident.as_ref().map(::courier::BodyPayload::new)
        }
    } else {
        quote_spanned! { ty_span =>
            ::core::option::Option::Some(::courier::BodyPayload::new(&self.#field_ident))
        }
    };
    match &attr.serializer {
        Some(serializer) => quote! {
            #payload.map(|payload| payload.with_serializer(#serializer()))
        },
        None => payload,
    }
}

fn constant_tokens(attr: &syn::Attribute) -> darling::Result<TokenStream2> {
    let constant = ConstantAttr::from_meta(&attr.meta)?;
    let targets = [
        (Location::Query, &constant.query),
        (Location::Route, &constant.route),
        (Location::Header, &constant.header),
        (Location::Form, &constant.form),
    ];
    let mut set = targets
        .iter()
        .filter_map(|&(location, name)| name.as_ref().map(|name| (location, name)));
    let (Some((location, name)), None) = (set.next(), set.next()) else {
        return Err(darling::Error::custom(
            "A constant must target exactly one of `query`, `route`, `header` or `form`.\n\
             For example, `#[constant(header = \"accept\", value = \"application/json\")]`.",
        )
        .with_span(&attr.meta));
    };
    let location = location.tokens();
    let value = &constant.value;
    Ok(quote! {
        ::courier::ParameterBinding::new(
            #location,
            #name,
            ::core::option::Option::Some(::courier::BindingValue::str(#value)),
        )
    })
}

/// Whether `ty` is spelled as `Option<...>`.
fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.qself.is_none()
        && path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option")
}
