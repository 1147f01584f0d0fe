//! A derive macro for implementing `EnumValue` (and `ToBindingValue`) for fieldless enums.
use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Lit, parse_macro_input};

pub(super) fn derive_enum_value(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let unsupported_error_msg = "`EnumValue` can only be derived for enums with unit variants (no fields). \
        Consider implementing the trait manually.";

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(name, unsupported_error_msg)
            .to_compile_error()
            .into();
    };
    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "`EnumValue` can't be derived for generic enums.")
            .to_compile_error()
            .into();
    }

    let mut name_arms = Vec::new();
    let mut discriminant_arms = Vec::new();
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(&variant.ident, unsupported_error_msg)
                .to_compile_error()
                .into();
        }

        let variant_ident = &variant.ident;
        let mut variant_name = variant_ident.to_string();
        for attr in &variant.attrs {
            if !attr.meta.path().is_ident("enum_value") {
                continue;
            }
            let error_msg = "Invalid `enum_value` attribute. Expected `#[enum_value(rename = \"name\")]`";
            let Ok(args) = attr.parse_args::<syn::MetaNameValue>() else {
                return syn::Error::new_spanned(attr, error_msg)
                    .to_compile_error()
                    .into();
            };
            if !args.path.is_ident("rename") {
                return syn::Error::new_spanned(&args.path, error_msg)
                    .to_compile_error()
                    .into();
            }
            let syn::Expr::Lit(syn::ExprLit {
                lit: Lit::Str(lit_str),
                ..
            }) = &args.value
            else {
                return syn::Error::new_spanned(&args.value, error_msg)
                    .to_compile_error()
                    .into();
            };
            variant_name = lit_str.value();
            if variant_name.is_empty() {
                return syn::Error::new_spanned(&args.value, "The variant name can't be empty.")
                    .to_compile_error()
                    .into();
            }
        }

        name_arms.push(quote! {
            #name::#variant_ident => #variant_name,
        });
        discriminant_arms.push(quote! {
            #name::#variant_ident => #name::#variant_ident as i64,
        });
    }

    let expanded = quote! {
        #[automatically_derived]
        impl ::courier::EnumValue for #name {
            fn variant_name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }

            fn discriminant(&self) -> i64 {
                match self {
                    #(#discriminant_arms)*
                }
            }
        }

        #[automatically_derived]
        impl ::courier::ToBindingValue for #name {
            fn to_binding_value(&self) -> ::core::option::Option<::courier::BindingValue<'_>> {
                ::core::option::Option::Some(::courier::BindingValue::Enum(
                    ::courier::EnumValue::to_variant(self),
                ))
            }
        }
    };
    expanded.into()
}
