//! Derive macro for the `MaxApiLevel` trait.

use darling::FromDeriveInput;
use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use crate::crate_path::apilevel_core_path;

/// Parsed attributes for the macro.
#[derive(FromDeriveInput)]
#[darling(attributes(api_level))]
struct MaxApiLevelArgs {
    ident: syn::Ident,
    generics: syn::Generics,

    /// The ceiling as dotted segments, e.g. `"4.3"`.
    #[darling(default)]
    max: Option<syn::LitStr>,
}

/// Splits a dotted ceiling into its integer segments.
fn parse_segments(level: &str) -> Result<Vec<u32>, String> {
    let level = level.trim();
    if level.is_empty() {
        return Err("`max` must name at least one segment".to_string());
    }
    if level.contains('-') {
        return Err(format!("ceiling '{level}' must not carry a suffix"));
    }

    level
        .split('.')
        .map(|segment| {
            segment.parse::<u32>().map_err(|_| {
                format!("invalid ceiling segment '{segment}' in '{level}': expected a non-negative integer")
            })
        })
        .collect()
}

/// Implementation of the `#[derive(MaxApiLevel)]` macro.
pub(crate) fn derive_max_api_level(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let args = match MaxApiLevelArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(err) => return err.write_errors().into(),
    };

    let Some(max) = &args.max else {
        return syn::Error::new_spanned(
            &args.ident,
            "missing ceiling: add `#[api_level(max = \"...\")]`",
        )
        .to_compile_error()
        .into();
    };

    let segments = match parse_segments(&max.value()) {
        Ok(segments) => segments,
        Err(message) => return syn::Error::new(max.span(), message).to_compile_error().into(),
    };

    let name = &args.ident;
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();
    let core = apilevel_core_path();

    let expanded = quote! {
        impl #impl_generics #core::ceiling::MaxApiLevel for #name #ty_generics #where_clause {
            const MAX_API_LEVEL: &'static [u32] = &[#(#segments),*];
        }
    };

    expanded.into()
}
