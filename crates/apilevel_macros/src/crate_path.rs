//! Auto-detection of the `apilevel_core` path for generated code.
//!
//! Derived impls name the `MaxApiLevel` trait by a fully-qualified path. The
//! path depends on how the consuming crate reaches the engine:
//! 1. `apilevel_core` itself (relies on `extern crate self as apilevel_core`).
//! 2. A direct, possibly renamed, `apilevel_core` dependency.
//! 3. The `apilevel` umbrella crate (`apilevel::apilevel_core`).

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Returns the token path for `apilevel_core` in the consuming crate.
pub(crate) fn apilevel_core_path() -> TokenStream {
    match crate_name("apilevel_core") {
        Ok(FoundCrate::Itself) => quote!(apilevel_core),
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote!(::#ident)
        }
        Err(_) => match crate_name("apilevel") {
            Ok(FoundCrate::Name(name)) => {
                let ident = format_ident!("{}", name);
                quote!(::#ident::apilevel_core)
            }
            // Tests and doctests of the umbrella crate itself.
            Ok(FoundCrate::Itself) => quote!(::apilevel::apilevel_core),
            Err(_) => quote!(::apilevel_core),
        },
    }
}
