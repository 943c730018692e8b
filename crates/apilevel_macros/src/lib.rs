//! Procedural macros for `apilevel_core`.
//!
//! This crate provides `#[derive(MaxApiLevel)]` for declaring the highest
//! framework version a candidate implementation supports.

mod crate_path;
mod max_api_level;

use proc_macro::TokenStream;

/// Derive macro for the `MaxApiLevel` trait.
///
/// Generates an implementation of `apilevel_core::ceiling::MaxApiLevel` for the
/// annotated type, declaring the ceiling the engine uses when choosing between
/// candidates of one API family.
///
/// # Attributes
///
/// - `max` (required): dotted integer segments, e.g. `"13"` or `"4.3"`.
///   Suffixes such as `-SNAPSHOT` are rejected; a ceiling is a plain level.
///
/// # Example
///
/// ```ignore
/// use apilevel_core::ceiling::MaxApiLevel;
///
/// #[derive(Default, MaxApiLevel)]
/// #[api_level(max = "4.3")]
/// struct Scout43Api;
///
/// assert_eq!(Scout43Api::MAX_API_LEVEL, &[4, 3]);
/// ```
#[proc_macro_derive(MaxApiLevel, attributes(api_level))]
pub fn derive_max_api_level(input: TokenStream) -> TokenStream {
    max_api_level::derive_max_api_level(input)
}
