//! # Macros
//!
//! Procedural macros shared across the Arcade workspace.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! arcade-derive = { path = "../infra/derive" }
//! thiserror = "2"
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Turns a plain enum into a crate error type with context support.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to `Result<T, Source>` for every wrapped source type.
/// * **Conversions**: Implements `From<Source>` for variants with a `source` field
///   (or a field marked `#[source]`/`#[from]`), so `?` works on upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal { message, context }` variant is present.
///
/// # Requirements
///
/// Every variant uses named fields and carries a `context: Option<Cow<'static, str>>`.
/// Tuple and unit variants are rejected at compile time.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[arcade_derive::arcade_error]
/// pub enum SpriteLoadError {
///     #[error("Sprite read failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal sprite error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &std::path::Path) -> Result<String, SpriteLoadError> {
///     std::fs::read_to_string(path).context("Reading sprite sheet")
/// }
/// ```
#[proc_macro_attribute]
pub fn arcade_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).unwrap_or_else(syn::Error::into_compile_error).into()
}
