#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros shared by the fabric workspace.
//!
//! The only macro exported today is [`macro@mqf_error`], which every crate uses to
//! declare its error enum so that errors carry optional context, convert from
//! upstream errors with `?`, and report a coarse [`ErrorKind`]-style
//! classification to the orchestration layer.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining domain error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to any `Result` whose error converts into this enum.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source`
///   field (or a field marked `#[source]`/`#[from]`).
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant is present.
/// * **Classification**: With `#[mqf_error(kind = path::to::Kind)]`, every variant must
///   carry `#[kind(Variant)]` or `#[kind(source)]`; the macro then emits
///   `fn kind(&self) -> Kind`. `#[kind(source)]` delegates to the wrapped error's own
///   `kind()`.
///
/// # Requirements
///
/// 1. Must be applied to an **enum** with named-field variants.
/// 2. Variants with a source must also have `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[mqf_derive::mqf_error(kind = mqf_domain::ErrorKind)]
/// pub enum ProfileError {
///     #[kind(InvalidConfig)]
///     #[error("Invalid profile configuration{}: {message}", format_context(.context))]
///     InvalidConfig { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[kind(source)]
///     #[error("Registry failure{}: {source}", format_context(.context))]
///     Registry { source: mqf_registry::RegistryError, context: Option<Cow<'static, str>> },
/// }
/// ```
///
/// [`ErrorKind`]: https://docs.rs/mqf-domain
#[proc_macro_attribute]
pub fn mqf_error(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(args.into(), input).into()
}
