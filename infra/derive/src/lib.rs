#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the declaration engine.
//! This crate turns plain structs into scannable holders and removes the boilerplate of the
//! workspace error enums.
//!
//! ## Usage
//! Generated holder code refers to `decl-domain` by absolute path, so consumers depend on both:
//! ```toml
//! [dependencies]
//! decl-derive = { path = "../infra/derive" }
//! decl-domain = { path = "../crates/shared/domain" }
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `decl_domain::holder::Holder` for a struct with named fields.
///
/// Every `pub` field is listed, in declaration order, together with the tags and markers
/// declared on it. Private fields are invisible to scans.
///
/// # Field attributes
///
/// * `#[entry(name = "...", display_name = "...", no_display_name)]` - a simple object entry.
///   Without `display_name`/`no_display_name` the display name is derived from the namespace.
/// * `#[compound(name = "...", companion = Type, record = Type, sub_entry(name = "...", record = Type))]`
///   - a compound object entry; accepts the same display name arguments as `entry`.
/// * `#[property(category = "...", name = "...", comment = "...")]` - a configuration value;
///   `name` defaults to the field identifier.
/// * `#[holder(ignore)]` - never scanned. `#[holder(frozen)]` - visible but not writable.
///
/// # Errors
/// Emits a compile-time error for enums, tuple structs, unknown tag arguments and
/// missing required arguments.
///
/// # Example
/// ```rust,ignore
/// use decl_derive::Holder;
/// use std::sync::Arc;
///
/// #[derive(Holder, Default)]
/// pub struct Items {
///     #[entry(name = "pickaxe")]
///     pub pickaxe: Option<Arc<Pickaxe>>,
///
///     #[compound(name = "furnace", record = FurnaceState, sub_entry(name = "core", record = CoreState))]
///     pub furnace: Option<Arc<Furnace>>,
///
///     #[property(category = "general", name = "maxSize", comment = "Largest stack")]
///     pub max_size: i32,
/// }
/// ```
#[proc_macro_derive(Holder, attributes(entry, compound, property, holder))]
pub fn derive_holder(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::holder::expand_derive(&input).into()
}

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field
///   (or a field marked `#[source]`/`#[from]`), enabling the `?` operator for upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal` variant exists.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Variants with a source must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use decl_derive::decl_error;
/// use std::borrow::Cow;
///
/// #[decl_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn decl_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
