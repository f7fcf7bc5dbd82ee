#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Dormant workspace crates.
//!
//! * [`macro@dormant_error`] turns a plain enum into a `thiserror` error with
//!   context support.
//! * [`macro@api_model`] and [`macro@api_handler`] keep HTTP DTOs and handlers
//!   consistent and documented through `utoipa` when the `server` feature of the
//!   consuming crate is enabled.
//!
//! The examples below are `ignore`d because they only compile inside consuming crates.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Attribute macro for crate-level error enums.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<ErrorName>Ext` trait with `.context(...)` for `Result<T, ErrorName>`, and for
///   `Result<T, Source>` of every variant that wraps a source error.
/// * `From<Source>` for every variant with a `source` (or `#[source]`/`#[from]`) field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }`
///   variant exists.
/// * A private `format_context` helper for use inside `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant carrying a source must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[dormant_derive::dormant_error]
/// pub enum CrmError {
///     #[error("Transport error{}: {source}", format_context(.context))]
///     Transport { source: reqwest::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal CRM error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn fetch(client: &reqwest::Client) -> Result<(), CrmError> {
///     client.get("https://example.com").build().context("Building request")?;
///     Err("unreachable state".into())
/// }
/// ```
#[proc_macro_attribute]
pub fn dormant_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}

/// Attribute macro for HTTP request and response models.
///
/// Adds `Debug`, `Serialize` and `Deserialize` when missing, derives
/// `utoipa::ToSchema` behind the consumer's `server` feature, and applies
/// `#[serde(rename_all = "snake_case")]` unless `rename_all = "..."` is given.
/// `deny_unknown_fields = true` opts into strict field checking.
///
/// ```rust,ignore
/// #[dormant_derive::api_model(deny_unknown_fields = true)]
/// pub struct InspectRequest {
///     pub token: Option<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_model(args.into(), input).into()
}

/// Attribute macro that documents an axum handler via `utoipa::path`.
///
/// The arguments are passed through to `utoipa::path` unchanged when the consumer's
/// `server` feature is on.
///
/// ```rust,ignore
/// #[dormant_derive::api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_handler(args.into(), input).into()
}
