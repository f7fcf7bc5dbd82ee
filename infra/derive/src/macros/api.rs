use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Expr, ItemFn, ItemStruct, Lit, LitStr, Meta, MetaNameValue, Token};

use super::derived_traits;

struct ModelArgs {
    rename_all: LitStr,
    deny_unknown_fields: bool,
}

impl Default for ModelArgs {
    fn default() -> Self {
        Self { rename_all: LitStr::new("snake_case", Span::call_site()), deny_unknown_fields: false }
    }
}

impl ModelArgs {
    fn parse(args: TokenStream) -> syn::Result<Self> {
        let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
        let mut parsed = Self::default();

        for meta in metas {
            let Meta::NameValue(nv) = meta else {
                return Err(syn::Error::new_spanned(meta, "expected `key = value` arguments"));
            };

            if nv.path.is_ident("rename_all") {
                parsed.rename_all = literal(&nv, |lit| match lit {
                    Lit::Str(s) => Some(s.clone()),
                    _ => None,
                })?;
            } else if nv.path.is_ident("deny_unknown_fields") {
                parsed.deny_unknown_fields = literal(&nv, |lit| match lit {
                    Lit::Bool(b) => Some(b.value),
                    _ => None,
                })?;
            } else {
                return Err(syn::Error::new_spanned(
                    nv.path,
                    "unsupported argument; expected `rename_all` or `deny_unknown_fields`",
                ));
            }
        }

        Ok(parsed)
    }
}

fn literal<T>(nv: &MetaNameValue, pick: impl Fn(&Lit) -> Option<T>) -> syn::Result<T> {
    if let Expr::Lit(expr) = &nv.value
        && let Some(value) = pick(&expr.lit)
    {
        return Ok(value);
    }
    Err(syn::Error::new_spanned(&nv.value, "unexpected literal type"))
}

/// Expands `#[api_model]`.
pub fn expand_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    let args = match ModelArgs::parse(args) {
        Ok(args) => args,
        Err(err) => return err.into_compile_error(),
    };

    let existing = derived_traits(&input.attrs);
    let mut derives = Vec::new();
    if !existing.contains("Debug") {
        derives.push(quote! { Debug });
    }
    if !existing.contains("Serialize") {
        derives.push(quote! { ::serde::Serialize });
    }
    if !existing.contains("Deserialize") {
        derives.push(quote! { ::serde::Deserialize });
    }
    let derive_attr = if derives.is_empty() { quote! {} } else { quote! { #[derive(#(#derives),*)] } };

    let schema_attr = if existing.contains("ToSchema") {
        quote! {}
    } else {
        quote! { #[cfg_attr(feature = "server", derive(::utoipa::ToSchema))] }
    };

    let rename_all = &args.rename_all;
    let deny_attr =
        if args.deny_unknown_fields { quote! { #[serde(deny_unknown_fields)] } } else { quote! {} };

    quote! {
        #derive_attr
        #schema_attr
        #[serde(rename_all = #rename_all)]
        #deny_attr
        #input
    }
}

/// Expands `#[api_handler]`.
pub fn expand_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[cfg_attr(feature = "server", ::utoipa::path(#args))]
        #vis #sig #block
    }
}
