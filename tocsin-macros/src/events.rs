//! Event-related macros.
//!
//! This module contains:
//! - `#[derive(Events)]` - Derive macro for implementing the `Events` trait on a unit enum

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Token, parse_macro_input};

/// Derive macro for implementing `Events` trait.
///
/// Each unit variant is one event. The event name is the variant name in
/// `snake_case` unless `#[event(name = "...")]` overrides it.
pub fn derive_events_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_events(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_events(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "`#[derive(Events)]` only supports enums",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "`#[derive(Events)]` does not support generic enums",
        ));
    }

    let mut idents: Vec<&Ident> = Vec::with_capacity(data.variants.len());
    let mut names: Vec<String> = Vec::with_capacity(data.variants.len());

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.fields,
                "event variants cannot carry data",
            ));
        }

        let event = match rename(&variant.attrs)? {
            Some(event) => event,
            None => snake_case(&variant.ident.to_string()),
        };
        if names.contains(&event) {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                format!("duplicate event name `{}`", event),
            ));
        }

        idents.push(&variant.ident);
        names.push(event);
    }

    Ok(quote! {
        impl ::tocsin::Events for #name {
            fn name(&self) -> &'static str {
                match *self {
                    #(Self::#idents => #names,)*
                }
            }

            fn all() -> &'static [Self] {
                &[#(Self::#idents),*]
            }
        }

        impl ::core::convert::From<#name> for ::tocsin::EventName {
            fn from(event: #name) -> Self {
                ::tocsin::EventName::from_static(::tocsin::Events::name(&event))
            }
        }
    })
}

/// Reads `#[event(name = "...")]`.
fn rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut name = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("event")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                meta.input.parse::<Token![=]>()?;
                let lit: LitStr = meta.input.parse()?;
                name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unknown event attribute"))
            }
        })?;
    }

    Ok(name)
}

/// `PaymentFailed` -> `payment_failed`, `HTTPReady` -> `http_ready`.
fn snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(prev) => {
                    prev.is_lowercase()
                        || prev.is_ascii_digit()
                        || (prev.is_uppercase() && next.is_some_and(|n| n.is_lowercase()))
                }
                None => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }

    out
}
