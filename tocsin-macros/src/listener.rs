//! Listener-related macros.
//!
//! This module contains:
//! - `#[listener]` - Attribute macro implementing `EventListener` for an impl block
//! - `#[triggers_on]` / `#[triggers_on_class]` - the annotations it reads

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::{
    Attribute, Expr, FnArg, GenericArgument, Ident, ImplItem, ItemImpl, Path, PathArguments,
    ReturnType, Token, Type,
    parse::{Parse, ParseStream},
    parse_macro_input, parse_quote,
    punctuated::Punctuated,
};

pub(crate) const TRIGGERS_ON: &str = "triggers_on";
pub(crate) const TRIGGERS_ON_CLASS: &str = "triggers_on_class";
const LISTENER: &str = "listener";

/// Arguments for the `#[listener]` macro.
pub(crate) struct ListenerArgs {
    /// Event enum that bare identifiers in annotations resolve against.
    pub events: Option<Path>,
    /// Explicit payload type.
    pub payload: Option<Type>,
    /// Submit a link-time registration for the type.
    pub auto: bool,
}

impl Parse for ListenerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ListenerArgs {
            events: None,
            payload: None,
            auto: false,
        };

        while !input.is_empty() {
            let ident: Ident = input.parse()?;

            match ident.to_string().as_str() {
                "events" => {
                    input.parse::<Token![=]>()?;
                    args.events = Some(input.parse()?);
                }
                "payload" => {
                    input.parse::<Token![=]>()?;
                    args.payload = Some(input.parse()?);
                }
                "auto" => args.auto = true,
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

/// A method of the impl block that can be bound as a listener.
struct ListenerMethod {
    ident: Ident,
    is_async: bool,
    takes_payload: bool,
    /// The return value only signals completion and is dropped.
    ignores_output: bool,
    events: Vec<Expr>,
}

fn is_attr(attr: &Attribute, name: &str) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == name)
}

/// Removes every `#[name(..)]` attribute and returns their events, deduplicated.
fn take_annotations(attrs: &mut Vec<Attribute>, name: &str) -> syn::Result<Vec<Expr>> {
    let mut events: Vec<Expr> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    let mut kept = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        if !is_attr(&attr, name) {
            kept.push(attr);
            continue;
        }
        let args = attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
        if args.is_empty() {
            return Err(syn::Error::new_spanned(
                &attr,
                format!("`#[{}]` needs at least one event", name),
            ));
        }
        for expr in args {
            let key = expr.to_token_stream().to_string();
            if !seen.contains(&key) {
                seen.push(key);
                events.push(expr);
            }
        }
    }

    *attrs = kept;
    Ok(events)
}

/// Turns an annotation argument into an `EventName` expression.
///
/// With `events = Path`, a bare identifier `X` means `Path::X`.
fn event_name(expr: &Expr, events: Option<&Path>) -> TokenStream2 {
    if let (Some(events), Expr::Path(path)) = (events, expr) {
        if let Some(variant) = path.path.get_ident() {
            if path.qself.is_none() && path.attrs.is_empty() {
                return quote! { ::tocsin::EventName::from(#events::#variant) };
            }
        }
    }
    quote! { ::tocsin::EventName::from(#expr) }
}

/// Extracts `T` from `Option<&T>`.
fn payload_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(Type::Reference(reference)) if reference.mutability.is_none() => {
            Some(&reference.elem)
        }
        _ => None,
    }
}

/// Returns `true` for `()` and `Result` return types, which report an outcome.
///
/// Any other value is ignored by the emitter.
fn returns_outcome(output: &ReturnType) -> bool {
    match output {
        ReturnType::Default => true,
        ReturnType::Type(_, ty) => match &**ty {
            Type::Tuple(tuple) => tuple.elems.is_empty(),
            Type::Path(path) => path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "Result"),
            _ => false,
        },
    }
}

/// Implements `EventListener` for an inherent impl block.
///
/// The impl block keeps every item; `#[triggers_on]` and `#[triggers_on_class]`
/// attributes are consumed.
///
/// # Usage
///
/// ```rust,ignore
/// #[listener]
/// #[triggers_on_class("audit")]
/// impl Auditor {
///     fn new() -> Self { Auditor }            // no receiver: never bound
///
///     #[triggers_on("start", "stop")]
///     async fn record(&self, payload: Option<&Order>) -> Result<(), AuditError> { ... }
///
///     fn flush(&self) { ... }
/// }
///
/// // Typed events: `Start` resolves to `Lifecycle::Start`
/// #[listener(events = Lifecycle)]
/// impl Starter {
///     #[triggers_on(Start)]
///     async fn on_start(&self) { ... }
/// }
/// ```
pub fn listener_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ListenerArgs);
    let mut input = parse_macro_input!(item as ItemImpl);

    match expand_listener(&args, &mut input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => {
            let err = err.to_compile_error();
            TokenStream::from(quote! { #input #err })
        }
    }
}

fn expand_listener(args: &ListenerArgs, input: &mut ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "`#[listener]` must be placed on an inherent impl block",
        ));
    }

    let class_events = take_annotations(&mut input.attrs, TRIGGERS_ON_CLASS)?;
    let has_class = !class_events.is_empty();

    let mut methods: Vec<ListenerMethod> = Vec::new();
    let mut inferred_payload: Option<Type> = None;

    for item in &mut input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        let events = take_annotations(&mut method.attrs, TRIGGERS_ON)?;
        let sig = &method.sig;

        // Without a class annotation, unannotated methods are plain helpers.
        if events.is_empty() && !has_class {
            continue;
        }

        // Associated functions (constructors) are never listeners.
        let Some(receiver) = sig.receiver() else {
            if !events.is_empty() {
                return Err(syn::Error::new_spanned(
                    &sig.ident,
                    "an annotated method must take `&self`",
                ));
            }
            continue;
        };

        let typed: Vec<&Type> = sig
            .inputs
            .iter()
            .filter_map(|arg| match arg {
                FnArg::Typed(pat_type) => Some(&*pat_type.ty),
                FnArg::Receiver(_) => None,
            })
            .collect();

        let shared_receiver = receiver.reference.is_some() && receiver.mutability.is_none();
        let bindable = shared_receiver && typed.len() <= 1 && sig.generics.params.is_empty();
        if !bindable {
            if !events.is_empty() || has_class {
                return Err(syn::Error::new_spanned(
                    sig,
                    "listener methods must take `&self` and at most one `Option<&T>` payload argument",
                ));
            }
            continue;
        }

        if let Some(ty) = typed.first() {
            let Some(payload) = payload_type(ty) else {
                return Err(syn::Error::new_spanned(
                    ty,
                    "the payload argument of a listener method must be `Option<&T>`",
                ));
            };
            if inferred_payload.is_none() {
                inferred_payload = Some(payload.clone());
            }
        }

        methods.push(ListenerMethod {
            ident: sig.ident.clone(),
            is_async: sig.asyncness.is_some(),
            takes_payload: !typed.is_empty(),
            ignores_output: !returns_outcome(&sig.output),
            events,
        });
    }

    let events_path = args.events.as_ref();
    let payload = args.payload.clone().or(inferred_payload);

    // Payload-agnostic listeners are implemented for every payload type.
    let mut generics = input.generics.clone();
    let payload_ty: Type = match &payload {
        Some(ty) => ty.clone(),
        None => {
            generics
                .params
                .push(parse_quote!(__P: ::tocsin::Payload + ?Sized));
            parse_quote!(__P)
        }
    };
    let (impl_generics, _, where_clause) = generics.split_for_impl();
    let self_ty = &input.self_ty;

    let class_entries = class_events.iter().map(|e| event_name(e, events_path));
    let class_table = if has_class {
        quote! { table.on_class([#(#class_entries),*]); }
    } else {
        TokenStream2::new()
    };

    let method_tables = methods.iter().filter(|m| !m.events.is_empty()).map(|m| {
        let name = m.ident.to_string();
        let entries = m.events.iter().map(|e| event_name(e, events_path));
        quote! { table.on_method(#name, [#(#entries),*]); }
    });

    let names: Vec<String> = methods.iter().map(|m| m.ident.to_string()).collect();

    let arms = methods.iter().map(|m| {
        let ident = &m.ident;
        let name = ident.to_string();
        let call = if m.takes_payload {
            quote! { Self::#ident(self, payload) }
        } else {
            quote! { Self::#ident(self) }
        };
        let call = if m.is_async {
            quote! { #call.await }
        } else {
            call
        };
        let outcome = if m.ignores_output {
            quote! {
                let _ = #call;
                ::core::result::Result::Ok(())
            }
        } else {
            quote! { ::tocsin::IntoOutcome::into_outcome(#call) }
        };
        quote! {
            #name => ::std::boxed::Box::pin(async move { #outcome }),
        }
    });

    let registration = if args.auto {
        registration(input, payload.as_ref())?
    } else {
        TokenStream2::new()
    };

    Ok(quote! {
        #input

        impl #impl_generics ::tocsin::EventListener<#payload_ty> for #self_ty #where_clause {
            fn annotations(&self) -> ::tocsin::AnnotationTable {
                #[allow(unused_mut)]
                let mut table = ::tocsin::AnnotationTable::new();
                #class_table
                #(#method_tables)*
                table
            }

            fn methods(&self) -> &'static [&'static str] {
                &[#(#names),*]
            }

            #[allow(unused_variables)]
            fn invoke<'a>(
                &'a self,
                method: &str,
                payload: ::core::option::Option<&'a #payload_ty>,
            ) -> ::tocsin::BoxFuture<'a, ::core::result::Result<(), ::tocsin::BoxError>> {
                match method {
                    #(#arms)*
                    other => {
                        let error = ::tocsin::InvokeError::unknown_method(
                            ::core::any::type_name::<Self>(),
                            other,
                        );
                        ::std::boxed::Box::pin(async move {
                            ::core::result::Result::Err(::tocsin::BoxError::from(error))
                        })
                    }
                }
            }
        }

        #registration
    })
}

/// Link-time registration for `#[listener(auto)]`.
fn registration(input: &ItemImpl, payload: Option<&Type>) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "`#[listener(auto)]` does not support generic impl blocks",
        ));
    }
    let Some(payload) = payload else {
        return Err(syn::Error::new_spanned(
            &input.self_ty,
            "`#[listener(auto)]` needs a concrete payload; add `payload = T`",
        ));
    };
    let self_ty = &input.self_ty;
    let type_name = self_ty.to_token_stream().to_string();

    Ok(quote! {
        ::tocsin::inventory::submit! {
            ::tocsin::ListenerRegistration {
                type_name: #type_name,
                payload: ::core::any::TypeId::of::<#payload>,
                construct: ::tocsin::construct_listener::<#self_ty, #payload>,
            }
        }
    })
}

/// `#[triggers_on_class]` written above `#[listener]`.
///
/// The annotation is moved below `#[listener]` so that the listener macro
/// reads it. Anywhere else it is an error.
pub fn triggers_on_class_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = TokenStream2::from(attr);
    let mut input = parse_macro_input!(item as ItemImpl);

    if !input.attrs.iter().any(|attr| is_attr(attr, LISTENER)) {
        let err = syn::Error::new_spanned(
            &input.self_ty,
            "`#[triggers_on_class]` must be used together with `#[listener]`",
        )
        .to_compile_error();
        return TokenStream::from(quote! { #input #err });
    }

    input.attrs.push(parse_quote!(#[triggers_on_class(#args)]));
    TokenStream::from(input.into_token_stream())
}

/// `#[triggers_on]` outside a `#[listener]` impl block.
pub fn triggers_on_impl(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = TokenStream2::from(item);
    let err = syn::Error::new_spanned(
        &item,
        "`#[triggers_on]` only works on methods of an impl block marked `#[listener]`",
    )
    .to_compile_error();
    TokenStream::from(quote! { #item #err })
}
