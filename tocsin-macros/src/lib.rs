//! Procedural macros for tocsin.
//!
//! This crate provides:
//! - `#[derive(Events)]` - Derive the `Events` trait for a unit enum
//! - `#[listener]` - Implement `EventListener` for an annotated impl block
//! - `#[triggers_on]` - Bind a method to one or more events
//! - `#[triggers_on_class]` - Bind every method of the type to one or more events

use proc_macro::TokenStream;

mod events;
mod listener;

/// Derive macro for implementing the `Events` trait.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Debug, Events)]
/// enum Shop {
///     Placed,                     // "placed"
///     #[event(name = "shipped")]
///     HandedToCarrier,            // "shipped"
/// }
/// ```
#[proc_macro_derive(Events, attributes(event))]
pub fn derive_events(input: TokenStream) -> TokenStream {
    events::derive_events_impl(input)
}

/// Implements `EventListener` for an impl block.
///
/// Methods annotated with `#[triggers_on]` are listener methods. With
/// `#[triggers_on_class]`, every method taking `&self` is one. Other methods
/// are left alone.
///
/// A listener method takes `&self` and at most one `Option<&T>` argument. It
/// may be sync or async. A `Result` return value reports failure; any other
/// return value is ignored.
///
/// # Arguments
///
/// - `events = Enum`: bare identifiers in annotations name variants of `Enum`
/// - `payload = Type`: payload type, when no method takes one
/// - `auto`: register the type for link-time discovery (needs `Default`)
///
/// # Example
///
/// ```rust,ignore
/// #[listener]
/// impl Receipts {
///     #[triggers_on("placed")]
///     async fn send(&self, order: Option<&Order>) -> Result<(), MailError> { ... }
/// }
/// ```
#[proc_macro_attribute]
pub fn listener(attr: TokenStream, item: TokenStream) -> TokenStream {
    listener::listener_impl(attr, item)
}

/// Binds a method of a `#[listener]` impl block to events.
///
/// Only valid inside a `#[listener]` impl block, which consumes it.
#[proc_macro_attribute]
pub fn triggers_on(attr: TokenStream, item: TokenStream) -> TokenStream {
    listener::triggers_on_impl(attr, item)
}

/// Binds every listener method of a `#[listener]` impl block to events.
///
/// May be written above or below `#[listener]`.
#[proc_macro_attribute]
pub fn triggers_on_class(attr: TokenStream, item: TokenStream) -> TokenStream {
    listener::triggers_on_class_impl(attr, item)
}
