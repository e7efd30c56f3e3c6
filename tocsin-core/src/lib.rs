//! # tocsin-core
//!
//! Core types and traits for the tocsin event bus.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! listener crates that don't need the emitter from `tocsin-std`.
//!
//! # Building Blocks
//!
//! ## Event names ([`EventName`], [`EventRegistry`], [`Events`])
//!
//! An emitter accepts a closed set of event names declared up front. Every
//! subscription and emission is checked against that set first.
//!
//! ## Listeners ([`Listener`], [`DynListener`])
//!
//! The callables run when an event is emitted. They receive the payload by
//! reference and report success or failure through [`IntoOutcome`].
//!
//! ## Annotations ([`AnnotationTable`], [`Binding`], [`EventListener`])
//!
//! Per-type records saying "this method handles event E" or "every method
//! handles event E". The discovery pass turns them into live listeners.
//!
//! ## Sources ([`ListenerSource`])
//!
//! The narrow interface the discovery pass uses to obtain listener-provider
//! instances.
//!
//! # Error Types
//!
//! - [`TocsinError`] - Top-level error type
//! - [`UnregisteredEvent`] - Undeclared event names
//! - [`EmitError`] - Emission failures
//! - [`BuildError`] - Emitter configuration failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod annotation;
mod error;
mod event;
mod listener;
mod outcome;
mod payload;
mod source;

// Re-exports
pub use annotation::{Annotation, AnnotationTable, Binding, EventListener};
pub use error::{
    BoxError, BuildError, EmitError, InvokeError, ParseStrategyError, TocsinError,
    UnregisteredEvent,
};
pub use event::{EventName, EventRegistry, Events};
pub use listener::{BoxFuture, DynListener, Listener};
pub use outcome::IntoOutcome;
pub use payload::Payload;
pub use source::{LISTENER_CATEGORY, ListenerSource};
