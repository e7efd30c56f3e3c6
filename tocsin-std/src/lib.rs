//! # tocsin-std
//!
//! Standard implementations for the tocsin event bus.
//!
//! This crate provides:
//! - **Emitter**: [`Emitter`], the closed-set event dispatcher
//! - **Configuration**: [`EmitterBuilder`], [`Strategy`]
//! - **Discovery**: [`discovery::bind`], [`BoundMethod`]
//! - **Listener sources**: [`Container`], and `InventorySource` behind the
//!   `inventory` feature
//! - **Instrumentation**: [`TracingListener`]
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use tocsin_core;

// Modules
pub mod config;
pub mod container;
pub mod discovery;
pub mod emitter;
pub mod instrument;
#[cfg(feature = "inventory")]
pub mod registration;
pub mod testing;

pub use config::{EmitterBuilder, Strategy};
pub use container::Container;
pub use discovery::BoundMethod;
pub use emitter::Emitter;
pub use instrument::TracingListener;
#[cfg(feature = "inventory")]
pub use registration::{InventorySource, ListenerRegistration, construct_listener};

#[cfg(feature = "inventory")]
pub use inventory;
