//! # tocsin - Typed In-Process Event Bus
//!
//! `tocsin` dispatches a small, closed set of named events to listener
//! functions. Listeners are subscribed explicitly, or discovered by scanning
//! annotated methods on instances a listener source resolves.
//!
//! ## Quick Start (explicit subscription)
//!
//! ```rust,ignore
//! use tocsin::Emitter;
//!
//! let emitter = Emitter::<Order>::new(["placed", "shipped"]);
//! emitter.subscribe("placed", |order: Option<&Order>| {
//!     let id = order.map(|o| o.id);
//!     async move { println!("order {id:?} placed") }
//! })?;
//!
//! emitter.emit_with("placed", &Order { id: 1 }).await?;
//! ```
//!
//! ## Discovery
//!
//! ```rust,ignore
//! use tocsin::{listener, Container, Emitter, Strategy};
//!
//! #[derive(Default)]
//! struct Receipts;
//!
//! #[listener]
//! impl Receipts {
//!     #[triggers_on("placed")]
//!     async fn send(&self, order: Option<&Order>) { ... }
//! }
//!
//! let mut container = Container::new();
//! container.register_listener(Receipts);
//!
//! let emitter = Emitter::<Order>::builder(["placed", "shipped"])
//!     .strategy(Strategy::ContainerDiscovery)
//!     .source(&container)
//!     .build()?;
//! ```
//!
//! ## Typed events
//!
//! ```rust,ignore
//! #[derive(Clone, Copy, Debug, Events)]
//! enum Shop {
//!     Placed,
//!     Shipped,
//! }
//!
//! #[listener(events = Shop)]
//! impl Receipts {
//!     #[triggers_on(Placed)] // checked at compile time: `Shop::Placed`
//!     async fn send(&self, order: Option<&Order>) { ... }
//! }
//!
//! let emitter = Emitter::<Order>::from_registry(EventRegistry::of::<Shop>());
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use tocsin_core::{
    // Annotations
    Annotation,
    AnnotationTable,
    Binding,
    // Errors
    BoxError,
    // Listener
    BoxFuture,
    BuildError,
    DynListener,
    EmitError,
    // Events
    EventListener,
    EventName,
    EventRegistry,
    Events,
    IntoOutcome,
    InvokeError,
    // Sources
    LISTENER_CATEGORY,
    Listener,
    ListenerSource,
    ParseStrategyError,
    Payload,
    TocsinError,
    UnregisteredEvent,
};

pub use tocsin_std::{
    BoundMethod, Container, Emitter, EmitterBuilder, Strategy, TracingListener,
    discovery::bind as discover,
};

#[cfg(feature = "inventory")]
pub use tocsin_std::{InventorySource, ListenerRegistration, construct_listener};

#[cfg(feature = "inventory")]
pub use inventory;

#[cfg(feature = "macros")]
pub use tocsin_macros::{Events, listener, triggers_on, triggers_on_class};

/// Testing utilities.
pub mod testing {
    pub use tocsin_std::testing::{CountingListener, FailingListener, RecordingListener};
}

/// Prelude module - common imports for tocsin.
///
/// # Usage
///
/// ```rust,ignore
/// use tocsin::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Container, EmitError, Emitter, EventListener, EventName, EventRegistry, Events,
        LISTENER_CATEGORY, Listener, ListenerSource, Strategy,
    };

    #[cfg(feature = "macros")]
    pub use crate::{listener, triggers_on, triggers_on_class};
}
