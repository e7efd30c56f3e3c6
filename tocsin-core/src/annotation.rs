//! # Annotations
//!
//! Declarative records saying which events a listener type responds to.
//!
//! An annotation never creates a live subscription by itself. The table is
//! produced from the type definition alone (normally by the `#[listener]`
//! macro) and is read by the discovery pass of any number of emitters.
//!
//! Two shapes exist, kept apart by [`Binding`]:
//!
//! - `Binding::Method(name)` - this one method handles the event
//! - `Binding::Class` - every listener method of the type handles the event

use crate::{
    error::BoxError,
    event::EventName,
    listener::BoxFuture,
    payload::Payload,
};

/// What an annotation binds its event to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// A single method, by name.
    Method(&'static str),
    /// Every listener method of the type.
    Class,
}

/// One `(event, binding)` record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    /// The event the binding responds to.
    pub event: EventName,
    /// The method or methods that respond.
    pub binding: Binding,
}

/// The ordered annotation records of one listener type.
///
/// Recording the same `(event, binding)` pair twice stores it once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationTable {
    entries: Vec<Annotation>,
}

impl AnnotationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an annotation. Returns `false` if it was already present.
    pub fn push(&mut self, annotation: Annotation) -> bool {
        if self.entries.contains(&annotation) {
            return false;
        }
        self.entries.push(annotation);
        true
    }

    /// Record that `method` handles each of `events`.
    pub fn on_method<I, N>(&mut self, method: &'static str, events: I) -> &mut Self
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        for event in events {
            self.push(Annotation {
                event: event.into(),
                binding: Binding::Method(method),
            });
        }
        self
    }

    /// Record that every listener method handles each of `events`.
    pub fn on_class<I, N>(&mut self, events: I) -> &mut Self
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        for event in events {
            self.push(Annotation {
                event: event.into(),
                binding: Binding::Class,
            });
        }
        self
    }

    /// Iterate over the records in the order they were added.
    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.entries.iter()
    }

    /// Records for a single event.
    pub fn for_event<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.entries.iter().filter(move |entry| entry.event == event)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the type carries no annotations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AnnotationTable {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A listener-provider: an instance whose annotated methods can be bound as
/// listeners.
///
/// Implemented by the `#[listener]` macro on an inherent `impl` block. The
/// instance is owned by whatever resolved it; the emitter only keeps shared
/// handles to it.
///
/// # Example
///
/// ```rust,ignore
/// #[listener]
/// #[triggers_on_class("audit")]
/// impl AuditTrail {
///     fn new() -> Self { ... }            // no receiver: never bound
///
///     #[triggers_on("start", "stop")]
///     async fn record(&self, payload: Option<&Order>) { ... }
///
///     fn flush(&self) { ... }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `EventListener` for payloads of type `{P}`",
    label = "missing `EventListener` implementation",
    note = "Add `#[listener]` to an inherent `impl` block of `{Self}`."
)]
pub trait EventListener<P: Payload + ?Sized>: Send + Sync + 'static {
    /// The annotation records of this type.
    fn annotations(&self) -> AnnotationTable;

    /// Every listener method, in declaration order.
    ///
    /// Associated functions without a receiver are not listed.
    fn methods(&self) -> &'static [&'static str];

    /// Call a listener method by name.
    ///
    /// Fails with [`InvokeError::UnknownMethod`] for a name that is not in
    /// [`methods`](EventListener::methods).
    ///
    /// [`InvokeError::UnknownMethod`]: crate::InvokeError::UnknownMethod
    fn invoke<'a>(
        &'a self,
        method: &str,
        payload: Option<&'a P>,
    ) -> BoxFuture<'a, Result<(), BoxError>>;

    /// Type name used in logs and errors.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
