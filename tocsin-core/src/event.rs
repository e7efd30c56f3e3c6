//! Event names and the closed registry an emitter accepts.

use crate::error::UnregisteredEvent;
use std::{
    borrow::{Borrow, Cow},
    fmt,
};

/// An opaque event identifier.
///
/// Equality is exact string equality. There is no hierarchy, wildcard or
/// namespacing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventName(Cow<'static, str>);

impl EventName {
    /// Create an event name from a static string without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for EventName {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&EventName> for EventName {
    fn from(name: &EventName) -> Self {
        name.clone()
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EventName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for EventName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EventName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// A closed, typed set of event names.
///
/// Usually implemented with `#[derive(Events)]` on a unit-only enum, which
/// also provides the `From<Self> for EventName` conversion.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Debug, Events)]
/// enum Lifecycle {
///     Start,
///     #[event(name = "shutdown")]
///     Stop,
/// }
///
/// let registry = EventRegistry::of::<Lifecycle>();
/// assert!(registry.contains("start"));
/// assert!(registry.contains("shutdown"));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a set of events",
    label = "missing `Events` implementation",
    note = "Derive it with `#[derive(Events)]` on a unit-only enum."
)]
pub trait Events: Copy + Send + Sync + 'static + Into<EventName> {
    /// The event name of this variant.
    fn name(&self) -> &'static str;

    /// Every variant, in declaration order.
    fn all() -> &'static [Self];
}

/// The fixed set of event names an emitter accepts.
///
/// Built once from the declared events and never mutated afterwards.
/// Duplicate names are collapsed, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRegistry {
    names: Vec<EventName>,
}

impl EventRegistry {
    /// Create a registry from an ordered sequence of event names.
    pub fn new<I, N>(events: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        let mut names: Vec<EventName> = Vec::new();
        for name in events.into_iter().map(Into::into) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self { names }
    }

    /// Create a registry holding every variant of a typed event set.
    pub fn of<E: Events>() -> Self {
        Self::new(E::all().iter().copied())
    }

    /// Returns `true` if `name` was declared.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|declared| declared == name)
    }

    /// Gate used before every subscription and emission.
    pub fn check(&self, name: &EventName) -> Result<(), UnregisteredEvent> {
        if self.contains(name.as_str()) {
            Ok(())
        } else {
            Err(UnregisteredEvent::new(name))
        }
    }

    /// Iterate over the declared names in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, EventName> {
        self.names.iter()
    }

    /// Number of distinct declared events.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no events were declared.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<N: Into<EventName>> FromIterator<N> for EventRegistry {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a EventRegistry {
    type Item = &'a EventName;
    type IntoIter = std::slice::Iter<'a, EventName>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
