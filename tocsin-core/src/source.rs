//! Listener sources consumed by the discovery pass.

use crate::{annotation::EventListener, payload::Payload};
use std::sync::Arc;

/// Category under which listener-provider instances are registered.
pub const LISTENER_CATEGORY: &str = "EventListener";

/// Anything that can hand out listener-provider instances.
///
/// The discovery pass only reads from a source; it never registers anything
/// into it. A dependency container, a service locator or a plain list can all
/// play this role.
pub trait ListenerSource<P: Payload + ?Sized> {
    /// Returns `true` if at least one instance is registered under `category`.
    fn is_registered(&self, category: &str) -> bool;

    /// Resolve every instance registered under `category`.
    fn resolve_all(&self, category: &str) -> Vec<Arc<dyn EventListener<P>>>;
}

/// An explicit list of instances, all under [`LISTENER_CATEGORY`].
impl<P: Payload + ?Sized> ListenerSource<P> for Vec<Arc<dyn EventListener<P>>> {
    fn is_registered(&self, category: &str) -> bool {
        category == LISTENER_CATEGORY && !self.is_empty()
    }

    fn resolve_all(&self, category: &str) -> Vec<Arc<dyn EventListener<P>>> {
        if category == LISTENER_CATEGORY {
            self.clone()
        } else {
            Vec::new()
        }
    }
}

impl<P, S> ListenerSource<P> for &S
where
    P: Payload + ?Sized,
    S: ListenerSource<P> + ?Sized,
{
    fn is_registered(&self, category: &str) -> bool {
        (**self).is_registered(category)
    }

    fn resolve_all(&self, category: &str) -> Vec<Arc<dyn EventListener<P>>> {
        (**self).resolve_all(category)
    }
}

impl<P, S> ListenerSource<P> for Arc<S>
where
    P: Payload + ?Sized,
    S: ListenerSource<P> + ?Sized,
{
    fn is_registered(&self, category: &str) -> bool {
        (**self).is_registered(category)
    }

    fn resolve_all(&self, category: &str) -> Vec<Arc<dyn EventListener<P>>> {
        (**self).resolve_all(category)
    }
}
