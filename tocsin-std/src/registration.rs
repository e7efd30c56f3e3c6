//! Link-time listener registration.
//!
//! `#[listener(auto)]` submits a [`ListenerRegistration`] for its type.
//! [`InventorySource`] then resolves one fresh instance of every submitted
//! type whose payload matches.

use std::{
    any::{Any, TypeId},
    fmt,
    marker::PhantomData,
    sync::Arc,
};
use tocsin_core::{EventListener, LISTENER_CATEGORY, ListenerSource, Payload};

/// A listener type registered at link time.
pub struct ListenerRegistration {
    /// Type name of the listener.
    pub type_name: &'static str,
    /// `TypeId` of the payload the listener accepts.
    pub payload: fn() -> TypeId,
    /// Builds a boxed `Arc<dyn EventListener<P>>`.
    pub construct: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ListenerRegistration);

/// Construct `L` with `Default` and erase it for a [`ListenerRegistration`].
pub fn construct_listener<L, P>() -> Box<dyn Any + Send + Sync>
where
    L: EventListener<P> + Default,
    P: Payload + ?Sized,
{
    let instance: Arc<dyn EventListener<P>> = Arc::new(L::default());
    Box::new(instance)
}

/// Resolves every `#[listener(auto)]` type registered for payload `P`.
pub struct InventorySource<P: ?Sized> {
    _payload: PhantomData<fn() -> Box<P>>,
}

impl<P: Payload + ?Sized> InventorySource<P> {
    /// Create a source over the link-time registrations.
    pub fn new() -> Self {
        Self {
            _payload: PhantomData,
        }
    }

    fn registrations() -> impl Iterator<Item = &'static ListenerRegistration> {
        inventory::iter::<ListenerRegistration>
            .into_iter()
            .filter(|registration| (registration.payload)() == TypeId::of::<P>())
    }
}

impl<P: Payload + ?Sized> Default for InventorySource<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> fmt::Debug for InventorySource<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventorySource").finish()
    }
}

impl<P: Payload + ?Sized> ListenerSource<P> for InventorySource<P> {
    fn is_registered(&self, category: &str) -> bool {
        category == LISTENER_CATEGORY && Self::registrations().next().is_some()
    }

    fn resolve_all(&self, category: &str) -> Vec<Arc<dyn EventListener<P>>> {
        if category != LISTENER_CATEGORY {
            return Vec::new();
        }
        Self::registrations()
            .filter_map(|registration| {
                let instance = (registration.construct)();
                match instance.downcast::<Arc<dyn EventListener<P>>>() {
                    Ok(instance) => Some(*instance),
                    Err(_) => {
                        tracing::warn!(
                            listener = registration.type_name,
                            "registration built a listener for another payload"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}
