//! The emitter: a closed set of events and their subscriber lists.

use crate::config::EmitterBuilder;
use futures::future::join_all;
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};
use tocsin_core::{
    BuildError, DynListener, EmitError, EventName, EventRegistry, Listener, ListenerSource,
    Payload, UnregisteredEvent,
};
use tracing::{debug, trace, warn};

type Subscribers<P> = Vec<Arc<dyn DynListener<P>>>;

/// A typed, in-process event emitter.
///
/// The subscriber table holds exactly one list per declared event for the
/// emitter's whole lifetime. Lists only grow: there is no unsubscribe.
///
/// # Example
///
/// ```rust,ignore
/// let emitter = Emitter::<Order>::new(["placed", "shipped"]);
///
/// emitter.subscribe("placed", |order: Option<&Order>| {
///     let id = order.map(|o| o.id);
///     async move { println!("placed {id:?}") }
/// })?;
///
/// emitter.emit_with("placed", &Order { id: 1 }).await?;
/// ```
pub struct Emitter<P: Payload + ?Sized = ()> {
    registry: EventRegistry,
    subscribers: RwLock<HashMap<EventName, Subscribers<P>>>,
}

impl<P: Payload + ?Sized> Emitter<P> {
    /// Create an emitter without a discovery pass.
    pub fn new<I, N>(events: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        Self::from_registry(EventRegistry::new(events))
    }

    /// Create an emitter and bind every listener `source` provides.
    pub fn with_source<I, N>(events: I, source: &dyn ListenerSource<P>) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        Self::builder(events)
            .strategy(crate::config::Strategy::ContainerDiscovery)
            .source(source)
            .build()
    }

    /// Start configuring an emitter.
    pub fn builder<'s, I, N>(events: I) -> EmitterBuilder<'s, P>
    where
        I: IntoIterator<Item = N>,
        N: Into<EventName>,
    {
        EmitterBuilder::new(EventRegistry::new(events))
    }

    /// Create an emitter from an existing registry.
    ///
    /// The subscriber table is seeded with one empty list per event.
    pub fn from_registry(registry: EventRegistry) -> Self {
        let subscribers = registry
            .iter()
            .map(|event| (event.clone(), Vec::new()))
            .collect();
        debug!(events = registry.len(), "emitter created");
        Self {
            registry,
            subscribers: RwLock::new(subscribers),
        }
    }

    /// Append `listener` to the subscriber list of `event`.
    ///
    /// Subscribing the same listener twice runs it twice per emission.
    pub fn subscribe<L>(&self, event: impl Into<EventName>, listener: L) -> Result<(), UnregisteredEvent>
    where
        L: Listener<P>,
    {
        self.subscribe_dyn(event, Arc::new(listener))
    }

    /// Append an already shared listener to the subscriber list of `event`.
    pub fn subscribe_dyn(
        &self,
        event: impl Into<EventName>,
        listener: Arc<dyn DynListener<P>>,
    ) -> Result<(), UnregisteredEvent> {
        let event = event.into();
        self.registry.check(&event)?;

        let mut table = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
        let list = table.entry(event.clone()).or_default();
        list.push(listener);
        debug!(event = %event, listeners = list.len(), "listener subscribed");
        Ok(())
    }

    /// Emit `event`, running every subscribed listener with `payload`.
    ///
    /// All listeners start in subscription order on the calling task and run
    /// concurrently; the call returns once every one of them has settled.
    /// Listeners subscribed after the emission started are not part of it.
    ///
    /// If any listener fails, the others still run to completion and the
    /// first failure in subscription order is returned.
    pub async fn emit(&self, event: impl Into<EventName>, payload: Option<&P>) -> Result<(), EmitError> {
        let event = event.into();
        self.registry.check(&event)?;

        let listeners = self.snapshot(&event);
        let total = listeners.len();
        trace!(event = %event, listeners = total, "emitting event");

        let results = join_all(listeners.iter().map(|listener| listener.on_event_dyn(payload))).await;

        let mut failures = results
            .into_iter()
            .enumerate()
            .filter_map(|(index, result)| result.err().map(|source| (index, source)));

        let Some((index, source)) = failures.next() else {
            trace!(event = %event, listeners = total, "event settled");
            return Ok(());
        };
        let failed = 1 + failures.count();
        warn!(event = %event, failed, listeners = total, error = %source, "listeners failed");

        Err(EmitError::ListenerFailed {
            event,
            index,
            failures: failed,
            listeners: total,
            source,
        })
    }

    /// Emit `event` with a payload.
    pub async fn emit_with(&self, event: impl Into<EventName>, payload: &P) -> Result<(), EmitError> {
        self.emit(event, Some(payload)).await
    }

    /// Emit `event` without a payload.
    pub async fn emit_empty(&self, event: impl Into<EventName>) -> Result<(), EmitError> {
        self.emit(event, None).await
    }

    /// The declared events.
    pub fn events(&self) -> &EventRegistry {
        &self.registry
    }

    /// Returns `true` if `event` is one of the declared events.
    pub fn is_registered(&self, event: &str) -> bool {
        self.registry.contains(event)
    }

    /// Number of listeners currently subscribed to `event`.
    ///
    /// Undeclared events have no listeners.
    pub fn listener_count(&self, event: &str) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event)
            .map_or(0, Vec::len)
    }

    fn snapshot(&self, event: &EventName) -> Subscribers<P> {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event.as_str())
            .cloned()
            .unwrap_or_default()
    }
}

impl<P: Payload + ?Sized> fmt::Debug for Emitter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.subscribers.read().unwrap_or_else(PoisonError::into_inner);
        let mut map = f.debug_map();
        for event in &self.registry {
            map.entry(&event.as_str(), &table.get(event.as_str()).map_or(0, Vec::len));
        }
        map.finish()
    }
}
