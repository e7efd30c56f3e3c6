//! A small instance container usable as a [`ListenerSource`].

use std::{collections::HashMap, fmt, sync::Arc};
use tocsin_core::{EventListener, LISTENER_CATEGORY, ListenerSource, Payload};

type Factory<P> = Box<dyn Fn() -> Arc<dyn EventListener<P>> + Send + Sync>;

enum Registration<P: Payload + ?Sized> {
    Instance(Arc<dyn EventListener<P>>),
    Factory(Factory<P>),
}

impl<P: Payload + ?Sized> Registration<P> {
    fn resolve(&self) -> Arc<dyn EventListener<P>> {
        match self {
            Registration::Instance(instance) => instance.clone(),
            Registration::Factory(factory) => factory(),
        }
    }
}

/// Instances and factories registered under string categories.
///
/// Registration order is kept within a category, and `resolve_all` returns
/// instances in that order.
///
/// # Example
///
/// ```rust,ignore
/// let mut container = Container::<Order>::new();
/// container
///     .register_listener(AuditTrail::default())
///     .register_with(LISTENER_CATEGORY, || Arc::new(Mailer::new()));
///
/// let emitter = Emitter::with_source(["placed"], &container)?;
/// ```
pub struct Container<P: Payload + ?Sized> {
    registrations: HashMap<String, Vec<Registration<P>>>,
}

impl<P: Payload + ?Sized> Default for Container<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload + ?Sized> Container<P> {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
        }
    }

    /// Register a shared instance under `category`.
    pub fn register(
        &mut self,
        category: impl Into<String>,
        instance: Arc<dyn EventListener<P>>,
    ) -> &mut Self {
        self.push(category.into(), Registration::Instance(instance))
    }

    /// Register an instance under [`LISTENER_CATEGORY`].
    pub fn register_listener<L: EventListener<P>>(&mut self, instance: L) -> &mut Self {
        self.register(LISTENER_CATEGORY, Arc::new(instance))
    }

    /// Register a factory under `category`.
    ///
    /// The factory runs on every resolution, so each emitter built from this
    /// container binds a fresh instance.
    pub fn register_with<F>(&mut self, category: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Arc<dyn EventListener<P>> + Send + Sync + 'static,
    {
        self.push(category.into(), Registration::Factory(Box::new(factory)))
    }

    /// Number of registrations under `category`.
    pub fn len(&self, category: &str) -> usize {
        self.registrations.get(category).map_or(0, Vec::len)
    }

    /// Drop every registration.
    pub fn reset(&mut self) {
        self.registrations.clear();
    }

    fn push(&mut self, category: String, registration: Registration<P>) -> &mut Self {
        self.registrations
            .entry(category)
            .or_default()
            .push(registration);
        self
    }
}

impl<P: Payload + ?Sized> ListenerSource<P> for Container<P> {
    fn is_registered(&self, category: &str) -> bool {
        self.len(category) > 0
    }

    fn resolve_all(&self, category: &str) -> Vec<Arc<dyn EventListener<P>>> {
        self.registrations
            .get(category)
            .map(|registrations| registrations.iter().map(Registration::resolve).collect())
            .unwrap_or_default()
    }
}

impl<P: Payload + ?Sized> fmt::Debug for Container<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (category, registrations) in &self.registrations {
            map.entry(category, &registrations.len());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tocsin_core::{AnnotationTable, BoxError, BoxFuture};

    struct Quiet;

    impl EventListener<()> for Quiet {
        fn annotations(&self) -> AnnotationTable {
            AnnotationTable::new()
        }

        fn methods(&self) -> &'static [&'static str] {
            &[]
        }

        fn invoke<'a>(&'a self, _: &str, _: Option<&'a ()>) -> BoxFuture<'a, Result<(), BoxError>> {
            Box::pin(async { Ok(()) })
        }
    }

    #[test]
    fn empty_container_reports_nothing_registered() {
        let container = Container::<()>::new();
        assert!(!container.is_registered(LISTENER_CATEGORY));
        assert!(container.resolve_all(LISTENER_CATEGORY).is_empty());
    }

    #[test]
    fn categories_are_kept_apart() {
        let mut container = Container::<()>::new();
        container
            .register_listener(Quiet)
            .register("Other", Arc::new(Quiet));

        assert_eq!(container.len(LISTENER_CATEGORY), 1);
        assert_eq!(container.resolve_all("Other").len(), 1);

        container.reset();
        assert!(!container.is_registered("Other"));
    }

    #[test]
    fn factories_run_on_every_resolution() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = built.clone();
        let mut container = Container::<()>::new();
        container.register_with(LISTENER_CATEGORY, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(Quiet) as Arc<dyn EventListener<()>>
        });

        container.resolve_all(LISTENER_CATEGORY);
        container.resolve_all(LISTENER_CATEGORY);
        assert_eq!(built.load(Ordering::SeqCst), 2);
    }
}
