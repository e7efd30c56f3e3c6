//! Discovery pass: binds annotated methods of resolved instances.
//!
//! For every instance a [`ListenerSource`] resolves under
//! [`LISTENER_CATEGORY`], each annotation record becomes one or more
//! subscriptions:
//!
//! - `Binding::Method(m)` subscribes `m` under the record's event
//! - `Binding::Class` subscribes every listener method, in declaration order
//!
//! Every subscription goes through [`Emitter::subscribe`], so an undeclared
//! event fails the pass exactly like an explicit subscription would.

use crate::emitter::Emitter;
use std::{fmt, sync::Arc};
use tocsin_core::{
    Binding, BoxError, EventListener, LISTENER_CATEGORY, Listener, ListenerSource, Payload,
    UnregisteredEvent,
};
use tracing::debug;

/// A listener method bound to one instance.
pub struct BoundMethod<P: Payload + ?Sized> {
    instance: Arc<dyn EventListener<P>>,
    method: &'static str,
}

impl<P: Payload + ?Sized> BoundMethod<P> {
    /// Bind `method` of `instance`.
    pub fn new(instance: Arc<dyn EventListener<P>>, method: &'static str) -> Self {
        Self { instance, method }
    }

    /// The bound method's name.
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// The instance the method is bound to.
    pub fn instance(&self) -> &Arc<dyn EventListener<P>> {
        &self.instance
    }
}

impl<P: Payload + ?Sized> Clone for BoundMethod<P> {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance.clone(),
            method: self.method,
        }
    }
}

impl<P: Payload + ?Sized> fmt::Debug for BoundMethod<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("instance", &self.instance.type_name())
            .field("method", &self.method)
            .finish()
    }
}

impl<P: Payload + ?Sized> Listener<P> for BoundMethod<P> {
    async fn on_event(&self, payload: Option<&P>) -> Result<(), BoxError> {
        self.instance.invoke(self.method, payload).await
    }
}

/// Run the discovery pass against `source`.
///
/// A source with nothing registered is not an error. Returns the number of
/// subscriptions made.
pub fn bind<P: Payload + ?Sized>(
    emitter: &Emitter<P>,
    source: &dyn ListenerSource<P>,
) -> Result<usize, UnregisteredEvent> {
    if !source.is_registered(LISTENER_CATEGORY) {
        debug!(category = LISTENER_CATEGORY, "no listener providers registered");
        return Ok(0);
    }

    let mut bound = 0;
    for instance in source.resolve_all(LISTENER_CATEGORY) {
        let annotations = instance.annotations();
        for annotation in &annotations {
            let methods: &[&'static str] = match &annotation.binding {
                Binding::Method(method) => std::slice::from_ref(method),
                Binding::Class => instance.methods(),
            };
            for &method in methods {
                emitter.subscribe(
                    annotation.event.clone(),
                    BoundMethod::new(instance.clone(), method),
                )?;
                debug!(
                    event = %annotation.event,
                    listener = instance.type_name(),
                    method,
                    "bound listener method"
                );
                bound += 1;
            }
        }
    }
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tocsin_core::{AnnotationTable, BoxFuture, InvokeError};

    /// Hand-written equivalent of what `#[listener]` generates.
    #[derive(Default)]
    struct Probe {
        calls: Mutex<Vec<(&'static str, Option<u8>)>>,
        table: AnnotationTable,
    }

    impl Probe {
        fn record(&self, method: &'static str, payload: Option<&u8>) {
            self.calls.lock().unwrap().push((method, payload.copied()));
        }

        fn calls(&self) -> Vec<(&'static str, Option<u8>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl EventListener<u8> for Probe {
        fn annotations(&self) -> AnnotationTable {
            self.table.clone()
        }

        fn methods(&self) -> &'static [&'static str] {
            &["a", "b"]
        }

        fn invoke<'a>(
            &'a self,
            method: &str,
            payload: Option<&'a u8>,
        ) -> BoxFuture<'a, Result<(), BoxError>> {
            let result: Result<(), BoxError> = match method {
                "a" => Ok(self.record("a", payload)),
                "b" => Ok(self.record("b", payload)),
                other => Err(InvokeError::unknown_method("Probe", other).into()),
            };
            Box::pin(async move { result })
        }
    }

    fn probe(configure: impl FnOnce(&mut AnnotationTable)) -> Arc<Probe> {
        let mut table = AnnotationTable::new();
        configure(&mut table);
        Arc::new(Probe {
            table,
            ..Probe::default()
        })
    }

    #[tokio::test]
    async fn bound_method_forwards_to_its_instance() {
        let instance = probe(|_| {});
        let bound = BoundMethod::<u8>::new(instance.clone(), "b");

        Listener::on_event(&bound, Some(&4)).await.unwrap();
        Listener::on_event(&bound.clone(), None).await.unwrap();

        assert_eq!(bound.method(), "b");
        assert_eq!(instance.calls(), [("b", Some(4)), ("b", None)]);
    }

    #[tokio::test]
    async fn method_binding_subscribes_one_method() {
        let instance = probe(|table| {
            table.on_method("a", ["start"]);
        });
        let source: Vec<Arc<dyn EventListener<u8>>> = vec![instance.clone()];
        let emitter = Emitter::<u8>::new(["start", "stop"]);

        assert_eq!(bind(&emitter, &source).unwrap(), 1);
        emitter.emit_with("start", &1).await.unwrap();
        emitter.emit("stop", None).await.unwrap();

        assert_eq!(instance.calls(), [("a", Some(1))]);
    }

    #[tokio::test]
    async fn class_binding_fans_out_in_declaration_order() {
        let instance = probe(|table| {
            table.on_class(["start"]);
        });
        let source: Vec<Arc<dyn EventListener<u8>>> = vec![instance.clone()];
        let emitter = Emitter::<u8>::new(["start"]);

        assert_eq!(bind(&emitter, &source).unwrap(), 2);
        emitter.emit_with("start", &9).await.unwrap();

        assert_eq!(instance.calls(), [("a", Some(9)), ("b", Some(9))]);
    }

    #[test]
    fn undeclared_event_fails_the_pass() {
        let instance = probe(|table| {
            table.on_method("b", ["reload"]);
        });
        let source: Vec<Arc<dyn EventListener<u8>>> = vec![instance];
        let emitter = Emitter::<u8>::new(["start"]);

        let err = bind(&emitter, &source).unwrap_err();
        assert_eq!(err.event, "reload");
    }

    #[tokio::test]
    async fn unknown_method_surfaces_as_listener_failure() {
        let instance = probe(|table| {
            table.on_method("missing", ["start"]);
        });
        let source: Vec<Arc<dyn EventListener<u8>>> = vec![instance];
        let emitter = Emitter::<u8>::new(["start"]);
        bind(&emitter, &source).unwrap();

        let err = emitter.emit("start", None).await.unwrap_err();
        assert_eq!(err.failures(), 1);
    }
}
