//! Span instrumentation for listeners.

use tocsin_core::{BoxError, Listener, Payload};
use tracing::Instrument;

/// A listener wrapper that runs the inner listener inside a `tracing` span.
///
/// # Example
///
/// ```rust,ignore
/// emitter.subscribe("placed", TracingListener::new(send_receipt, "send_receipt"))?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TracingListener<L> {
    inner: L,
    name: &'static str,
}

impl<L> TracingListener<L> {
    /// Wrap `inner`, naming the span after `name`.
    pub const fn new(inner: L, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The wrapped listener.
    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<P, L> Listener<P> for TracingListener<L>
where
    P: Payload + ?Sized,
    L: Listener<P>,
{
    async fn on_event(&self, payload: Option<&P>) -> Result<(), BoxError> {
        let span = tracing::info_span!("listener", name = %self.name, payload = payload.is_some());
        let result = self.inner.on_event(payload).instrument(span.clone()).await;
        if let Err(error) = &result {
            span.in_scope(|| tracing::debug!(%error, "listener failed"));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingListener, FailingListener};

    #[tokio::test]
    async fn wrapper_is_transparent() {
        let counter = CountingListener::new();
        let traced = TracingListener::new(counter.clone(), "counter");

        Listener::<()>::on_event(&traced, None).await.unwrap();
        assert_eq!(counter.count(), 1);
        assert_eq!(traced.inner().count(), 1);
    }

    #[tokio::test]
    async fn failures_pass_through() {
        let traced = TracingListener::new(FailingListener::new("broken"), "failing");
        let err = Listener::<u8>::on_event(&traced, Some(&1)).await.unwrap_err();
        assert_eq!(err.to_string(), "broken");
    }
}
