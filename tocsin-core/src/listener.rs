//! # Listener
//!
//! A listener is the callable an emitter invokes for an event. It receives the
//! emission's payload, if any, and reports success or failure.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|payload: Option<&Order>| async move { ... }`
//! 2. **Struct implementation**: `impl Listener<Order> for AuditTrail`
//! 3. **Discovered method**: a method of a `#[listener]` type, bound to an
//!    instance during the discovery pass.

use crate::{error::BoxError, outcome::IntoOutcome, payload::Payload};
use std::{future::Future, pin::Pin};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A callable invoked when an event is emitted.
///
/// Listeners of one emission run concurrently, so a listener must not assume
/// that siblings subscribed before it have already finished.
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for static dispatch. The emitter stores
/// listeners as [`DynListener`] trait objects.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener` for payloads of type `{P}`",
    label = "missing `Listener` implementation",
    note = "Closures must take `Option<&{P}>` and return `()` or a `Result`."
)]
pub trait Listener<P: Payload + ?Sized>: Send + Sync + 'static {
    /// Called once per emission of an event this listener is subscribed to.
    fn on_event(
        &self,
        payload: Option<&P>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Dynamic object-safe version of [`Listener`].
pub trait DynListener<P: Payload + ?Sized>: Send + Sync + 'static {
    /// Called once per emission (dynamic dispatch version).
    fn on_event_dyn<'a>(&'a self, payload: Option<&'a P>) -> BoxFuture<'a, Result<(), BoxError>>;
}

// Blanket implementation: Any type implementing Listener implements DynListener automatically.
impl<P, L> DynListener<P> for L
where
    P: Payload + ?Sized,
    L: Listener<P>,
{
    fn on_event_dyn<'a>(&'a self, payload: Option<&'a P>) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(self.on_event(payload))
    }
}

// Blanket impl for closures
impl<P, F, Fut> Listener<P> for F
where
    P: Payload + ?Sized,
    F: Fn(Option<&P>) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: IntoOutcome,
{
    async fn on_event(&self, payload: Option<&P>) -> Result<(), BoxError> {
        (self)(payload).await.into_outcome()
    }
}
