//! Payload trait for emitted values.

/// A marker trait for values carried by an emission.
///
/// The emitter never inspects a payload: it forwards a shared reference to
/// every listener of the emission. Payloads must be `Send + Sync + 'static`
/// so listeners can hold them across await points.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as an event payload",
    label = "must be `Send + Sync + 'static`",
    note = "Payloads are shared by reference between concurrently running listeners."
)]
pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static + ?Sized> Payload for T {}
