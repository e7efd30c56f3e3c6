//! Testing utilities for tocsin.
//!
//! This module provides listeners that make it easy to observe what an
//! emitter did.
//!
//! # Features
//!
//! - [`RecordingListener`]: records a copy of every payload it receives
//! - [`CountingListener`]: counts invocations for any payload type
//! - [`FailingListener`]: always fails, after counting the invocation

use std::{
    fmt,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};
use tocsin_core::{BoxError, Listener, Payload};

// ============================================================================
// Recording Listener
// ============================================================================

/// A listener that records every payload it receives.
///
/// Clones share the same record, so keep one clone for assertions and
/// subscribe the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingListener::<Order>::new();
/// emitter.subscribe("placed", recorder.clone())?;
///
/// emitter.emit_with("placed", &order).await?;
/// assert_eq!(recorder.payloads(), [Some(order)]);
/// ```
pub struct RecordingListener<T> {
    payloads: Arc<Mutex<Vec<Option<T>>>>,
}

impl<T: Clone> RecordingListener<T> {
    /// Create a new recording listener.
    pub fn new() -> Self {
        Self {
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded payloads, in arrival order.
    pub fn payloads(&self) -> Vec<Option<T>> {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the number of invocations.
    pub fn count(&self) -> usize {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Clear the record.
    pub fn clear(&self) {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<T: Clone> Default for RecordingListener<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RecordingListener<T> {
    fn clone(&self) -> Self {
        Self {
            payloads: self.payloads.clone(),
        }
    }
}

impl<T> fmt::Debug for RecordingListener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingListener").finish_non_exhaustive()
    }
}

impl<T: Payload + Clone> Listener<T> for RecordingListener<T> {
    async fn on_event(&self, payload: Option<&T>) -> Result<(), BoxError> {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.cloned());
        Ok(())
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// A listener that counts invocations, whatever the payload.
#[derive(Debug, Clone, Default)]
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Create a new counting listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<P: Payload + ?Sized> Listener<P> for CountingListener {
    async fn on_event(&self, _payload: Option<&P>) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Failing Listener
// ============================================================================

/// A listener that always fails with a fixed message.
#[derive(Debug, Clone)]
pub struct FailingListener {
    message: Arc<str>,
    calls: Arc<AtomicUsize>,
}

impl FailingListener {
    /// Create a listener failing with `message`.
    pub fn new(message: impl Into<Arc<str>>) -> Self {
        Self {
            message: message.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of invocations.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: Payload + ?Sized> Listener<P> for FailingListener {
    async fn on_event(&self, _payload: Option<&P>) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.message.to_string().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_listener_shares_its_record() {
        let recorder = RecordingListener::<String>::new();
        let subscribed = recorder.clone();

        subscribed.on_event(Some(&"a".to_string())).await.unwrap();
        subscribed.on_event(None).await.unwrap();

        assert_eq!(recorder.payloads(), [Some("a".to_string()), None]);
        recorder.clear();
        assert_eq!(recorder.count(), 0);
    }

    #[tokio::test]
    async fn failing_listener_counts_then_fails() {
        let failing = FailingListener::new("nope");
        let err = Listener::<()>::on_event(&failing, None).await.unwrap_err();

        assert_eq!(err.to_string(), "nope");
        assert_eq!(failing.calls(), 1);
    }
}
