//! Error types for tocsin.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`TocsinError`] - Top-level error type for all tocsin operations
//! - [`UnregisteredEvent`] - An event name outside the declared set
//! - [`EmitError`] - Errors during an emission
//! - [`BuildError`] - Errors while building an emitter
//! - [`InvokeError`] - Errors calling a listener method by name

use crate::event::EventName;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all tocsin operations.
#[derive(Error, Debug)]
pub enum TocsinError {
    /// An event name was not part of the declared set.
    #[error(transparent)]
    Unregistered(#[from] UnregisteredEvent),

    /// An emission failed.
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),

    /// The emitter could not be built.
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// A listener method could not be invoked.
    #[error("invoke error: {0}")]
    Invoke(#[from] InvokeError),

    /// A discovery strategy could not be parsed.
    #[error(transparent)]
    Strategy(#[from] ParseStrategyError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Raised by `subscribe` and `emit` when the event is not in the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("event `{event}` is not registered")]
pub struct UnregisteredEvent {
    /// The rejected event name.
    pub event: EventName,
}

impl UnregisteredEvent {
    /// Create a new error for the given event name.
    pub fn new(event: impl Into<EventName>) -> Self {
        Self {
            event: event.into(),
        }
    }
}

/// Errors that can occur during an emission.
#[derive(Error, Debug)]
pub enum EmitError {
    /// The emitted event is not registered.
    #[error(transparent)]
    Unregistered(#[from] UnregisteredEvent),

    /// At least one listener failed.
    ///
    /// `source` is the failure of the first failing listener in subscription
    /// order. Every other listener of the emission still ran to completion.
    #[error("listener #{index} for event `{event}` failed ({failures} of {listeners} listeners failed)")]
    ListenerFailed {
        /// The emitted event.
        event: EventName,
        /// Position of the reported listener in the subscriber list.
        index: usize,
        /// Number of listeners that failed in this emission.
        failures: usize,
        /// Number of listeners that took part in this emission.
        listeners: usize,
        /// The reported failure.
        #[source]
        source: BoxError,
    },
}

impl EmitError {
    /// Returns `true` if the emission was rejected before any listener ran.
    pub fn is_unregistered(&self) -> bool {
        matches!(self, EmitError::Unregistered(_))
    }

    /// Number of listeners that failed (zero for rejected emissions).
    pub fn failures(&self) -> usize {
        match self {
            EmitError::Unregistered(_) => 0,
            EmitError::ListenerFailed { failures, .. } => *failures,
        }
    }
}

/// Errors that can occur while building an emitter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Container discovery was requested without a listener source.
    #[error("container discovery requires a listener source")]
    MissingSource,

    /// A listener source was supplied but discovery is disabled.
    #[error("a listener source was supplied but the discovery strategy is `none`")]
    UnexpectedSource,

    /// A discovered listener referenced an undeclared event.
    #[error("discovery failed: {0}")]
    Discovery(#[from] UnregisteredEvent),
}

/// Errors raised when calling a listener method by name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// The listener type defines no listener method with that name.
    #[error("`{listener}` has no listener method named `{method}`")]
    UnknownMethod {
        /// Type name of the listener.
        listener: &'static str,
        /// The requested method.
        method: String,
    },
}

impl InvokeError {
    /// Create an [`InvokeError::UnknownMethod`].
    pub fn unknown_method(listener: &'static str, method: impl Into<String>) -> Self {
        InvokeError::UnknownMethod {
            listener,
            method: method.into(),
        }
    }
}

/// The given string does not name a discovery strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown discovery strategy `{0}`")]
pub struct ParseStrategyError(pub String);

impl From<BoxError> for TocsinError {
    fn from(err: BoxError) -> Self {
        TocsinError::Custom(err)
    }
}
