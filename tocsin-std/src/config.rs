//! Emitter configuration.
//!
//! An emitter is configured with three options:
//!
//! - the declared events (required)
//! - a discovery [`Strategy`] (defaults to [`Strategy::None`])
//! - a [`ListenerSource`], required exactly when the strategy is
//!   [`Strategy::ContainerDiscovery`]

use crate::{discovery, emitter::Emitter};
use std::{fmt, str::FromStr};
use tocsin_core::{BuildError, EventRegistry, ListenerSource, ParseStrategyError, Payload};

/// How an emitter finds listeners at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// No discovery pass. Listeners are subscribed explicitly.
    #[default]
    None,
    /// Bind the annotated methods of every instance a listener source
    /// resolves.
    ContainerDiscovery,
}

impl Strategy {
    /// The canonical name of this strategy.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Strategy::None => "none",
            Strategy::ContainerDiscovery => "container",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Strategy::None),
            "container" | "container-discovery" | "container_discovery" | "tsyringe" => {
                Ok(Strategy::ContainerDiscovery)
            }
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Builder for constructing an [`Emitter`].
///
/// # Example
///
/// ```rust,ignore
/// let mut container = Container::new();
/// container.register_listener(AuditTrail::default());
///
/// let emitter = Emitter::<Order>::builder(["placed", "shipped"])
///     .strategy(Strategy::ContainerDiscovery)
///     .source(&container)
///     .build()?;
/// ```
pub struct EmitterBuilder<'s, P: Payload + ?Sized> {
    registry: EventRegistry,
    strategy: Strategy,
    source: Option<&'s dyn ListenerSource<P>>,
}

impl<'s, P: Payload + ?Sized> EmitterBuilder<'s, P> {
    /// Create a builder for the given events.
    pub fn new(registry: EventRegistry) -> Self {
        Self {
            registry,
            strategy: Strategy::None,
            source: None,
        }
    }

    /// Set the discovery strategy.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the listener source read by the discovery pass.
    pub fn source(mut self, source: &'s dyn ListenerSource<P>) -> Self {
        self.source = Some(source);
        self
    }

    /// Build the emitter, running the discovery pass if configured.
    ///
    /// Fails with [`BuildError::MissingSource`] or
    /// [`BuildError::UnexpectedSource`] when strategy and source disagree,
    /// and with [`BuildError::Discovery`] when a discovered listener names
    /// an undeclared event.
    pub fn build(self) -> Result<Emitter<P>, BuildError> {
        let source = match (self.strategy, self.source) {
            (Strategy::None, None) => None,
            (Strategy::None, Some(_)) => return Err(BuildError::UnexpectedSource),
            (Strategy::ContainerDiscovery, None) => return Err(BuildError::MissingSource),
            (Strategy::ContainerDiscovery, Some(source)) => Some(source),
        };

        let emitter = Emitter::from_registry(self.registry);
        if let Some(source) = source {
            discovery::bind(&emitter, source)?;
        }
        Ok(emitter)
    }
}

impl<P: Payload + ?Sized> fmt::Debug for EmitterBuilder<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterBuilder")
            .field("registry", &self.registry)
            .field("strategy", &self.strategy)
            .field("source", &self.source.is_some())
            .finish()
    }
}
