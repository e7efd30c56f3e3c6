#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tocsin::{BoxError, listener};

// ============================================================================
// Test Payload
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: u32,
}

impl Order {
    pub fn new(id: u32) -> Self {
        Order { id }
    }
}

// ============================================================================
// Journal
// ============================================================================

/// Shared record of `(method, payload)` calls, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<(&'static str, Option<Order>)>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, method: &'static str, payload: Option<&Order>) {
        self.entries.lock().unwrap().push((method, payload.cloned()));
    }

    pub fn entries(&self) -> Vec<(&'static str, Option<Order>)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn calls(&self, method: &str) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| *name == method)
            .count()
    }

    pub fn payloads(&self, method: &str) -> Vec<Option<Order>> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| *name == method)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

// ============================================================================
// Annotated Listeners
// ============================================================================

/// One method bound to `start`.
#[derive(Clone, Debug, Default)]
pub struct StartListener {
    pub journal: Journal,
}

#[listener]
impl StartListener {
    #[triggers_on("start")]
    pub async fn on_start(&self, order: Option<&Order>) {
        self.journal.record("on_start", order);
    }
}

/// Every method bound to both `start` and `stop`.
#[derive(Clone, Debug, Default)]
pub struct Lifecycle {
    pub journal: Journal,
}

#[listener]
#[triggers_on_class("start", "stop")]
impl Lifecycle {
    pub fn new(journal: Journal) -> Self {
        Lifecycle { journal }
    }

    pub fn a(&self, order: Option<&Order>) {
        self.journal.record("a", order);
    }

    pub async fn b(&self, order: Option<&Order>) -> Result<(), BoxError> {
        self.journal.record("b", order);
        Ok(())
    }
}

/// One method bound to `start`, another to `stop` and `start`.
#[derive(Clone, Debug, Default)]
pub struct Shipping {
    pub journal: Journal,
}

#[listener]
impl Shipping {
    #[triggers_on("stop")]
    pub async fn test(&self, order: Option<&Order>) {
        self.journal.record("shipping.test", order);
    }

    #[triggers_on("start")]
    pub fn test2(&self, order: Option<&Order>) {
        self.journal.record("shipping.test2", order);
    }
}

/// Annotated for an event no test emitter declares.
#[derive(Clone, Debug, Default)]
pub struct Stray;

#[listener(payload = Order)]
impl Stray {
    #[triggers_on("refund")]
    pub fn refund(&self) {}
}

/// Every method bound to `start`, with `a` also bound to it by name.
#[derive(Clone, Debug, Default)]
pub struct DoubleBound {
    pub journal: Journal,
}

#[listener]
#[triggers_on_class("start")]
impl DoubleBound {
    #[triggers_on("start")]
    pub fn a(&self, order: Option<&Order>) {
        self.journal.record("double.a", order);
    }

    pub fn b(&self, order: Option<&Order>) {
        self.journal.record("double.b", order);
    }
}

/// Listener methods returning plain values, next to helpers that are not listeners.
#[derive(Clone, Debug, Default)]
pub struct Echo {
    pub journal: Journal,
}

#[listener]
impl Echo {
    #[triggers_on("start")]
    pub fn echo(&self, order: Option<&Order>) -> Option<Order> {
        self.journal.record("echo", order);
        order.cloned()
    }

    #[triggers_on("stop")]
    pub async fn total(&self) -> usize {
        self.journal.record("echo.total", None);
        self.journal.entries().len()
    }

    pub fn scale(&self, factor: u32) -> u32 {
        factor * 2
    }

    pub fn seen(&self) -> usize {
        self.journal.calls("echo")
    }
}
