//! Audit sink implementations.
//!
//! Every state change the elevator makes can be mirrored to an [`AuditSink`].
//! Events are recorded while the building lock is held, so the order of
//! events in a sink is the order in which the changes happened.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::core::car::Direction;
use crate::core::pet::PetView;
use crate::util::clock::now_ms;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum AuditAction {
    /// The actors were launched.
    Started,
    /// A request was accepted onto its origin floor.
    Requested {
        /// The new pet.
        pet: PetView,
    },
    /// A pet moved from the floor queue into the car.
    Boarded {
        /// The boarding pet.
        pet: PetView,
    },
    /// A pet left the car at its destination.
    Delivered {
        /// The delivered pet.
        pet: PetView,
    },
    /// The car left one floor for the next.
    Departed {
        /// Floor left.
        from: usize,
        /// Floor headed to.
        to: usize,
    },
    /// The LOOK sweep reversed.
    Reversed {
        /// New sweep direction.
        direction: Direction,
    },
    /// A cooperative stop was requested.
    StopRequested,
    /// The car drained and went offline.
    Offline,
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Sequence number, unique per sink handle.
    pub seq: u64,
    /// Car floor when the event happened.
    pub floor: usize,
    /// Action taken.
    #[serde(flatten)]
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
///
/// Cloning yields another handle onto the same bounded buffer.
#[derive(Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(1024)))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Retrieve only the actions, in order.
    #[must_use]
    pub fn actions(&self) -> Vec<AuditAction> {
        self.events.lock().iter().map(|e| e.action).collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an audit event from context.
#[must_use]
pub fn build_audit_event(seq: u64, floor: usize, action: AuditAction) -> AuditEvent {
    AuditEvent {
        seq,
        floor,
        action,
        created_at_ms: now_ms(),
    }
}

/// Optional sink plus the sequence counter feeding it.
#[derive(Clone, Default)]
pub(crate) struct Recorder {
    sink: Option<Arc<dyn AuditSink>>,
    seq: Arc<AtomicU64>,
}

impl Recorder {
    pub(crate) fn new(sink: Option<Arc<dyn AuditSink>>) -> Self {
        Self {
            sink,
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn record(&self, floor: usize, action: AuditAction) {
        if let Some(sink) = &self.sink {
            let seq = self.seq.fetch_add(1, Ordering::Relaxed);
            sink.record(build_audit_event(seq, floor, action));
        }
    }
}
