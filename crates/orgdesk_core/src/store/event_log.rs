//! Bounded in-memory domain event log.
//!
//! # Responsibility
//! - Append domain events with a timestamp, dropping the oldest past the cap.
//! - Offer polling views for containers that react to other containers.
//!
//! # Invariants
//! - Stored events always carry `timestamp_ms`.
//! - No delivery guarantee, acknowledgment or persistence.

use crate::clock::Clock;
use crate::model::event::{DomainEvent, EventKind};
use crate::model::workspace::WorkspaceScope;
use crate::store::bounded::{BoundedLog, ZeroLimitPolicy};
use crate::store::cell::{StateCell, SubscriptionId};
use log::trace;
use std::rc::Rc;

pub struct EventLog {
    cell: StateCell<BoundedLog<DomainEvent>>,
    clock: Rc<dyn Clock>,
}

impl EventLog {
    pub fn new(limit: usize, zero_policy: ZeroLimitPolicy, clock: Rc<dyn Clock>) -> Self {
        Self {
            cell: StateCell::new(BoundedLog::new(limit, zero_policy)),
            clock,
        }
    }

    /// Appends `event`, stamping it with the current time when unset.
    pub fn emit(&mut self, mut event: DomainEvent) {
        if event.timestamp_ms.is_none() {
            event.timestamp_ms = Some(self.clock.now_ms());
        }
        trace!(
            "event=bus_emit module=event_log kind={} producer={}",
            event.kind.as_str(),
            event.producer
        );
        self.cell.patch(|log| {
            log.push(event);
        });
    }

    pub fn clear(&mut self) {
        self.cell.patch(BoundedLog::clear);
    }

    /// Snapshot of retained events, oldest first.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.cell.get().to_vec()
    }

    pub fn latest(&self) -> Option<&DomainEvent> {
        self.cell.get().latest()
    }

    pub fn by_kind(&self, kind: EventKind) -> Vec<&DomainEvent> {
        self.cell
            .get()
            .iter()
            .filter(|event| event.kind == kind)
            .collect()
    }

    pub fn by_scope(&self, scope: &WorkspaceScope) -> Vec<&DomainEvent> {
        self.cell
            .get()
            .iter()
            .filter(|event| event.scope.as_ref() == Some(scope))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cell.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.get().is_empty()
    }

    pub fn limit(&self) -> usize {
        self.cell.get().limit()
    }

    pub fn version(&self) -> u64 {
        self.cell.version()
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&BoundedLog<DomainEvent>, u64) + 'static,
    ) -> SubscriptionId {
        self.cell.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.cell.unsubscribe(id)
    }
}
