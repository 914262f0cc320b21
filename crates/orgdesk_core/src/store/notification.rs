//! Bounded in-app notification tray.
//!
//! # Invariants
//! - At most `limit` notifications are kept; the oldest are evicted first.
//! - Marking read never reorders entries.

use crate::model::notification::{Notification, NotificationLevel};
use crate::store::bounded::{BoundedLog, ZeroLimitPolicy};
use crate::store::cell::{Memo, StateCell};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationState {
    pub items: BoundedLog<Notification>,
}

impl NotificationState {
    pub fn new(limit: usize, zero_policy: ZeroLimitPolicy) -> Self {
        Self {
            items: BoundedLog::new(limit, zero_policy),
        }
    }
}

#[derive(Debug)]
pub struct NotificationStore {
    cell: StateCell<NotificationState>,
    unread: Memo<usize>,
}

impl NotificationStore {
    pub fn new(limit: usize, zero_policy: ZeroLimitPolicy) -> Self {
        Self {
            cell: StateCell::new(NotificationState::new(limit, zero_policy)),
            unread: Memo::default(),
        }
    }

    pub fn state(&self) -> &NotificationState {
        self.cell.get()
    }

    /// Adds a notification, returning its id.
    pub fn push(&mut self, notification: Notification) -> String {
        let id = notification.id.clone();
        self.cell.patch(|state| {
            state.items.push(notification);
        });
        id
    }

    pub fn mark_read(&mut self, notification_id: &str) -> bool {
        if !self.state().items.iter().any(|n| n.id == notification_id) {
            return false;
        }
        self.cell.patch(|state| {
            for notification in state.items.iter_mut() {
                if notification.id == notification_id {
                    notification.read = true;
                }
            }
        });
        true
    }

    /// Marks every notification read; returns how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let changed = self.unread_count();
        if changed == 0 {
            return 0;
        }
        self.cell.patch(|state| {
            for notification in state.items.iter_mut() {
                notification.read = true;
            }
        });
        changed
    }

    pub fn dismiss(&mut self, notification_id: &str) -> bool {
        if !self.state().items.iter().any(|n| n.id == notification_id) {
            return false;
        }
        self.cell
            .patch(|state| state.items.retain(|n| n.id != notification_id));
        true
    }

    pub fn clear(&mut self) {
        let items = &self.state().items;
        let initial = NotificationState::new(items.limit(), items.zero_policy());
        self.cell.set(initial);
    }

    pub fn unread_count(&self) -> usize {
        self.unread.get(self.cell.version(), || {
            self.state().items.iter().filter(|n| !n.read).count()
        })
    }

    pub fn has_unread(&self) -> bool {
        self.unread_count() > 0
    }

    /// Unread notifications, newest first.
    pub fn unread(&self) -> Vec<&Notification> {
        self.state().items.iter().rev().filter(|n| !n.read).collect()
    }

    pub fn by_level(&self, level: NotificationLevel) -> Vec<&Notification> {
        self.state()
            .items
            .iter()
            .filter(|n| n.level == level)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().items.is_empty()
    }
}
