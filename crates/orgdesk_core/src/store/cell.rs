//! Versioned state cell with explicit observers and version-keyed memos.
//!
//! # Responsibility
//! - Hold one domain record and commit replacements in a single step.
//! - Notify subscribed observers synchronously after each commit.
//!
//! # Invariants
//! - `version` increases by exactly one per commit.
//! - Observers only ever see fully computed records.
//! - `reset` commits `S::default()`, the documented initial record.

use std::cell::RefCell;
use std::fmt::{Debug, Formatter};

/// Handle returned by [`StateCell::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<S> = Box<dyn FnMut(&S, u64)>;

pub struct StateCell<S> {
    state: S,
    version: u64,
    observers: Vec<(SubscriptionId, Observer<S>)>,
    next_subscription: u64,
}

impl<S: Default> Default for StateCell<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Debug> Debug for StateCell<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("state", &self.state)
            .field("version", &self.version)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<S> StateCell<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            version: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn get(&self) -> &S {
        &self.state
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces the record wholesale.
    pub fn set(&mut self, next: S) {
        self.state = next;
        self.commit();
    }

    /// Computes the next record from the current one and commits it.
    pub fn update(&mut self, next: impl FnOnce(&S) -> S) {
        let computed = next(&self.state);
        self.set(computed);
    }

    /// Registers an observer called with `(record, version)` after each commit.
    pub fn subscribe(&mut self, observer: impl FnMut(&S, u64) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer; returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        before != self.observers.len()
    }

    /// Edits the record in place, then commits once.
    pub fn patch(&mut self, edit: impl FnOnce(&mut S)) {
        edit(&mut self.state);
        self.commit();
    }

    fn commit(&mut self) {
        self.version += 1;
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.state, self.version);
        }
    }
}

impl<S: Default> StateCell<S> {
    pub fn reset(&mut self) {
        self.set(S::default());
    }
}

/// Pull-based cache for one derived view, keyed on the source cell version.
#[derive(Debug)]
pub struct Memo<T> {
    slot: RefCell<Option<(u64, T)>>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }
}

impl<T: Clone> Memo<T> {
    /// Returns the cached value for `version`, recomputing on a version change.
    pub fn get(&self, version: u64, compute: impl FnOnce() -> T) -> T {
        if let Some((cached_version, value)) = self.slot.borrow().as_ref() {
            if *cached_version == version {
                return value.clone();
            }
        }
        let value = compute();
        *self.slot.borrow_mut() = Some((version, value.clone()));
        value
    }

    pub fn invalidate(&self) {
        *self.slot.borrow_mut() = None;
    }
}
