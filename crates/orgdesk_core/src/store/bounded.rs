//! Retention-limited append-only sequence.
//!
//! # Invariants
//! - Entries keep insertion order; eviction removes the oldest first.
//! - With a positive limit N, at most N entries are retained after append.
//! - A limit of zero follows the configured [`ZeroLimitPolicy`].

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Interpretation of a retention limit of zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroLimitPolicy {
    /// Zero disables truncation entirely (the shipped UI behavior).
    #[default]
    Unbounded,
    /// Zero keeps nothing; every append is dropped immediately.
    RetainNothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    limit: usize,
    zero_policy: ZeroLimitPolicy,
}

impl<T> BoundedLog<T> {
    pub fn new(limit: usize, zero_policy: ZeroLimitPolicy) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
            zero_policy,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn zero_policy(&self) -> ZeroLimitPolicy {
        self.zero_policy
    }

    /// Appends one entry and returns how many entries were evicted.
    pub fn push(&mut self, entry: T) -> usize {
        self.entries.push_back(entry);
        self.truncate()
    }

    /// Appends many entries in order, truncating once at the end.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = T>) -> usize {
        self.entries.extend(entries);
        self.truncate()
    }

    /// Changes the limit and applies it immediately.
    pub fn set_limit(&mut self, limit: usize) -> usize {
        self.limit = limit;
        self.truncate()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> + ExactSizeIterator {
        self.entries.iter_mut()
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.entries.retain(keep);
    }

    fn effective_cap(&self) -> Option<usize> {
        match (self.limit, self.zero_policy) {
            (0, ZeroLimitPolicy::Unbounded) => None,
            (0, ZeroLimitPolicy::RetainNothing) => Some(0),
            (limit, _) => Some(limit),
        }
    }

    fn truncate(&mut self) -> usize {
        let Some(cap) = self.effective_cap() else {
            return 0;
        };
        let overflow = self.entries.len().saturating_sub(cap);
        self.entries.drain(..overflow);
        overflow
    }
}

impl<T: Clone> BoundedLog<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}
