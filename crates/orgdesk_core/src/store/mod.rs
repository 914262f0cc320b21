//! State containers and the reactive primitives they are built from.
//!
//! # Responsibility
//! - Provide the versioned cell, memo, bounded log and loader primitives.
//! - Host one container per domain; mutators are the only write path.
//!
//! # Invariants
//! - Container records are private; callers read through `state()` and views.
//! - `clear()` on any container commits its `Default` record.

pub mod audit;
pub mod bounded;
pub mod cell;
pub mod event_log;
pub mod journal;
pub mod loader;
pub mod module_registry;
pub mod notification;
pub mod organization;
pub mod partner;
pub mod project;
pub mod session;
pub mod sidebar;
pub mod team;
pub mod theme;
pub mod workspace;

/// Result of a write that needs actor/workspace context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T> {
    /// Persisted and committed locally.
    Saved(T),
    /// Required context was missing; nothing happened.
    Skipped,
    /// Remote call failed; carries the message stored in the container.
    Failed(String),
}

impl<T> WriteOutcome<T> {
    pub fn saved(self) -> Option<T> {
        match self {
            Self::Saved(value) => Some(value),
            Self::Skipped | Self::Failed(_) => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Actor and workspace a write is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext<'a> {
    pub workspace_id: &'a str,
    pub actor_id: &'a str,
}
