//! Domain entities shared by every state container.
//!
//! # Responsibility
//! - Define plain, serializable records for tenancy, directory and log data.
//! - Express cross-entity relationships through identifier references only.
//!
//! # Invariants
//! - Every entity carries an identifier unique within its collection.
//! - No entity owns another; `organization_id`/`workspace_id` are references.
//! - Optional fields are omitted on serialization and round-trip unchanged.

pub mod account;
pub mod audit;
pub mod event;
pub mod module;
pub mod notification;
pub mod organization;
pub mod partner;
pub mod project;
pub mod team;
pub mod theme;
pub mod workspace;

use uuid::Uuid;

/// Identifier-bearing record stored in a keyed collection.
pub trait Entity {
    /// Identifier unique within the entity's collection.
    fn entity_id(&self) -> &str;

    /// Whether this record belongs to the given list scope.
    ///
    /// Used by service implementations that filter in memory.
    fn in_scope(&self, scope: &ListScope) -> bool;
}

/// Filter passed to list operations of remote collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Every record visible to the caller.
    All,
    /// Records attached to one workspace.
    Workspace(String),
    /// Records attached to one organization.
    Organization(String),
    /// One team, or records attached to it.
    Team(String),
    /// One partner, or records attached to it.
    Partner(String),
}

/// Generates a fresh collection identifier.
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}

/// Replaces the entity with the same id, returning whether one matched.
pub(crate) fn replace_by_id<T: Entity>(items: &mut [T], next: T) -> bool {
    match items
        .iter_mut()
        .find(|item| item.entity_id() == next.entity_id())
    {
        Some(slot) => {
            *slot = next;
            true
        }
        None => false,
    }
}

/// Inserts or replaces by id, keeping insertion order for new entries.
pub(crate) fn upsert_by_id<T: Entity>(items: &mut Vec<T>, next: T) {
    if let Some(slot) = items
        .iter_mut()
        .find(|item| item.entity_id() == next.entity_id())
    {
        *slot = next;
    } else {
        items.push(next);
    }
}
