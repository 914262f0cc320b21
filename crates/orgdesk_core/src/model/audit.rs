//! Audit and journal log entries.
//!
//! Both collections are append-only from this crate's perspective and are
//! owned by the remote document store.

use crate::model::{new_entity_id, Entity, ListScope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One recorded administrative action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub workspace_id: String,
    pub actor_id: String,
    /// Dotted action name, e.g. `team.created`.
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    pub timestamp_ms: i64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl AuditEntry {
    pub fn new(
        workspace_id: impl Into<String>,
        actor_id: impl Into<String>,
        action: impl Into<String>,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            id: new_entity_id(),
            workspace_id: workspace_id.into(),
            actor_id: actor_id.into(),
            action: action.into(),
            target_id: None,
            timestamp_ms,
            metadata: BTreeMap::new(),
        }
    }
}

/// Free-form journal note written by a workspace member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub workspace_id: String,
    pub author_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub timestamp_ms: i64,
}

/// Caller input for a journal append.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewJournalEntry {
    pub title: String,
    pub body: Option<String>,
    pub tags: Vec<String>,
}

impl JournalEntry {
    /// Builds an entry with normalized (trimmed, lowercase, deduplicated) tags.
    pub fn create(
        workspace_id: impl Into<String>,
        author_id: impl Into<String>,
        input: NewJournalEntry,
        timestamp_ms: i64,
    ) -> Self {
        let mut tags: Vec<String> = Vec::new();
        for tag in input.tags {
            let normalized = tag.trim().to_ascii_lowercase();
            if !normalized.is_empty() && !tags.contains(&normalized) {
                tags.push(normalized);
            }
        }
        Self {
            id: new_entity_id(),
            workspace_id: workspace_id.into(),
            author_id: author_id.into(),
            title: input.title,
            body: input.body,
            tags,
            timestamp_ms,
        }
    }
}

impl Entity for AuditEntry {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn in_scope(&self, scope: &ListScope) -> bool {
        match scope {
            ListScope::All => true,
            ListScope::Workspace(id) => &self.workspace_id == id,
            ListScope::Organization(_) | ListScope::Team(_) | ListScope::Partner(_) => false,
        }
    }
}

impl Entity for JournalEntry {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn in_scope(&self, scope: &ListScope) -> bool {
        match scope {
            ListScope::All => true,
            ListScope::Workspace(id) => &self.workspace_id == id,
            ListScope::Organization(_) | ListScope::Team(_) | ListScope::Partner(_) => false,
        }
    }
}
