//! Project record persisted in the remote `projects` collection.
//!
//! # Invariants
//! - `description` presence/absence survives create and update unchanged.
//! - Archiving is a flag flip; archived projects are never hard-deleted here.

use crate::model::{new_entity_id, Entity, ListScope};
use serde::{Deserialize, Serialize};

pub type ProjectId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub workspace_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
    /// Unix epoch milliseconds of the last local write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at_ms: Option<i64>,
}

/// Caller input for creating a project in the active workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
}

impl Project {
    /// Builds a fresh project with a generated id.
    pub fn create(workspace_id: impl Into<String>, input: NewProject) -> Self {
        Self {
            id: new_entity_id(),
            workspace_id: workspace_id.into(),
            name: input.name,
            description: input.description,
            archived: false,
            updated_at_ms: None,
        }
    }
}

impl Entity for Project {
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
