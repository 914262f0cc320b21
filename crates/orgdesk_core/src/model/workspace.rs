//! Workspace and tenancy scope model.
//!
//! # Invariants
//! - A workspace belongs to exactly one scope variant.
//! - The scope carries the owning identifier; no untyped owner fields exist.

use crate::model::{Entity, ListScope};
use serde::{Deserialize, Serialize};

pub type WorkspaceId = String;

/// Tenancy dimension a workspace belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "owner_id", rename_all = "snake_case")]
pub enum WorkspaceScope {
    /// Personal workspace of one account.
    User(String),
    Organization(String),
    Team(String),
    Partner(String),
}

/// Payload-free discriminant of [`WorkspaceScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceScopeKind {
    User,
    Organization,
    Team,
    Partner,
}

impl WorkspaceScope {
    pub fn kind(&self) -> WorkspaceScopeKind {
        match self {
            Self::User(_) => WorkspaceScopeKind::User,
            Self::Organization(_) => WorkspaceScopeKind::Organization,
            Self::Team(_) => WorkspaceScopeKind::Team,
            Self::Partner(_) => WorkspaceScopeKind::Partner,
        }
    }

    /// Identifier of the account/organization/team/partner owning the scope.
    pub fn owner_id(&self) -> &str {
        match self {
            Self::User(id) | Self::Organization(id) | Self::Team(id) | Self::Partner(id) => {
                id.as_str()
            }
        }
    }
}

impl WorkspaceScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organization => "organization",
            Self::Team => "team",
            Self::Partner => "partner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub scope: WorkspaceScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Workspace {
    pub fn new(id: impl Into<String>, name: impl Into<String>, scope: WorkspaceScope) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scope,
            description: None,
        }
    }
}

impl Entity for Workspace {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn in_scope(&self, scope: &ListScope) -> bool {
        match scope {
            ListScope::All => true,
            ListScope::Workspace(id) => &self.id == id,
            ListScope::Organization(id) => {
                matches!(&self.scope, WorkspaceScope::Organization(owner) if owner == id)
            }
            ListScope::Team(id) => {
                matches!(&self.scope, WorkspaceScope::Team(owner) if owner == id)
            }
            ListScope::Partner(id) => {
                matches!(&self.scope, WorkspaceScope::Partner(owner) if owner == id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Workspace, WorkspaceScope, WorkspaceScopeKind};

    #[test]
    fn scope_serializes_as_tagged_union() {
        let workspace = Workspace::new("w1", "Acme", WorkspaceScope::Organization("o1".into()));
        let json = serde_json::to_value(&workspace).expect("workspace should serialize");
        assert_eq!(json["scope"]["kind"], "organization");
        assert_eq!(json["scope"]["owner_id"], "o1");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn scope_kind_and_owner_match_variant() {
        let scope = WorkspaceScope::Partner("p9".into());
        assert_eq!(scope.kind(), WorkspaceScopeKind::Partner);
        assert_eq!(scope.owner_id(), "p9");
        assert_eq!(scope.kind().as_str(), "partner");
    }
}
