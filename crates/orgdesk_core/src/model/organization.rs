//! Organization directory record.

use crate::model::{Entity, ListScope};
use serde::{Deserialize, Serialize};

pub type OrganizationId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Archived organizations stay listed but are excluded from active views.
    #[serde(default)]
    pub archived: bool,
}

impl Organization {
    pub fn new(id: impl Into<String>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            archived: false,
        }
    }
}

impl Entity for Organization {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn in_scope(&self, scope: &ListScope) -> bool {
        match scope {
            ListScope::All => true,
            ListScope::Organization(id) => &self.id == id,
            ListScope::Workspace(_) | ListScope::Team(_) | ListScope::Partner(_) => false,
        }
    }
}
