//! Team record, referenced from its organization by id.

use crate::model::{Entity, ListScope};
use serde::{Deserialize, Serialize};

pub type TeamId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub organization_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<String>,
}

impl Team {
    pub fn new(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            name: name.into(),
            description: None,
            member_ids: Vec::new(),
        }
    }
}

impl Entity for Team {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn in_scope(&self, scope: &ListScope) -> bool {
        match scope {
            ListScope::All => true,
            ListScope::Organization(id) => &self.organization_id == id,
            ListScope::Team(id) => &self.id == id,
            ListScope::Workspace(_) | ListScope::Partner(_) => false,
        }
    }
}
