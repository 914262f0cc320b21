//! Partner record and lifecycle status.

use crate::model::{Entity, ListScope};
use serde::{Deserialize, Serialize};

pub type PartnerId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    /// Invitation sent, not yet accepted.
    Invited,
    Active,
    /// Access revoked; record kept for history.
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub organization_id: String,
    pub name: String,
    pub status: PartnerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl Partner {
    pub fn new(
        id: impl Into<String>,
        organization_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            organization_id: organization_id.into(),
            name: name.into(),
            status: PartnerStatus::Invited,
            contact_email: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PartnerStatus::Active
    }
}

impl Entity for Partner {
    fn entity_id(&self) -> &str {
        &self.id
    }

    fn in_scope(&self, scope: &ListScope) -> bool {
        match scope {
            ListScope::All => true,
            ListScope::Organization(id) => &self.organization_id == id,
            ListScope::Partner(id) => &self.id == id,
            ListScope::Workspace(_) | ListScope::Team(_) => false,
        }
    }
}
