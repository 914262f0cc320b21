//! Cross-container domain events.
//!
//! # Invariants
//! - `kind` is a closed set; its wire name is stable (`workspace.switched`).
//! - `timestamp_ms` is always set once an event is stored in the log.

use crate::model::workspace::WorkspaceScope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "session.started")]
    SessionStarted,
    #[serde(rename = "session.ended")]
    SessionEnded,
    #[serde(rename = "workspace.switched")]
    WorkspaceSwitched,
    #[serde(rename = "project.created")]
    ProjectCreated,
    #[serde(rename = "project.updated")]
    ProjectUpdated,
    #[serde(rename = "project.archived")]
    ProjectArchived,
    #[serde(rename = "audit.recorded")]
    AuditRecorded,
    #[serde(rename = "journal.appended")]
    JournalAppended,
    #[serde(rename = "module.toggled")]
    ModuleToggled,
    #[serde(rename = "theme.changed")]
    ThemeChanged,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SessionStarted => "session.started",
            Self::SessionEnded => "session.ended",
            Self::WorkspaceSwitched => "workspace.switched",
            Self::ProjectCreated => "project.created",
            Self::ProjectUpdated => "project.updated",
            Self::ProjectArchived => "project.archived",
            Self::AuditRecorded => "audit.recorded",
            Self::JournalAppended => "journal.appended",
            Self::ModuleToggled => "module.toggled",
            Self::ThemeChanged => "theme.changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub payload: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<WorkspaceScope>,
    /// Unix epoch milliseconds; filled by the log when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
    /// Name of the container or flow that produced the event.
    pub producer: String,
}

impl DomainEvent {
    pub fn new(kind: EventKind, producer: impl Into<String>) -> Self {
        Self {
            kind,
            payload: BTreeMap::new(),
            scope: None,
            timestamp_ms: None,
            producer: producer.into(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn scoped(mut self, scope: WorkspaceScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn at(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{DomainEvent, EventKind};

    #[test]
    fn serializes_kind_under_type_field() {
        let event = DomainEvent::new(EventKind::WorkspaceSwitched, "workspace")
            .with("workspace_id", "w1")
            .at(42);
        let json = serde_json::to_value(&event).expect("event should serialize");
        assert_eq!(json["type"], EventKind::WorkspaceSwitched.as_str());
        assert_eq!(json["payload"]["workspace_id"], "w1");
        assert_eq!(json["timestamp_ms"], 42);
        assert!(json.get("scope").is_none());
    }
}
