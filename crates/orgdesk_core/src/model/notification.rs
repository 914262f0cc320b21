//! In-app notification record.

use crate::model::new_entity_id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub level: NotificationLevel,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at_ms: i64,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, created_at_ms: i64) -> Self {
        Self {
            id: new_entity_id(),
            level,
            title: title.into(),
            message: None,
            read: false,
            created_at_ms,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
