//! Core configuration for retention limits and preference keys.
//!
//! # Invariants
//! - Defaults mirror the shipped UI: 200 bus events, literal zero-limit rule.
//! - `theme_preference_key` is never blank.

use crate::store::bounded::ZeroLimitPolicy;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_EVENT_LOG_LIMIT: usize = 200;
pub const DEFAULT_AUDIT_LIMIT: usize = 500;
pub const DEFAULT_JOURNAL_LIMIT: usize = 500;
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 50;
pub const DEFAULT_THEME_PREFERENCE_KEY: &str = "orgdesk.theme";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub event_log_limit: usize,
    pub audit_limit: usize,
    pub journal_limit: usize,
    pub notification_limit: usize,
    /// How a retention limit of zero is interpreted by every bounded log.
    pub zero_limit_policy: ZeroLimitPolicy,
    pub theme_preference_key: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            event_log_limit: DEFAULT_EVENT_LOG_LIMIT,
            audit_limit: DEFAULT_AUDIT_LIMIT,
            journal_limit: DEFAULT_JOURNAL_LIMIT,
            notification_limit: DEFAULT_NOTIFICATION_LIMIT,
            zero_limit_policy: ZeroLimitPolicy::default(),
            theme_preference_key: DEFAULT_THEME_PREFERENCE_KEY.to_string(),
        }
    }
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.theme_preference_key.trim().is_empty() {
            return Err(ConfigError::EmptyPreferenceKey);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyPreferenceKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPreferenceKey => write!(f, "theme preference key must not be blank"),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DEFAULT_EVENT_LOG_LIMIT};

    #[test]
    fn default_config_is_valid() {
        let config = CoreConfig::default();
        assert_eq!(config.event_log_limit, DEFAULT_EVENT_LOG_LIMIT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_preference_key_is_rejected() {
        let config = CoreConfig {
            theme_preference_key: "  ".to_string(),
            ..CoreConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPreferenceKey));
    }
}
