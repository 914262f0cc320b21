//! Feature module declaration and validation.
//!
//! # Invariants
//! - Module ids are lowercase dotted identifiers (`billing.invoices`).
//! - Capabilities are drawn from a closed, supported set without duplicates.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static MODULE_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)*$").expect("valid module id regex")
});
static SEMVER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid semver regex"));

/// Module contributes navigation entries to the sidebar.
pub const CAPABILITY_NAVIGATION: &str = "navigation";
/// Module exposes workspace settings panels.
pub const CAPABILITY_SETTINGS: &str = "settings";
/// Module writes audit entries.
pub const CAPABILITY_AUDIT: &str = "audit";
/// Module posts notifications.
pub const CAPABILITY_NOTIFICATIONS: &str = "notifications";

const SUPPORTED_CAPABILITIES: &[&str] = &[
    CAPABILITY_NAVIGATION,
    CAPABILITY_SETTINGS,
    CAPABILITY_AUDIT,
    CAPABILITY_NOTIFICATIONS,
];

pub fn supported_capabilities() -> &'static [&'static str] {
    SUPPORTED_CAPABILITIES
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppModule {
    pub id: String,
    pub name: String,
    pub version: String,
    pub capabilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AppModule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        capabilities: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            capabilities: capabilities.iter().map(|c| (*c).to_string()).collect(),
            description: None,
        }
    }

    /// Validates declaration-level invariants before registration.
    pub fn validate(&self) -> Result<(), ModuleValidationError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(ModuleValidationError::EmptyId);
        }
        if !MODULE_ID_RE.is_match(id) {
            return Err(ModuleValidationError::InvalidId(self.id.clone()));
        }
        if self.name.trim().is_empty() {
            return Err(ModuleValidationError::EmptyName);
        }
        if !SEMVER_RE.is_match(self.version.trim()) {
            return Err(ModuleValidationError::InvalidVersion(self.version.clone()));
        }

        let mut seen = BTreeSet::new();
        for capability in &self.capabilities {
            let normalized = capability.trim();
            if !supported_capabilities().contains(&normalized) {
                return Err(ModuleValidationError::UnsupportedCapability(
                    normalized.to_string(),
                ));
            }
            if !seen.insert(normalized) {
                return Err(ModuleValidationError::DuplicateCapability(
                    normalized.to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleValidationError {
    EmptyId,
    InvalidId(String),
    EmptyName,
    InvalidVersion(String),
    UnsupportedCapability(String),
    DuplicateCapability(String),
}

impl Display for ModuleValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "module id must not be empty"),
            Self::InvalidId(value) => write!(f, "module id is invalid: `{value}`"),
            Self::EmptyName => write!(f, "module name must not be empty"),
            Self::InvalidVersion(value) => {
                write!(f, "module version must be major.minor.patch, got `{value}`")
            }
            Self::UnsupportedCapability(value) => {
                write!(f, "unsupported module capability: `{value}`")
            }
            Self::DuplicateCapability(value) => {
                write!(f, "duplicate module capability: `{value}`")
            }
        }
    }
}

impl Error for ModuleValidationError {}
