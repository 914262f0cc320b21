//! Feature module registry with a capability index.
//!
//! # Responsibility
//! - Register validated module declarations and track their enabled flag.
//! - Answer capability lookups for navigation/settings composition.
//!
//! # Invariants
//! - Module ids are unique; re-registration is rejected, not merged.
//! - `capability_index` lists exactly the registered modules per capability.
//! - New registrations start enabled.

use crate::model::module::{AppModule, ModuleValidationError};
use crate::store::cell::{Memo, StateCell};
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredModule {
    pub module: AppModule,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRegistryState {
    pub entries: BTreeMap<String, RegisteredModule>,
    pub capability_index: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleRegistryError {
    InvalidModule(ModuleValidationError),
    DuplicateModuleId(String),
    ModuleNotFound(String),
}

impl Display for ModuleRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidModule(err) => write!(f, "invalid module declaration: {err}"),
            Self::DuplicateModuleId(id) => write!(f, "module id already registered: {id}"),
            Self::ModuleNotFound(id) => write!(f, "module not found: {id}"),
        }
    }
}

impl Error for ModuleRegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidModule(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModuleValidationError> for ModuleRegistryError {
    fn from(value: ModuleValidationError) -> Self {
        Self::InvalidModule(value)
    }
}

#[derive(Debug, Default)]
pub struct ModuleRegistry {
    cell: StateCell<ModuleRegistryState>,
    enabled: Memo<Vec<AppModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModuleRegistryState {
        self.cell.get()
    }

    pub fn register(&mut self, module: AppModule) -> Result<(), ModuleRegistryError> {
        module.validate()?;
        let id = module.id.trim().to_string();
        if self.state().entries.contains_key(id.as_str()) {
            return Err(ModuleRegistryError::DuplicateModuleId(id));
        }

        self.cell.patch(|state| {
            for capability in &module.capabilities {
                state
                    .capability_index
                    .entry(capability.trim().to_string())
                    .or_default()
                    .insert(id.clone());
            }
            state.entries.insert(
                id.clone(),
                RegisteredModule {
                    module,
                    enabled: true,
                },
            );
        });
        info!("event=module_register module=modules status=ok module_id={id}");
        Ok(())
    }

    pub fn unregister(&mut self, module_id: &str) -> Result<AppModule, ModuleRegistryError> {
        let Some(entry) = self.state().entries.get(module_id).cloned() else {
            return Err(ModuleRegistryError::ModuleNotFound(module_id.to_string()));
        };
        self.cell.patch(|state| {
            state.entries.remove(module_id);
            for ids in state.capability_index.values_mut() {
                ids.remove(module_id);
            }
            state.capability_index.retain(|_, ids| !ids.is_empty());
        });
        Ok(entry.module)
    }

    pub fn enable(&mut self, module_id: &str) -> Result<(), ModuleRegistryError> {
        self.set_enabled(module_id, true)
    }

    pub fn disable(&mut self, module_id: &str) -> Result<(), ModuleRegistryError> {
        self.set_enabled(module_id, false)
    }

    /// Flips the enabled flag and returns the new value.
    pub fn toggle(&mut self, module_id: &str) -> Result<bool, ModuleRegistryError> {
        let next = !self.is_enabled(module_id)?;
        self.set_enabled(module_id, next)?;
        Ok(next)
    }

    pub fn clear(&mut self) {
        self.cell.reset();
    }

    pub fn get(&self, module_id: &str) -> Option<&RegisteredModule> {
        self.state().entries.get(module_id)
    }

    pub fn is_enabled(&self, module_id: &str) -> Result<bool, ModuleRegistryError> {
        self.get(module_id)
            .map(|entry| entry.enabled)
            .ok_or_else(|| ModuleRegistryError::ModuleNotFound(module_id.to_string()))
    }

    pub fn module_count(&self) -> usize {
        self.state().entries.len()
    }

    /// Enabled modules in id order.
    pub fn enabled_modules(&self) -> Vec<AppModule> {
        self.enabled.get(self.cell.version(), || {
            self.state()
                .entries
                .values()
                .filter(|entry| entry.enabled)
                .map(|entry| entry.module.clone())
                .collect()
        })
    }

    pub fn modules_by_capability(&self, capability: &str) -> Vec<&RegisteredModule> {
        let Some(ids) = self.state().capability_index.get(capability) else {
            return vec![];
        };
        ids.iter()
            .filter_map(|id| self.state().entries.get(id))
            .collect()
    }

    fn set_enabled(&mut self, module_id: &str, enabled: bool) -> Result<(), ModuleRegistryError> {
        if !self.state().entries.contains_key(module_id) {
            return Err(ModuleRegistryError::ModuleNotFound(module_id.to_string()));
        }
        self.cell.patch(|state| {
            if let Some(entry) = state.entries.get_mut(module_id) {
                entry.enabled = enabled;
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ModuleRegistry, ModuleRegistryError};
    use crate::model::module::{
        AppModule, CAPABILITY_AUDIT, CAPABILITY_NAVIGATION, CAPABILITY_SETTINGS,
    };

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry
            .register(AppModule::new(
                "billing",
                "Billing",
                "1.0.0",
                &[CAPABILITY_NAVIGATION, CAPABILITY_SETTINGS],
            ))
            .expect("billing should register");
        registry
            .register(AppModule::new(
                "compliance.audit",
                "Audit",
                "0.3.1",
                &[CAPABILITY_NAVIGATION, CAPABILITY_AUDIT],
            ))
            .expect("audit should register");
        registry
    }

    #[test]
    fn builds_capability_index() {
        let registry = registry();
        let navigation = registry.modules_by_capability(CAPABILITY_NAVIGATION);
        assert_eq!(navigation.len(), 2);
        let audit = registry.modules_by_capability(CAPABILITY_AUDIT);
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].module.id, "compliance.audit");
        assert!(registry.modules_by_capability("missing").is_empty());
    }

    #[test]
    fn rejects_duplicate_and_invalid_modules() {
        let mut registry = registry();
        let err = registry
            .register(AppModule::new("billing", "Billing", "1.0.0", &[]))
            .expect_err("duplicate registration must fail");
        assert!(matches!(err, ModuleRegistryError::DuplicateModuleId(_)));

        let err = registry
            .register(AppModule::new("Bad Id", "Bad", "1.0.0", &[]))
            .expect_err("invalid id must fail");
        assert!(matches!(err, ModuleRegistryError::InvalidModule(_)));
        assert_eq!(registry.module_count(), 2);
    }

    #[test]
    fn toggle_updates_enabled_view() {
        let mut registry = registry();
        assert_eq!(registry.enabled_modules().len(), 2);

        assert_eq!(registry.toggle("billing"), Ok(false));
        let enabled = registry.enabled_modules();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].id, "compliance.audit");

        assert_eq!(registry.toggle("billing"), Ok(true));
        assert_eq!(registry.enabled_modules().len(), 2);
        assert!(matches!(
            registry.toggle("nope"),
            Err(ModuleRegistryError::ModuleNotFound(_))
        ));
    }

    #[test]
    fn unregister_prunes_capability_index() {
        let mut registry = registry();
        registry
            .unregister("compliance.audit")
            .expect("registered module should unregister");
        assert!(registry.modules_by_capability(CAPABILITY_AUDIT).is_empty());
        assert!(!registry.state().capability_index.contains_key(CAPABILITY_AUDIT));
    }
}
