//! Theme container backed by the local preference store.
//!
//! # Invariants
//! - A missing or unrecognized persisted value restores as `auto`.
//! - `set_mode` commits in memory first; a persistence failure is returned
//!   to the caller but does not roll back the visible theme.

use crate::model::theme::{ResolvedTheme, ThemeMode};
use crate::prefs::{PreferenceResult, PreferenceStore};
use crate::store::cell::{StateCell, SubscriptionId};
use log::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub system_prefers_dark: bool,
}

#[derive(Debug)]
pub struct ThemeStore {
    cell: StateCell<ThemeState>,
    preference_key: String,
}

impl ThemeStore {
    pub fn new(preference_key: impl Into<String>) -> Self {
        Self {
            cell: StateCell::default(),
            preference_key: preference_key.into(),
        }
    }

    pub fn state(&self) -> &ThemeState {
        self.cell.get()
    }

    pub fn mode(&self) -> ThemeMode {
        self.state().mode
    }

    pub fn resolved(&self) -> ResolvedTheme {
        let state = self.state();
        state.mode.resolve(state.system_prefers_dark)
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&ThemeState, u64) + 'static,
    ) -> SubscriptionId {
        self.cell.subscribe(observer)
    }

    /// Loads the persisted choice into memory and returns it.
    pub fn restore(&mut self, prefs: &dyn PreferenceStore) -> PreferenceResult<ThemeMode> {
        let stored = prefs.get(&self.preference_key)?;
        let mode = match stored.as_deref() {
            Some(value) => ThemeMode::parse(value).unwrap_or_else(|| {
                warn!("event=theme_restore module=theme status=fallback reason=unknown_value");
                ThemeMode::Auto
            }),
            None => ThemeMode::Auto,
        };
        self.cell.patch(|state| state.mode = mode);
        Ok(mode)
    }

    pub fn set_mode(
        &mut self,
        mode: ThemeMode,
        prefs: &dyn PreferenceStore,
    ) -> PreferenceResult<()> {
        self.cell.patch(|state| state.mode = mode);
        prefs.set(&self.preference_key, mode.as_str())?;
        info!(
            "event=theme_set module=theme status=ok mode={}",
            mode.as_str()
        );
        Ok(())
    }

    /// Advances `light -> dark -> auto -> light` and persists the result.
    pub fn cycle(&mut self, prefs: &dyn PreferenceStore) -> PreferenceResult<ThemeMode> {
        let next = self.mode().next();
        self.set_mode(next, prefs)?;
        Ok(next)
    }

    pub fn set_system_prefers_dark(&mut self, prefers_dark: bool) {
        if self.state().system_prefers_dark == prefers_dark {
            return;
        }
        self.cell
            .patch(|state| state.system_prefers_dark = prefers_dark);
    }

    /// Resets the in-memory record; the persisted choice is left untouched.
    pub fn clear(&mut self) {
        self.cell.reset();
    }
}
