//! Local preference persistence.
//!
//! # Responsibility
//! - Persist small UI preferences (theme choice) under fixed string keys.
//! - Keep the backing store swappable between SQLite and memory.
//!
//! # Invariants
//! - A missing key reads as `Ok(None)`, never as an error.
//! - Keys are trimmed and must be non-empty.

mod sqlite;

pub use sqlite::SqlitePreferenceStore;

use crate::db::DbError;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PreferenceResult<T> = Result<T, PreferenceError>;

#[derive(Debug)]
pub enum PreferenceError {
    EmptyKey,
    Db(DbError),
}

impl Display for PreferenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "preference key must not be blank"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PreferenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyKey => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for PreferenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PreferenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key/value preference storage contract.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> PreferenceResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PreferenceResult<()>;
    /// Removes a key; returns whether it existed.
    fn remove(&self, key: &str) -> PreferenceResult<bool>;
}

/// Process-lifetime preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> PreferenceResult<Option<String>> {
        let key = normalize_key(key)?;
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PreferenceResult<()> {
        let key = normalize_key(key)?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PreferenceResult<bool> {
        let key = normalize_key(key)?;
        Ok(self.values.borrow_mut().remove(key).is_some())
    }
}

pub(crate) fn normalize_key(key: &str) -> PreferenceResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(PreferenceError::EmptyKey);
    }
    Ok(trimmed)
}
