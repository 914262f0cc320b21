//! SQLite-backed preference store over the migrated `preferences` table.

use crate::prefs::{normalize_key, PreferenceResult, PreferenceStore};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

pub struct SqlitePreferenceStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePreferenceStore<'conn> {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PreferenceStore for SqlitePreferenceStore<'_> {
    fn get(&self, key: &str) -> PreferenceResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> PreferenceResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO preferences (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        debug!("event=pref_set module=prefs status=ok key={key}");
        Ok(())
    }

    fn remove(&self, key: &str) -> PreferenceResult<bool> {
        let key = normalize_key(key)?;
        let changed = self
            .conn
            .execute("DELETE FROM preferences WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
