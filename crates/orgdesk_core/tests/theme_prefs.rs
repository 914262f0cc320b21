use orgdesk_core::config::DEFAULT_THEME_PREFERENCE_KEY;
use orgdesk_core::db::open_db;
use orgdesk_core::store::theme::ThemeStore;
use orgdesk_core::{
    MemoryPreferenceStore, PreferenceError, PreferenceStore, ResolvedTheme,
    SqlitePreferenceStore, ThemeMode,
};

#[test]
fn theme_choice_survives_reopening_the_database() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("prefs.db");

    {
        let conn = open_db(&path).expect("open prefs db");
        let prefs = SqlitePreferenceStore::new(&conn);
        let mut theme = ThemeStore::new(DEFAULT_THEME_PREFERENCE_KEY);
        theme
            .set_mode(ThemeMode::Dark, &prefs)
            .expect("theme should persist");
    }

    let conn = open_db(&path).expect("reopen prefs db");
    let prefs = SqlitePreferenceStore::new(&conn);
    let mut theme = ThemeStore::new(DEFAULT_THEME_PREFERENCE_KEY);
    let restored = theme.restore(&prefs).expect("restore should succeed");

    assert_eq!(restored, ThemeMode::Dark);
    assert_eq!(theme.resolved(), ResolvedTheme::Dark);
}

#[test]
fn missing_or_unknown_preference_restores_auto() {
    let prefs = MemoryPreferenceStore::new();
    let mut theme = ThemeStore::new(DEFAULT_THEME_PREFERENCE_KEY);

    assert_eq!(theme.restore(&prefs).expect("empty store"), ThemeMode::Auto);

    prefs
        .set(DEFAULT_THEME_PREFERENCE_KEY, "sepia")
        .expect("raw write");
    theme
        .set_mode(ThemeMode::Light, &MemoryPreferenceStore::new())
        .expect("in-memory write");

    assert_eq!(theme.restore(&prefs).expect("unknown value"), ThemeMode::Auto);
    assert_eq!(theme.mode(), ThemeMode::Auto);
}

#[test]
fn auto_follows_the_system_flag() {
    let prefs = MemoryPreferenceStore::new();
    let mut theme = ThemeStore::new(DEFAULT_THEME_PREFERENCE_KEY);
    theme.set_mode(ThemeMode::Auto, &prefs).expect("write");

    theme.set_system_prefers_dark(true);
    assert_eq!(theme.resolved(), ResolvedTheme::Dark);

    theme.set_system_prefers_dark(false);
    assert_eq!(theme.resolved(), ResolvedTheme::Light);
}

#[test]
fn cycle_visits_every_mode_and_persists_each_step() {
    let prefs = MemoryPreferenceStore::new();
    let mut theme = ThemeStore::new(DEFAULT_THEME_PREFERENCE_KEY);
    theme.set_mode(ThemeMode::Light, &prefs).expect("write");

    let mut visited = Vec::new();
    for _ in 0..3 {
        visited.push(theme.cycle(&prefs).expect("cycle"));
        assert_eq!(
            prefs.get(DEFAULT_THEME_PREFERENCE_KEY).expect("read").as_deref(),
            Some(theme.mode().as_str())
        );
    }

    assert_eq!(visited, vec![ThemeMode::Dark, ThemeMode::Auto, ThemeMode::Light]);
}

#[test]
fn blank_preference_key_is_rejected_but_memory_state_changes() {
    let prefs = MemoryPreferenceStore::new();
    let mut theme = ThemeStore::new("   ");

    let err = theme
        .set_mode(ThemeMode::Dark, &prefs)
        .expect_err("blank key must fail");

    assert!(matches!(err, PreferenceError::EmptyKey));
    assert_eq!(theme.mode(), ThemeMode::Dark);
}

#[test]
fn sqlite_store_removes_keys() {
    let conn = orgdesk_core::db::open_db_in_memory().expect("open");
    let prefs = SqlitePreferenceStore::new(&conn);

    prefs.set("sidebar.expanded", "false").expect("write");
    assert!(prefs.remove("sidebar.expanded").expect("remove"));
    assert!(!prefs.remove("sidebar.expanded").expect("second remove"));
    assert_eq!(prefs.get("sidebar.expanded").expect("read"), None);
}
