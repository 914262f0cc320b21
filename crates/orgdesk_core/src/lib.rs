//! Client-side state core for the multi-tenant workspace admin shell.
//! Containers, derived views and loaders live here; rendering does not.

pub mod app;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod service;
pub mod store;

pub use app::{AppState, RefreshReport, Services};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::event::{DomainEvent, EventKind};
pub use model::theme::{ResolvedTheme, ThemeMode};
pub use model::workspace::{Workspace, WorkspaceScope, WorkspaceScopeKind};
pub use prefs::{MemoryPreferenceStore, PreferenceError, PreferenceStore, SqlitePreferenceStore};
pub use service::memory::InMemoryCollectionService;
pub use service::{CollectionService, ServiceError, ServiceResult};
pub use store::bounded::{BoundedLog, ZeroLimitPolicy};
pub use store::loader::{LoadOutcome, LoadStatus, LoadTicket};
pub use store::{ActorContext, WriteOutcome};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
