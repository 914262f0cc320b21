//! Audit trail container for the active workspace.
//!
//! # Responsibility
//! - Mirror recent audit entries and write new ones through the service.
//!
//! # Invariants
//! - Retention is bounded; on load, only the newest `limit` entries are kept.
//! - Recording requires both an actor and an active workspace; otherwise it
//!   is skipped without touching state.

use crate::model::audit::AuditEntry;
use crate::model::ListScope;
use crate::service::{CollectionService, ServiceResult};
use crate::store::bounded::{BoundedLog, ZeroLimitPolicy};
use crate::store::cell::StateCell;
use crate::store::loader::{LoadOutcome, LoadStatus, LoadTicket, Loader};
use crate::store::{ActorContext, WriteOutcome};
use log::{debug, warn};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditState {
    pub entries: BoundedLog<AuditEntry>,
    pub status: LoadStatus,
}

impl AuditState {
    pub fn new(limit: usize, zero_policy: ZeroLimitPolicy) -> Self {
        Self {
            entries: BoundedLog::new(limit, zero_policy),
            status: LoadStatus::default(),
        }
    }
}

/// Input for one audit write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditRecord {
    pub action: String,
    pub target_id: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

impl AuditRecord {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn target(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = Some(target_id.into());
        self
    }
}

#[derive(Debug)]
pub struct AuditStore {
    cell: StateCell<AuditState>,
    loader: Loader,
}

impl AuditStore {
    pub fn new(limit: usize, zero_policy: ZeroLimitPolicy) -> Self {
        Self {
            cell: StateCell::new(AuditState::new(limit, zero_policy)),
            loader: Loader::new("audit"),
        }
    }

    pub fn state(&self) -> &AuditState {
        self.cell.get()
    }

    pub fn entry_count(&self) -> usize {
        self.state().entries.len()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.state().entries.to_vec()
    }

    pub fn entries_by_actor(&self, actor_id: &str) -> Vec<&AuditEntry> {
        self.state()
            .entries
            .iter()
            .filter(|entry| entry.actor_id == actor_id)
            .collect()
    }

    /// Entries whose action equals `action` or lives under it (`team` matches
    /// `team.created`).
    pub fn entries_by_action(&self, action: &str) -> Vec<&AuditEntry> {
        self.state()
            .entries
            .iter()
            .filter(|entry| action_matches(&entry.action, action))
            .collect()
    }

    pub fn clear(&mut self) {
        self.loader.invalidate();
        let entries = &self.state().entries;
        let initial = AuditState::new(entries.limit(), entries.zero_policy());
        self.cell.set(initial);
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        let mut status = self.state().status.clone();
        let ticket = self.loader.begin(&mut status);
        self.cell.patch(|state| state.status = status);
        ticket
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: ServiceResult<Vec<AuditEntry>>,
    ) -> LoadOutcome {
        if !self.loader.is_current(ticket) {
            return self.loader.discard(ticket);
        }
        let loader = &self.loader;
        let mut outcome = LoadOutcome::Stale;
        self.cell.patch(|state| {
            let mut loaded = Vec::new();
            outcome = loader.finish(ticket, &mut state.status, &mut loaded, result);
            if matches!(outcome, LoadOutcome::Applied(_)) {
                loaded.sort_by_key(|entry| entry.timestamp_ms);
                state.entries.clear();
                state.entries.extend(loaded);
            }
        });
        outcome
    }

    pub fn load(
        &mut self,
        service: &dyn CollectionService<AuditEntry>,
        workspace_id: Option<&str>,
    ) -> Option<LoadOutcome> {
        let Some(workspace_id) = workspace_id else {
            debug!("event=load module=audit status=skip reason=no_active_workspace");
            return None;
        };
        let ticket = self.begin_load();
        let result = service.list(&ListScope::Workspace(workspace_id.to_string()));
        Some(self.finish_load(ticket, result))
    }

    pub fn record(
        &mut self,
        service: &dyn CollectionService<AuditEntry>,
        context: Option<ActorContext<'_>>,
        record: AuditRecord,
        now_ms: i64,
    ) -> WriteOutcome<AuditEntry> {
        let Some(context) = context else {
            debug!("event=audit_record module=audit status=skip reason=missing_context");
            return WriteOutcome::Skipped;
        };
        let mut entry = AuditEntry::new(
            context.workspace_id,
            context.actor_id,
            record.action,
            now_ms,
        );
        entry.target_id = record.target_id;
        entry.metadata = record.metadata;

        match service.create(&entry) {
            Ok(stored) => {
                let committed = stored.clone();
                self.cell.patch(|state| {
                    state.entries.push(committed);
                    state.status.error = None;
                });
                WriteOutcome::Saved(stored)
            }
            Err(err) => {
                warn!(
                    "event=audit_record module=audit status=error error_code={}",
                    err.code()
                );
                let message = err.user_message();
                let stored_message = message.clone();
                self.cell
                    .patch(|state| state.status.error = Some(stored_message));
                WriteOutcome::Failed(message)
            }
        }
    }
}

fn action_matches(action: &str, filter: &str) -> bool {
    action == filter
        || action
            .strip_prefix(filter)
            .is_some_and(|rest| rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::action_matches;

    #[test]
    fn action_filter_matches_exact_and_namespaced() {
        assert!(action_matches("team.created", "team.created"));
        assert!(action_matches("team.created", "team"));
        assert!(!action_matches("teams.created", "team"));
        assert!(!action_matches("team", "team.created"));
    }
}
