//! Workspace journal container.

use crate::model::audit::{JournalEntry, NewJournalEntry};
use crate::model::ListScope;
use crate::service::{CollectionService, ServiceResult};
use crate::store::bounded::{BoundedLog, ZeroLimitPolicy};
use crate::store::cell::StateCell;
use crate::store::loader::{LoadOutcome, LoadStatus, LoadTicket, Loader};
use crate::store::{ActorContext, WriteOutcome};
use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalState {
    pub entries: BoundedLog<JournalEntry>,
    pub status: LoadStatus,
}

impl JournalState {
    pub fn new(limit: usize, zero_policy: ZeroLimitPolicy) -> Self {
        Self {
            entries: BoundedLog::new(limit, zero_policy),
            status: LoadStatus::default(),
        }
    }
}

#[derive(Debug)]
pub struct JournalStore {
    cell: StateCell<JournalState>,
    loader: Loader,
}

impl JournalStore {
    pub fn new(limit: usize, zero_policy: ZeroLimitPolicy) -> Self {
        Self {
            cell: StateCell::new(JournalState::new(limit, zero_policy)),
            loader: Loader::new("journal"),
        }
    }

    pub fn state(&self) -> &JournalState {
        self.cell.get()
    }

    pub fn entry_count(&self) -> usize {
        self.state().entries.len()
    }

    /// Entries with `from_ms <= timestamp_ms < to_ms`.
    pub fn entries_between(&self, from_ms: i64, to_ms: i64) -> Vec<&JournalEntry> {
        self.state()
            .entries
            .iter()
            .filter(|entry| entry.timestamp_ms >= from_ms && entry.timestamp_ms < to_ms)
            .collect()
    }

    pub fn entries_by_tag(&self, tag: &str) -> Vec<&JournalEntry> {
        let tag = tag.trim().to_ascii_lowercase();
        self.state()
            .entries
            .iter()
            .filter(|entry| entry.tags.iter().any(|t| *t == tag))
            .collect()
    }

    pub fn clear(&mut self) {
        self.loader.invalidate();
        let entries = &self.state().entries;
        let initial = JournalState::new(entries.limit(), entries.zero_policy());
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
        result: ServiceResult<Vec<JournalEntry>>,
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
        service: &dyn CollectionService<JournalEntry>,
        workspace_id: Option<&str>,
    ) -> Option<LoadOutcome> {
        let Some(workspace_id) = workspace_id else {
            debug!("event=load module=journal status=skip reason=no_active_workspace");
            return None;
        };
        let ticket = self.begin_load();
        let result = service.list(&ListScope::Workspace(workspace_id.to_string()));
        Some(self.finish_load(ticket, result))
    }

    pub fn append(
        &mut self,
        service: &dyn CollectionService<JournalEntry>,
        context: Option<ActorContext<'_>>,
        input: NewJournalEntry,
        now_ms: i64,
    ) -> WriteOutcome<JournalEntry> {
        let Some(context) = context else {
            debug!("event=journal_append module=journal status=skip reason=missing_context");
            return WriteOutcome::Skipped;
        };
        let entry = JournalEntry::create(context.workspace_id, context.actor_id, input, now_ms);
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
                    "event=journal_append module=journal status=error error_code={}",
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

#[cfg(test)]
mod tests {
    use super::JournalStore;
    use crate::model::audit::{JournalEntry, NewJournalEntry};
    use crate::service::memory::InMemoryCollectionService;
    use crate::store::bounded::ZeroLimitPolicy;
    use crate::store::{ActorContext, WriteOutcome};

    fn context() -> Option<ActorContext<'static>> {
        Some(ActorContext {
            workspace_id: "ws-1",
            actor_id: "u-1",
        })
    }

    fn note(title: &str) -> NewJournalEntry {
        NewJournalEntry {
            title: title.to_string(),
            ..NewJournalEntry::default()
        }
    }

    #[test]
    fn entries_between_is_half_open() {
        let service = InMemoryCollectionService::<JournalEntry>::new();
        let mut store = JournalStore::new(10, ZeroLimitPolicy::Unbounded);
        for (title, at) in [("a", 100), ("b", 200), ("c", 300)] {
            store.append(&service, context(), note(title), at);
        }

        let titles: Vec<&str> = store
            .entries_between(100, 300)
            .into_iter()
            .map(|entry| entry.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn append_without_context_is_skipped() {
        let service = InMemoryCollectionService::<JournalEntry>::new();
        let mut store = JournalStore::new(10, ZeroLimitPolicy::Unbounded);

        let outcome = store.append(&service, None, note("a"), 1);

        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(store.entry_count(), 0);
        assert!(service.items().is_empty());
    }

    #[test]
    fn retention_limit_applies_to_appends() {
        let service = InMemoryCollectionService::<JournalEntry>::new();
        let mut store = JournalStore::new(2, ZeroLimitPolicy::Unbounded);
        for at in 0..4 {
            store.append(&service, context(), note(&at.to_string()), at);
        }

        assert_eq!(store.entry_count(), 2);
        assert_eq!(service.items().len(), 4);
    }
}
