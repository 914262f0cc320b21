//! Workspace container: known workspaces and the active one.
//!
//! # Invariants
//! - `active_workspace_id`, when set, references an entry of `workspaces`.
//! - Removing or replacing away the active workspace clears the selection.

use crate::model::workspace::{Workspace, WorkspaceId, WorkspaceScope, WorkspaceScopeKind};
use crate::model::{replace_by_id, upsert_by_id, ListScope};
use crate::service::{CollectionService, ServiceResult};
use crate::store::cell::{StateCell, SubscriptionId};
use crate::store::loader::{LoadOutcome, LoadStatus, LoadTicket, Loader};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceState {
    pub workspaces: Vec<Workspace>,
    pub active_workspace_id: Option<WorkspaceId>,
    pub status: LoadStatus,
}

pub struct WorkspaceStore {
    cell: StateCell<WorkspaceState>,
    loader: Loader,
}

impl Default for WorkspaceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceStore {
    pub fn new() -> Self {
        Self {
            cell: StateCell::default(),
            loader: Loader::new("workspaces"),
        }
    }

    pub fn state(&self) -> &WorkspaceState {
        self.cell.get()
    }

    pub fn version(&self) -> u64 {
        self.cell.version()
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&WorkspaceState, u64) + 'static,
    ) -> SubscriptionId {
        self.cell.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.cell.unsubscribe(id)
    }

    pub fn set_workspaces(&mut self, workspaces: Vec<Workspace>) {
        self.cell.patch(|state| {
            state.workspaces = workspaces;
            drop_dangling_active(state);
        });
    }

    pub fn add_workspace(&mut self, workspace: Workspace) {
        self.cell
            .patch(|state| upsert_by_id(&mut state.workspaces, workspace));
    }

    pub fn update_workspace(&mut self, workspace: Workspace) -> bool {
        if self.find_workspace(&workspace.id).is_none() {
            return false;
        }
        self.cell.patch(|state| {
            replace_by_id(&mut state.workspaces, workspace);
        });
        true
    }

    pub fn remove_workspace(&mut self, workspace_id: &str) -> Option<Workspace> {
        let removed = self.find_workspace(workspace_id).cloned()?;
        self.cell.patch(|state| {
            state.workspaces.retain(|w| w.id != workspace_id);
            drop_dangling_active(state);
        });
        Some(removed)
    }

    /// Activates a known workspace.
    ///
    /// Returns the newly active workspace, or `None` when the id is unknown
    /// or already active (no commit happens in either case).
    pub fn set_active_workspace(&mut self, workspace_id: &str) -> Option<Workspace> {
        if self.state().active_workspace_id.as_deref() == Some(workspace_id) {
            return None;
        }
        let workspace = self.find_workspace(workspace_id).cloned()?;
        self.cell
            .patch(|state| state.active_workspace_id = Some(workspace.id.clone()));
        Some(workspace)
    }

    pub fn clear_active_workspace(&mut self) {
        self.cell.patch(|state| state.active_workspace_id = None);
    }

    pub fn clear(&mut self) {
        self.loader.invalidate();
        self.cell.reset();
    }

    pub fn find_workspace(&self, workspace_id: &str) -> Option<&Workspace> {
        self.state().workspaces.iter().find(|w| w.id == workspace_id)
    }

    pub fn active_workspace(&self) -> Option<&Workspace> {
        let id = self.state().active_workspace_id.as_deref()?;
        self.find_workspace(id)
    }

    pub fn active_scope(&self) -> Option<&WorkspaceScope> {
        self.active_workspace().map(|workspace| &workspace.scope)
    }

    pub fn has_workspaces(&self) -> bool {
        !self.state().workspaces.is_empty()
    }

    pub fn workspace_count(&self) -> usize {
        self.state().workspaces.len()
    }

    pub fn workspaces_by_scope_kind(&self, kind: WorkspaceScopeKind) -> Vec<&Workspace> {
        self.state()
            .workspaces
            .iter()
            .filter(|workspace| workspace.scope.kind() == kind)
            .collect()
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
        result: ServiceResult<Vec<Workspace>>,
    ) -> LoadOutcome {
        if !self.loader.is_current(ticket) {
            return self.loader.discard(ticket);
        }
        let loader = &self.loader;
        let mut outcome = LoadOutcome::Stale;
        self.cell.patch(|state| {
            outcome = loader.finish(ticket, &mut state.status, &mut state.workspaces, result);
            drop_dangling_active(state);
        });
        outcome
    }

    pub fn load(&mut self, service: &dyn CollectionService<Workspace>) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = service.list(&ListScope::All);
        self.finish_load(ticket, result)
    }
}

fn drop_dangling_active(state: &mut WorkspaceState) {
    let dangling = match state.active_workspace_id.as_deref() {
        Some(id) => !state.workspaces.iter().any(|w| w.id == id),
        None => false,
    };
    if dangling {
        state.active_workspace_id = None;
    }
}
