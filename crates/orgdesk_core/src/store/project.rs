//! Project container with service-backed writes.
//!
//! # Responsibility
//! - Mirror the active workspace's projects and write through the remote
//!   collection service.
//!
//! # Invariants
//! - Every operation silently skips when no workspace is active.
//! - A failed write leaves the local collection untouched and records the
//!   message in `status.error`; a successful write clears it.
//! - Optional `description` values are passed through unchanged.

use crate::model::project::{NewProject, Project};
use crate::model::{upsert_by_id, ListScope};
use crate::service::{CollectionService, ServiceError, ServiceResult};
use crate::store::cell::{Memo, StateCell};
use crate::store::loader::{LoadOutcome, LoadStatus, LoadTicket, Loader};
use crate::store::WriteOutcome;
use log::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectState {
    pub projects: Vec<Project>,
    pub status: LoadStatus,
}

pub struct ProjectStore {
    cell: StateCell<ProjectState>,
    loader: Loader,
    active: Memo<Vec<Project>>,
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectStore {
    pub fn new() -> Self {
        Self {
            cell: StateCell::default(),
            loader: Loader::new("projects"),
            active: Memo::default(),
        }
    }

    pub fn state(&self) -> &ProjectState {
        self.cell.get()
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.cell.patch(|state| state.projects = projects);
    }

    pub fn clear(&mut self) {
        self.loader.invalidate();
        self.cell.reset();
    }

    pub fn project_count(&self) -> usize {
        self.state().projects.len()
    }

    pub fn find_project(&self, project_id: &str) -> Option<&Project> {
        self.state().projects.iter().find(|p| p.id == project_id)
    }

    pub fn active_projects(&self) -> Vec<Project> {
        self.active.get(self.cell.version(), || {
            self.state()
                .projects
                .iter()
                .filter(|project| !project.archived)
                .cloned()
                .collect()
        })
    }

    pub fn archived_projects(&self) -> Vec<&Project> {
        self.state()
            .projects
            .iter()
            .filter(|project| project.archived)
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
        result: ServiceResult<Vec<Project>>,
    ) -> LoadOutcome {
        if !self.loader.is_current(ticket) {
            return self.loader.discard(ticket);
        }
        let loader = &self.loader;
        let mut outcome = LoadOutcome::Stale;
        self.cell.patch(|state| {
            outcome = loader.finish(ticket, &mut state.status, &mut state.projects, result);
        });
        outcome
    }

    /// Loads the projects of `workspace_id`; `None` when no workspace is active.
    pub fn load(
        &mut self,
        service: &dyn CollectionService<Project>,
        workspace_id: Option<&str>,
    ) -> Option<LoadOutcome> {
        let Some(workspace_id) = workspace_id else {
            debug!("event=load module=projects status=skip reason=no_active_workspace");
            return None;
        };
        let ticket = self.begin_load();
        let result = service.list(&ListScope::Workspace(workspace_id.to_string()));
        Some(self.finish_load(ticket, result))
    }

    pub fn create(
        &mut self,
        service: &dyn CollectionService<Project>,
        workspace_id: Option<&str>,
        input: NewProject,
        now_ms: i64,
    ) -> WriteOutcome<Project> {
        let Some(workspace_id) = workspace_id else {
            debug!("event=project_create module=projects status=skip reason=no_active_workspace");
            return WriteOutcome::Skipped;
        };
        let mut project = Project::create(workspace_id, input);
        project.updated_at_ms = Some(now_ms);
        let result = service.create(&project);
        self.settle_write("project_create", result)
    }

    /// Writes a full replacement of an existing project.
    pub fn update(
        &mut self,
        service: &dyn CollectionService<Project>,
        workspace_id: Option<&str>,
        mut project: Project,
        now_ms: i64,
    ) -> WriteOutcome<Project> {
        if workspace_id.is_none() {
            debug!("event=project_update module=projects status=skip reason=no_active_workspace");
            return WriteOutcome::Skipped;
        }
        project.updated_at_ms = Some(now_ms);
        let result = service.update(&project);
        self.settle_write("project_update", result)
    }

    pub fn archive(
        &mut self,
        service: &dyn CollectionService<Project>,
        workspace_id: Option<&str>,
        project_id: &str,
        now_ms: i64,
    ) -> WriteOutcome<Project> {
        if workspace_id.is_none() {
            debug!("event=project_archive module=projects status=skip reason=no_active_workspace");
            return WriteOutcome::Skipped;
        }
        let Some(mut project) = self.find_project(project_id).cloned() else {
            return self.settle_write(
                "project_archive",
                Err(ServiceError::NotFound(project_id.to_string())),
            );
        };
        project.archived = true;
        project.updated_at_ms = Some(now_ms);
        let result = service.update(&project);
        self.settle_write("project_archive", result)
    }

    fn settle_write(
        &mut self,
        event: &str,
        result: ServiceResult<Project>,
    ) -> WriteOutcome<Project> {
        match result {
            Ok(stored) => {
                let committed = stored.clone();
                self.cell.patch(|state| {
                    upsert_by_id(&mut state.projects, committed);
                    state.status.error = None;
                });
                debug!("event={event} module=projects status=ok");
                WriteOutcome::Saved(stored)
            }
            Err(err) => {
                let message = err.user_message();
                warn!(
                    "event={event} module=projects status=error error_code={}",
                    err.code()
                );
                let stored_message = message.clone();
                self.cell
                    .patch(|state| state.status.error = Some(stored_message));
                WriteOutcome::Failed(message)
            }
        }
    }
}
