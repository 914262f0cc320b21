//! Organization directory container.

use crate::model::organization::{Organization, OrganizationId};
use crate::model::{replace_by_id, upsert_by_id, ListScope};
use crate::service::{CollectionService, ServiceResult};
use crate::store::cell::{Memo, StateCell};
use crate::store::loader::{LoadOutcome, LoadStatus, LoadTicket, Loader};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationState {
    pub organizations: Vec<Organization>,
    pub selected_id: Option<OrganizationId>,
    pub status: LoadStatus,
}

pub struct OrganizationStore {
    cell: StateCell<OrganizationState>,
    loader: Loader,
    active: Memo<Vec<Organization>>,
}

impl Default for OrganizationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrganizationStore {
    pub fn new() -> Self {
        Self {
            cell: StateCell::default(),
            loader: Loader::new("organizations"),
            active: Memo::default(),
        }
    }

    pub fn state(&self) -> &OrganizationState {
        self.cell.get()
    }

    pub fn version(&self) -> u64 {
        self.cell.version()
    }

    pub fn set_organizations(&mut self, organizations: Vec<Organization>) {
        self.cell.patch(|state| {
            state.organizations = organizations;
            drop_dangling_selection(state);
        });
    }

    pub fn add_organization(&mut self, organization: Organization) {
        self.cell
            .patch(|state| upsert_by_id(&mut state.organizations, organization));
    }

    pub fn update_organization(&mut self, organization: Organization) -> bool {
        if self.find_organization(&organization.id).is_none() {
            return false;
        }
        self.cell.patch(|state| {
            replace_by_id(&mut state.organizations, organization);
        });
        true
    }

    /// Flags an organization archived. Archiving the selected one clears the
    /// selection.
    pub fn archive_organization(&mut self, organization_id: &str) -> bool {
        if self.find_organization(organization_id).is_none() {
            return false;
        }
        self.cell.patch(|state| {
            for organization in state.organizations.iter_mut() {
                if organization.id == organization_id {
                    organization.archived = true;
                }
            }
            if state.selected_id.as_deref() == Some(organization_id) {
                state.selected_id = None;
            }
        });
        true
    }

    /// Selects an organization by id; unknown ids clear the selection.
    pub fn set_selected_organization(&mut self, organization_id: Option<&str>) {
        let next = organization_id
            .filter(|id| self.find_organization(id).is_some())
            .map(str::to_string);
        self.cell.patch(|state| state.selected_id = next);
    }

    pub fn clear(&mut self) {
        self.loader.invalidate();
        self.cell.reset();
    }

    pub fn find_organization(&self, organization_id: &str) -> Option<&Organization> {
        self.state()
            .organizations
            .iter()
            .find(|organization| organization.id == organization_id)
    }

    pub fn selected_organization(&self) -> Option<&Organization> {
        let id = self.state().selected_id.as_deref()?;
        self.find_organization(id)
    }

    pub fn has_organizations(&self) -> bool {
        !self.state().organizations.is_empty()
    }

    pub fn organization_count(&self) -> usize {
        self.state().organizations.len()
    }

    /// Non-archived organizations, memoized per state version.
    pub fn active_organizations(&self) -> Vec<Organization> {
        self.active.get(self.cell.version(), || {
            self.state()
                .organizations
                .iter()
                .filter(|organization| !organization.archived)
                .cloned()
                .collect()
        })
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
        result: ServiceResult<Vec<Organization>>,
    ) -> LoadOutcome {
        if !self.loader.is_current(ticket) {
            return self.loader.discard(ticket);
        }
        let loader = &self.loader;
        let mut outcome = LoadOutcome::Stale;
        self.cell.patch(|state| {
            outcome = loader.finish(ticket, &mut state.status, &mut state.organizations, result);
            drop_dangling_selection(state);
        });
        outcome
    }

    pub fn load(&mut self, service: &dyn CollectionService<Organization>) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = service.list(&ListScope::All);
        self.finish_load(ticket, result)
    }
}

fn drop_dangling_selection(state: &mut OrganizationState) {
    let dangling = match state.selected_id.as_deref() {
        Some(id) => !state.organizations.iter().any(|o| o.id == id),
        None => false,
    };
    if dangling {
        state.selected_id = None;
    }
}
