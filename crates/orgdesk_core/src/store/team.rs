//! Team directory container.
//!
//! # Invariants
//! - `selected_team`, when set, mirrors an entry of `teams` by id after any
//!   collection replacement; a selection whose id disappears is dropped.
//! - Loads are scoped to one organization or to a single team.

use crate::model::team::{Team, TeamId};
use crate::model::{replace_by_id, upsert_by_id, ListScope};
use crate::service::{CollectionService, ServiceResult};
use crate::store::cell::{StateCell, SubscriptionId};
use crate::store::loader::{LoadOutcome, LoadStatus, LoadTicket, Loader};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamState {
    pub teams: Vec<Team>,
    pub selected_team: Option<Team>,
    pub status: LoadStatus,
}

pub struct TeamStore {
    cell: StateCell<TeamState>,
    loader: Loader,
}

impl Default for TeamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamStore {
    pub fn new() -> Self {
        Self {
            cell: StateCell::default(),
            loader: Loader::new("teams"),
        }
    }

    pub fn state(&self) -> &TeamState {
        self.cell.get()
    }

    pub fn version(&self) -> u64 {
        self.cell.version()
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&TeamState, u64) + 'static,
    ) -> SubscriptionId {
        self.cell.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.cell.unsubscribe(id)
    }

    pub fn set_teams(&mut self, teams: Vec<Team>) {
        self.cell.patch(|state| {
            state.teams = teams;
            sync_selection(state);
        });
    }

    /// Inserts a team or replaces the one with the same id.
    pub fn add_team(&mut self, team: Team) {
        self.cell.patch(|state| {
            upsert_by_id(&mut state.teams, team);
            sync_selection(state);
        });
    }

    /// Replaces an existing team; returns `false` when the id is unknown.
    pub fn update_team(&mut self, team: Team) -> bool {
        if self.find_team(&team.id).is_none() {
            return false;
        }
        self.cell.patch(|state| {
            replace_by_id(&mut state.teams, team);
            sync_selection(state);
        });
        true
    }

    pub fn remove_team(&mut self, team_id: &str) -> Option<Team> {
        let removed = self.find_team(team_id).cloned()?;
        self.cell.patch(|state| {
            state.teams.retain(|team| team.id != team_id);
            sync_selection(state);
        });
        Some(removed)
    }

    pub fn set_selected_team(&mut self, team: Option<Team>) {
        self.cell.patch(|state| state.selected_team = team);
    }

    pub fn clear(&mut self) {
        self.loader.invalidate();
        self.cell.reset();
    }

    pub fn has_teams(&self) -> bool {
        !self.state().teams.is_empty()
    }

    pub fn has_selected_team(&self) -> bool {
        self.state().selected_team.is_some()
    }

    pub fn team_count(&self) -> usize {
        self.state().teams.len()
    }

    pub fn find_team(&self, team_id: &str) -> Option<&Team> {
        self.state().teams.iter().find(|team| team.id == team_id)
    }

    pub fn teams_for_organization(&self, organization_id: &str) -> Vec<&Team> {
        self.state()
            .teams
            .iter()
            .filter(|team| team.organization_id == organization_id)
            .collect()
    }

    /// Team ids the given account belongs to.
    pub fn team_ids_for_member(&self, account_id: &str) -> Vec<TeamId> {
        self.state()
            .teams
            .iter()
            .filter(|team| team.member_ids.iter().any(|id| id == account_id))
            .map(|team| team.id.clone())
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
        result: ServiceResult<Vec<Team>>,
    ) -> LoadOutcome {
        if !self.loader.is_current(ticket) {
            return self.loader.discard(ticket);
        }
        let loader = &self.loader;
        let mut outcome = LoadOutcome::Stale;
        self.cell.patch(|state| {
            outcome = loader.finish(ticket, &mut state.status, &mut state.teams, result);
            sync_selection(state);
        });
        outcome
    }

    /// Lists the teams of one organization through `service`.
    pub fn load(
        &mut self,
        service: &dyn CollectionService<Team>,
        organization_id: &str,
    ) -> LoadOutcome {
        self.load_scoped(service, &ListScope::Organization(organization_id.to_string()))
    }

    pub fn load_scoped(
        &mut self,
        service: &dyn CollectionService<Team>,
        scope: &ListScope,
    ) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = service.list(scope);
        self.finish_load(ticket, result)
    }
}

fn sync_selection(state: &mut TeamState) {
    let Some(selected) = state.selected_team.as_ref() else {
        return;
    };
    state.selected_team = state
        .teams
        .iter()
        .find(|team| team.id == selected.id)
        .cloned();
}
