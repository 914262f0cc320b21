//! Partner directory container.

use crate::model::partner::{Partner, PartnerId, PartnerStatus};
use crate::model::{replace_by_id, upsert_by_id, ListScope};
use crate::service::{CollectionService, ServiceResult};
use crate::store::cell::{Memo, StateCell};
use crate::store::loader::{LoadOutcome, LoadStatus, LoadTicket, Loader};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerState {
    pub partners: Vec<Partner>,
    pub selected_id: Option<PartnerId>,
    pub status: LoadStatus,
}

pub struct PartnerStore {
    cell: StateCell<PartnerState>,
    loader: Loader,
    active: Memo<Vec<Partner>>,
}

impl Default for PartnerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PartnerStore {
    pub fn new() -> Self {
        Self {
            cell: StateCell::default(),
            loader: Loader::new("partners"),
            active: Memo::default(),
        }
    }

    pub fn state(&self) -> &PartnerState {
        self.cell.get()
    }

    pub fn version(&self) -> u64 {
        self.cell.version()
    }

    pub fn set_partners(&mut self, partners: Vec<Partner>) {
        self.cell.patch(|state| state.partners = partners);
    }

    pub fn add_partner(&mut self, partner: Partner) {
        self.cell
            .patch(|state| upsert_by_id(&mut state.partners, partner));
    }

    pub fn update_partner(&mut self, partner: Partner) -> bool {
        if self.find_partner(&partner.id).is_none() {
            return false;
        }
        self.cell.patch(|state| {
            replace_by_id(&mut state.partners, partner);
        });
        true
    }

    pub fn set_partner_status(&mut self, partner_id: &str, status: PartnerStatus) -> bool {
        let Some(mut partner) = self.find_partner(partner_id).cloned() else {
            return false;
        };
        partner.status = status;
        self.update_partner(partner)
    }

    pub fn set_selected_partner(&mut self, partner_id: Option<&str>) {
        let next = partner_id
            .filter(|id| self.find_partner(id).is_some())
            .map(str::to_string);
        self.cell.patch(|state| state.selected_id = next);
    }

    pub fn clear(&mut self) {
        self.loader.invalidate();
        self.cell.reset();
    }

    pub fn find_partner(&self, partner_id: &str) -> Option<&Partner> {
        self.state()
            .partners
            .iter()
            .find(|partner| partner.id == partner_id)
    }

    pub fn selected_partner(&self) -> Option<&Partner> {
        let id = self.state().selected_id.as_deref()?;
        self.find_partner(id)
    }

    pub fn partner_count(&self) -> usize {
        self.state().partners.len()
    }

    pub fn active_partners(&self) -> Vec<Partner> {
        self.active.get(self.cell.version(), || {
            self.state()
                .partners
                .iter()
                .filter(|partner| partner.is_active())
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
        result: ServiceResult<Vec<Partner>>,
    ) -> LoadOutcome {
        if !self.loader.is_current(ticket) {
            return self.loader.discard(ticket);
        }
        let loader = &self.loader;
        let mut outcome = LoadOutcome::Stale;
        self.cell.patch(|state| {
            outcome = loader.finish(ticket, &mut state.status, &mut state.partners, result);
        });
        outcome
    }

    pub fn load(
        &mut self,
        service: &dyn CollectionService<Partner>,
        organization_id: &str,
    ) -> LoadOutcome {
        self.load_scoped(service, &ListScope::Organization(organization_id.to_string()))
    }

    pub fn load_scoped(
        &mut self,
        service: &dyn CollectionService<Partner>,
        scope: &ListScope,
    ) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = service.list(scope);
        self.finish_load(ticket, result)
    }
}
