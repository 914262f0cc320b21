//! Authenticated actor container.

use crate::model::account::Account;
use crate::store::cell::StateCell;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub actor: Option<Account>,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    cell: StateCell<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        self.cell.get()
    }

    pub fn sign_in(&mut self, account: Account) {
        self.cell.patch(|state| state.actor = Some(account));
    }

    pub fn sign_out(&mut self) -> Option<Account> {
        let previous = self.state().actor.clone();
        self.cell.reset();
        previous
    }

    pub fn actor(&self) -> Option<&Account> {
        self.state().actor.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().actor.is_some()
    }
}
