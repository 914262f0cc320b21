//! Navigation sidebar state.

use crate::store::cell::StateCell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarState {
    pub expanded: bool,
    pub active_item: Option<String>,
    /// Pinned navigation item ids, in pin order.
    pub pinned: Vec<String>,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self {
            expanded: true,
            active_item: None,
            pinned: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SidebarStore {
    cell: StateCell<SidebarState>,
}

impl SidebarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SidebarState {
        self.cell.get()
    }

    pub fn is_expanded(&self) -> bool {
        self.state().expanded
    }

    pub fn toggle_expanded(&mut self) -> bool {
        self.cell.patch(|state| state.expanded = !state.expanded);
        self.state().expanded
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.cell.patch(|state| state.expanded = expanded);
    }

    pub fn set_active_item(&mut self, item: Option<&str>) {
        let next = item.map(str::to_string);
        self.cell.patch(|state| state.active_item = next);
    }

    /// Pins an item once; returns `false` when it was already pinned.
    pub fn pin(&mut self, item: &str) -> bool {
        if self.is_pinned(item) {
            return false;
        }
        self.cell.patch(|state| state.pinned.push(item.to_string()));
        true
    }

    pub fn unpin(&mut self, item: &str) -> bool {
        if !self.is_pinned(item) {
            return false;
        }
        self.cell.patch(|state| state.pinned.retain(|pinned| pinned != item));
        true
    }

    pub fn is_pinned(&self, item: &str) -> bool {
        self.state().pinned.iter().any(|pinned| pinned == item)
    }

    pub fn clear(&mut self) {
        self.cell.reset();
    }
}
