//! In-process collection service used by tests and the CLI probe.

use crate::model::{Entity, ListScope};
use crate::service::{CollectionService, ServiceError, ServiceResult};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Vector-backed collection with scripted failure injection.
#[derive(Debug)]
pub struct InMemoryCollectionService<T> {
    items: RefCell<Vec<T>>,
    queued_failures: RefCell<VecDeque<ServiceError>>,
}

impl<T: Entity + Clone> InMemoryCollectionService<T> {
    pub fn new() -> Self {
        Self {
            items: RefCell::new(Vec::new()),
            queued_failures: RefCell::new(VecDeque::new()),
        }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items),
            queued_failures: RefCell::new(VecDeque::new()),
        }
    }

    /// Makes the next call (of any kind) fail with `error`.
    pub fn fail_next(&self, error: ServiceError) {
        self.queued_failures.borrow_mut().push_back(error);
    }

    /// Snapshot of the stored records.
    pub fn items(&self) -> Vec<T> {
        self.items.borrow().clone()
    }

    fn take_failure(&self) -> ServiceResult<()> {
        match self.queued_failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<T: Entity + Clone> CollectionService<T> for InMemoryCollectionService<T> {
    fn list(&self, scope: &ListScope) -> ServiceResult<Vec<T>> {
        self.take_failure()?;
        Ok(self
            .items
            .borrow()
            .iter()
            .filter(|item| item.in_scope(scope))
            .cloned()
            .collect())
    }

    fn create(&self, item: &T) -> ServiceResult<T> {
        self.take_failure()?;
        let mut items = self.items.borrow_mut();
        if items
            .iter()
            .any(|existing| existing.entity_id() == item.entity_id())
        {
            return Err(ServiceError::Conflict(format!(
                "id `{}` already exists",
                item.entity_id()
            )));
        }
        items.push(item.clone());
        Ok(item.clone())
    }

    fn update(&self, item: &T) -> ServiceResult<T> {
        self.take_failure()?;
        let mut items = self.items.borrow_mut();
        match items
            .iter_mut()
            .find(|existing| existing.entity_id() == item.entity_id())
        {
            Some(slot) => {
                *slot = item.clone();
                Ok(item.clone())
            }
            None => Err(ServiceError::NotFound(item.entity_id().to_string())),
        }
    }
}
