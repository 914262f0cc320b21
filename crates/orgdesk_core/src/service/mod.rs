//! Remote collection service boundary.
//!
//! # Responsibility
//! - Define the opaque list/create/update contract of the document store.
//! - Classify remote failures into a small closed error set.
//!
//! # Invariants
//! - Containers never talk to storage except through [`CollectionService`].
//! - Every [`ServiceError`] has a human-readable message for UI display.

pub mod memory;

use crate::model::ListScope;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure raised by a remote collection call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Transport or backend failure; carries the backend message.
    Unavailable(String),
    /// The record addressed by id does not exist.
    NotFound(String),
    /// The write conflicts with existing data (duplicate id, stale revision).
    Conflict(String),
    /// The caller is not allowed to perform the call.
    Unauthorized,
}

impl ServiceError {
    /// Stable machine code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Unauthorized => "unauthorized",
        }
    }

    /// Message suitable for storing in a container `error` field.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unavailable(detail) => format!("service unavailable ({detail})"),
            Self::NotFound(id) => format!("record `{id}` was not found"),
            Self::Conflict(detail) => format!("conflicting change ({detail})"),
            Self::Unauthorized => "you are not allowed to perform this action".to_string(),
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.user_message())
    }
}

impl Error for ServiceError {}

/// Opaque list/create/update access to one remote collection.
pub trait CollectionService<T> {
    fn list(&self, scope: &ListScope) -> ServiceResult<Vec<T>>;
    /// Persists a new record and returns the stored version.
    fn create(&self, item: &T) -> ServiceResult<T>;
    /// Replaces an existing record and returns the stored version.
    fn update(&self, item: &T) -> ServiceResult<T>;
}
