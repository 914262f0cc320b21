//! Side-effect loader state machine.
//!
//! # Responsibility
//! - Track `idle -> loading -> idle` transitions for one remote collection.
//! - Correlate completions with the request that started them.
//!
//! # Invariants
//! - Success replaces data and clears the error; failure keeps data and
//!   records a human-readable message.
//! - Only the most recently issued ticket may settle the state. Older
//!   completions are reported as [`LoadOutcome::Stale`] and change nothing.
//! - Resetting a container invalidates every ticket issued before the reset.
//! - `loading` is false whenever the latest issued request has settled.

use crate::service::{ServiceError, ServiceResult};
use log::{debug, warn};

/// Loading flag and last error of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStatus {
    pub loading: bool,
    pub error: Option<String>,
}

/// Correlation handle for one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a load ticket must be passed back to finish the load"]
pub struct LoadTicket {
    seq: u64,
}

impl LoadTicket {
    pub fn seq(self) -> u64 {
        self.seq
    }
}

/// Result of settling a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Data replaced; carries the new item count.
    Applied(usize),
    /// Request failed; carries the stored message.
    Failed(String),
    /// A newer request was issued after this one; nothing changed.
    Stale,
}

/// Request sequencer owned by each loading container.
#[derive(Debug)]
pub struct Loader {
    module: &'static str,
    issued: u64,
}

impl Loader {
    pub fn new(module: &'static str) -> Self {
        Self { module, issued: 0 }
    }

    /// Issues a new ticket and marks `status` as loading.
    pub fn begin(&mut self, status: &mut LoadStatus) -> LoadTicket {
        self.issued += 1;
        status.loading = true;
        debug!(
            "event=load module={} status=start seq={}",
            self.module, self.issued
        );
        LoadTicket { seq: self.issued }
    }

    /// Retires every outstanding ticket; their completions settle as stale.
    ///
    /// Called when the owning container resets.
    pub fn invalidate(&mut self) {
        self.issued += 1;
        debug!(
            "event=load module={} status=invalidate latest={}",
            self.module, self.issued
        );
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.seq == self.issued
    }

    /// Reports a completion that lost the race against a newer request.
    pub fn discard(&self, ticket: LoadTicket) -> LoadOutcome {
        debug!(
            "event=load module={} status=stale seq={} latest={}",
            self.module, ticket.seq, self.issued
        );
        LoadOutcome::Stale
    }

    /// Settles `ticket` against `status` and `data`.
    pub fn finish<T>(
        &self,
        ticket: LoadTicket,
        status: &mut LoadStatus,
        data: &mut Vec<T>,
        result: ServiceResult<Vec<T>>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            return self.discard(ticket);
        }

        status.loading = false;
        match result {
            Ok(items) => {
                let count = items.len();
                *data = items;
                status.error = None;
                debug!(
                    "event=load module={} status=ok seq={} count={}",
                    self.module, ticket.seq, count
                );
                LoadOutcome::Applied(count)
            }
            Err(err) => {
                let message = load_error_message(self.module, &err);
                warn!(
                    "event=load module={} status=error seq={} error_code={}",
                    self.module,
                    ticket.seq,
                    err.code()
                );
                status.error = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }
}

fn load_error_message(module: &str, err: &ServiceError) -> String {
    format!("Failed to load {module}: {}", err.user_message())
}

#[cfg(test)]
mod tests {
    use super::{LoadOutcome, LoadStatus, Loader};
    use crate::service::ServiceError;

    #[test]
    fn failure_keeps_data_and_success_clears_error() {
        let mut loader = Loader::new("teams");
        let mut status = LoadStatus::default();
        let mut data = vec![1, 2];

        let ticket = loader.begin(&mut status);
        assert!(status.loading);
        let outcome = loader.finish(
            ticket,
            &mut status,
            &mut data,
            Err(ServiceError::Unavailable("timeout".into())),
        );
        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert!(!status.loading);
        assert!(status.error.is_some());
        assert_eq!(data, vec![1, 2]);

        let ticket = loader.begin(&mut status);
        let outcome = loader.finish(ticket, &mut status, &mut data, Ok(vec![7]));
        assert_eq!(outcome, LoadOutcome::Applied(1));
        assert_eq!(status, LoadStatus::default());
        assert_eq!(data, vec![7]);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut loader = Loader::new("teams");
        let mut status = LoadStatus::default();
        let mut data: Vec<i32> = Vec::new();

        let first = loader.begin(&mut status);
        let second = loader.begin(&mut status);

        let outcome = loader.finish(second, &mut status, &mut data, Ok(vec![2]));
        assert_eq!(outcome, LoadOutcome::Applied(1));

        let outcome = loader.finish(first, &mut status, &mut data, Ok(vec![1, 1]));
        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(data, vec![2]);
        assert!(!status.loading);
    }

    #[test]
    fn invalidate_retires_in_flight_ticket() {
        let mut loader = Loader::new("teams");
        let mut status = LoadStatus::default();
        let mut data: Vec<i32> = Vec::new();

        let ticket = loader.begin(&mut status);
        loader.invalidate();
        status = LoadStatus::default();

        let outcome = loader.finish(ticket, &mut status, &mut data, Ok(vec![1]));
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(data.is_empty());
        assert!(!status.loading);

        let ticket = loader.begin(&mut status);
        assert_eq!(
            loader.finish(ticket, &mut status, &mut data, Ok(vec![2])),
            LoadOutcome::Applied(1)
        );
    }

    #[test]
    fn stale_failure_does_not_clear_loading_of_newer_request() {
        let mut loader = Loader::new("teams");
        let mut status = LoadStatus::default();
        let mut data: Vec<i32> = Vec::new();

        let first = loader.begin(&mut status);
        let second = loader.begin(&mut status);
        let outcome = loader.finish(
            first,
            &mut status,
            &mut data,
            Err(ServiceError::Unavailable("down".into())),
        );
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(status.loading);
        assert!(status.error.is_none());

        let _ = loader.finish(second, &mut status, &mut data, Ok(vec![]));
        assert!(!status.loading);
    }
}
