//! Single-flight token refresh with a FIFO wait queue.
//!
//! The first request to claim a refresh gets a [`RefreshLease`] and performs
//! the network call. Every request that fails while the lease is held is
//! queued and receives a [`PendingRefresh`] that completes when the lease
//! settles. The flag and queue sit behind one lock that is never held across
//! an `.await`, so checking and claiming the flag cannot interleave with
//! another task.

use std::collections::VecDeque;

use parking_lot::Mutex;
use sacco_domain::{AccessToken, ApiRequest};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::RefreshError;

/// How a refresh cycle settled, as delivered to each waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new access credential is available.
    Resolved(AccessToken),
    /// The refresh failed; waiters must not replay.
    Rejected(RefreshError),
}

/// A request deferred because a refresh was already in flight.
#[derive(Debug)]
struct PendingRequest {
    request: ApiRequest,
    completion: oneshot::Sender<RefreshOutcome>,
}

#[derive(Debug, Default)]
struct RefreshState {
    in_flight: bool,
    queue: VecDeque<PendingRequest>,
}

/// Result of asking the coordinator for a new credential.
#[derive(Debug)]
pub enum RefreshTicket<'a> {
    /// The caller owns this refresh cycle and must settle the lease.
    Lead(RefreshLease<'a>),
    /// Another caller is refreshing; wait for its outcome.
    Wait(PendingRefresh),
}

/// Process-wide refresh state: an in-flight flag and the queue of waiters.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    /// Creates a coordinator with no refresh in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while a refresh cycle is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Returns the number of requests waiting on the current refresh.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Claims the refresh for `request`, or queues it behind the one in flight.
    pub fn begin(&self, request: &ApiRequest) -> RefreshTicket<'_> {
        let mut state = self.state.lock();
        if state.in_flight {
            let (completion, receiver) = oneshot::channel();
            state.queue.push_back(PendingRequest {
                request: request.clone(),
                completion,
            });
            debug!(
                request = %request.label(),
                queued = state.queue.len(),
                "refresh in flight, queueing request"
            );
            return RefreshTicket::Wait(PendingRefresh { receiver });
        }
        state.in_flight = true;
        debug!(request = %request.label(), "starting token refresh");
        RefreshTicket::Lead(RefreshLease {
            coordinator: self,
            settled: false,
        })
    }

    /// Clears the flag and fans `outcome` out to every waiter in FIFO order.
    fn settle(&self, outcome: &RefreshOutcome) -> usize {
        let drained = {
            let mut state = self.state.lock();
            state.in_flight = false;
            std::mem::take(&mut state.queue)
        };
        let count = drained.len();
        for pending in drained {
            if pending.completion.send(outcome.clone()).is_err() {
                debug!(request = %pending.request.label(), "waiter dropped before refresh settled");
            }
        }
        count
    }
}

/// Exclusive right to perform the current refresh cycle.
///
/// Dropping an unsettled lease releases the flag and rejects every waiter
/// with [`RefreshError::Abandoned`].
#[derive(Debug)]
pub struct RefreshLease<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Hands `token` to every waiter. Returns how many were released.
    pub fn resolve(mut self, token: &AccessToken) -> usize {
        self.finish(&RefreshOutcome::Resolved(token.clone()))
    }

    /// Rejects every waiter with `error`. Returns how many were released.
    pub fn reject(mut self, error: &RefreshError) -> usize {
        self.finish(&RefreshOutcome::Rejected(error.clone()))
    }

    fn finish(&mut self, outcome: &RefreshOutcome) -> usize {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let released = self
                .coordinator
                .settle(&RefreshOutcome::Rejected(RefreshError::Abandoned));
            warn!(released, "token refresh abandoned before settling");
        }
    }
}

/// A queued request's handle on the refresh it is waiting for.
#[derive(Debug)]
pub struct PendingRefresh {
    receiver: oneshot::Receiver<RefreshOutcome>,
}

impl PendingRefresh {
    /// Waits for the refresh in flight to settle.
    ///
    /// # Errors
    ///
    /// Returns the refresh error, or [`RefreshError::Abandoned`] if the
    /// refresh was dropped without settling.
    pub async fn wait(self) -> Result<AccessToken, RefreshError> {
        match self.receiver.await {
            Ok(RefreshOutcome::Resolved(token)) => Ok(token),
            Ok(RefreshOutcome::Rejected(error)) => Err(error),
            Err(_) => Err(RefreshError::Abandoned),
        }
    }
}
