//! Session credential coordination.
//!
//! This module provides:
//! - The session client that attaches bearer credentials and recovers 401s
//! - Single-flight refresh coordination with a FIFO wait queue
//! - The retry marker bounding each request to one refresh-and-retry

mod client;
mod coordinator;
mod retry;

pub use client::SessionClient;
pub use coordinator::{
    PendingRefresh, RefreshCoordinator, RefreshLease, RefreshOutcome, RefreshTicket,
};
pub use retry::{FailureAction, RetryableRequest};
