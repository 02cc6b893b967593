//! Offline-first synchronization of the ticket list.
//!
//! On mount the cached tickets are shown immediately and a network fetch is
//! started:
//! - success replaces the list, marks it fresh and writes it back to the cache
//! - an automatic fetch that fails keeps the cached list and marks it stale,
//!   or fails outright when there was nothing cached
//! - a manual refresh that fails raises an alert and leaves the list alone

mod state;
mod synchronizer;

pub use state::{RefreshTrigger, SyncPhase, SyncState};
pub use synchronizer::{RefreshOutcome, TicketSynchronizer};
