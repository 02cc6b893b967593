//! Ticket list state and its transitions.
//!
//! Pure data: the synchronizer decides when a transition happens, this module
//! decides what it does.

use chrono::{DateTime, Utc};

use crate::tickets::store::CachedTickets;
use crate::tickets::types::Ticket;
use crate::tickets::FetchError;

/// What started a network fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
  /// Mount or focus. Failures fall back to cached data.
  Automatic,
  /// Explicit user request. Failures are reported as an alert.
  Manual,
}

/// Lifecycle phase of the ticket list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPhase {
  /// Nothing to show yet
  Loading,
  /// Tickets are displayable; see `SyncState::is_stale`
  Ready,
  /// No cached data and the fetch failed
  Failed { message: String },
}

/// Everything the ticket list view displays.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncState {
  pub phase: SyncPhase,
  pub tickets: Vec<Ticket>,
  pub last_synced_at: Option<DateTime<Utc>>,
  /// Displayed tickets came from the local cache, not a just-completed fetch
  pub is_stale: bool,
  /// A fetch is in flight
  pub refreshing: bool,
  /// One-shot message for a failed manual refresh
  pub alert: Option<String>,
}

impl Default for SyncState {
  fn default() -> Self {
    Self {
      phase: SyncPhase::Loading,
      tickets: Vec::new(),
      last_synced_at: None,
      is_stale: false,
      refreshing: false,
      alert: None,
    }
  }
}

impl SyncState {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_ready(&self) -> bool {
    self.phase == SyncPhase::Ready
  }

  /// Show cached tickets while the network fetch runs.
  pub fn apply_cache(&mut self, cached: Option<CachedTickets>) {
    if let Some(cached) = cached {
      self.tickets = cached.tickets;
      self.last_synced_at = cached.last_synced_at;
      self.is_stale = true;
      self.phase = SyncPhase::Ready;
    }
  }

  /// Apply the outcome of a fetch. Returns the tickets to persist, if any.
  pub fn apply_fetch(
    &mut self,
    trigger: RefreshTrigger,
    result: Result<Vec<Ticket>, FetchError>,
    now: DateTime<Utc>,
  ) -> Option<Vec<Ticket>> {
    match result {
      Ok(tickets) => {
        self.tickets = tickets;
        self.last_synced_at = Some(now);
        self.is_stale = false;
        self.phase = SyncPhase::Ready;
        Some(self.tickets.clone())
      }
      Err(e) => {
        match trigger {
          RefreshTrigger::Automatic => {
            if self.is_ready() {
              // Whatever is shown is no longer backed by the network
              self.is_stale = true;
            } else {
              self.phase = SyncPhase::Failed {
                message: failure_message(&e),
              };
            }
          }
          RefreshTrigger::Manual => {
            self.alert = Some(failure_message(&e));
            if !self.is_ready() {
              self.phase = SyncPhase::Failed {
                message: failure_message(&e),
              };
            }
          }
        }
        None
      }
    }
  }

  /// Remove and return the pending alert.
  pub fn take_alert(&mut self) -> Option<String> {
    self.alert.take()
  }
}

fn failure_message(error: &FetchError) -> String {
  match error {
    FetchError::Unauthenticated => "You are not logged in. Run `railpass login` first.".to_string(),
    _ => format!("Could not fetch tickets. Please try again later. ({})", error),
  }
}
