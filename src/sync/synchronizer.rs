//! Drives the ticket list: cache first, then network.

use chrono::Utc;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::tickets::store::LocalTicketStore;
use crate::tickets::TicketFetcher;

use super::state::{RefreshTrigger, SyncState};

/// Result of a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
  /// The fetch ran and its result is now displayed
  Applied,
  /// Another fetch was already in flight; nothing was done
  Coalesced,
  /// The view was dismissed before the result arrived
  Discarded,
}

/// Bookkeeping that must change atomically with respect to each other.
#[derive(Debug, Default)]
struct Control {
  /// Bumped on every open and dismiss; results from older generations are dropped
  generation: u64,
  /// Whether a view is currently showing the ticket list
  active: bool,
  /// Generation that will receive the result of the fetch in flight.
  /// Reopening the view hands a pending fetch over to the new generation.
  in_flight: Option<u64>,
}

/// Owns the ticket list state for one view.
///
/// The state is published through a `watch` channel so a UI can redraw on
/// change. At most one fetch is in flight at any time, across remounts.
pub struct TicketSynchronizer<F: TicketFetcher> {
  fetcher: F,
  store: LocalTicketStore,
  control: Mutex<Control>,
  state: watch::Sender<SyncState>,
}

impl<F: TicketFetcher> TicketSynchronizer<F> {
  pub fn new(fetcher: F, store: LocalTicketStore) -> Self {
    let (state, _) = watch::channel(SyncState::new());
    Self {
      fetcher,
      store,
      control: Mutex::new(Control::default()),
      state,
    }
  }

  fn control(&self) -> MutexGuard<'_, Control> {
    // Control holds plain counters; a panic elsewhere can't leave it half-written
    self.control.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Current state.
  pub fn snapshot(&self) -> SyncState {
    self.state.borrow().clone()
  }

  /// Receiver that is notified on every state change.
  pub fn subscribe(&self) -> watch::Receiver<SyncState> {
    self.state.subscribe()
  }

  /// Mount the view: show cached tickets, then fetch fresh ones.
  pub async fn mount(&self) -> RefreshOutcome {
    self.open();
    self.refresh(RefreshTrigger::Automatic).await
  }

  /// Start a new view generation and show whatever the cache holds,
  /// without touching the network.
  pub fn open(&self) {
    let (generation, adopted) = {
      let mut control = self.control();
      control.generation += 1;
      control.active = true;
      let generation = control.generation;
      let adopted = control.in_flight.is_some();
      if adopted {
        control.in_flight = Some(generation);
      }
      (generation, adopted)
    };
    debug!("Opening ticket view (generation {})", generation);
    if adopted {
      debug!("Taking over the fetch still in flight");
    }

    self.state.send_replace(SyncState::new());

    let cached = self.store.load();
    match &cached {
      Some(c) => info!("Showing {} cached tickets", c.tickets.len()),
      None => debug!("No cached tickets"),
    }

    let control = self.control();
    if control.active && control.generation == generation {
      let refreshing = control.in_flight == Some(generation);
      self.state.send_modify(|state| {
        state.apply_cache(cached);
        state.refreshing = refreshing;
      });
    }
  }

  /// Fetch tickets from the network and apply the result.
  ///
  /// A request made while another fetch is in flight is coalesced into it.
  /// The result goes to whichever view generation owns the fetch when it
  /// completes.
  pub async fn refresh(&self, trigger: RefreshTrigger) -> RefreshOutcome {
    {
      let mut control = self.control();
      if !control.active {
        debug!("Refresh requested with no active view");
        return RefreshOutcome::Discarded;
      }
      if control.in_flight.is_some() {
        debug!("Refresh already in flight, coalescing {:?} request", trigger);
        return RefreshOutcome::Coalesced;
      }
      control.in_flight = Some(control.generation);
    }

    self.state.send_modify(|state| state.refreshing = true);

    let result = self.fetcher.fetch_tickets().await;
    if let Err(e) = &result {
      warn!("Ticket fetch failed ({:?}): {}", trigger, e);
    }

    let to_persist = {
      let mut control = self.control();
      let owner = control.in_flight.take();
      if !control.active || owner != Some(control.generation) {
        debug!("Discarding ticket fetch for generation {:?}", owner);
        self.state.send_modify(|state| state.refreshing = false);
        return RefreshOutcome::Discarded;
      }

      let mut to_persist = None;
      self.state.send_modify(|state| {
        state.refreshing = false;
        to_persist = state.apply_fetch(trigger, result, Utc::now());
      });
      to_persist
    };

    if let Some(tickets) = to_persist {
      info!("Synced {} tickets", tickets.len());
      self.store.save(&tickets);
    }

    RefreshOutcome::Applied
  }

  /// Dismiss the view. A fetch still in flight is discarded unless the view
  /// is reopened before it completes.
  pub fn dismiss(&self) {
    let mut control = self.control();
    control.active = false;
    control.generation += 1;
    debug!("Ticket view dismissed");
  }

  /// Remove and return the pending alert, if any.
  pub fn take_alert(&self) -> Option<String> {
    let mut alert = None;
    self.state.send_if_modified(|state| {
      alert = state.take_alert();
      alert.is_some()
    });
    alert
  }
}
