//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::storage::KeyValueStore;
use crate::tickets::types::{RouteStop, Station, Ticket, Train};
use crate::tickets::{FetchError, TicketFetcher};

/// Volatile storage backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryStore {
  entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    Ok(self.entries.lock().unwrap().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    self
      .entries
      .lock()
      .unwrap()
      .insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    self.entries.lock().unwrap().remove(key);
    Ok(())
  }
}

/// Storage where every operation fails.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
  fn get(&self, _key: &str) -> Result<Option<String>> {
    Err(eyre!("disk on fire"))
  }

  fn set(&self, _key: &str, _value: &str) -> Result<()> {
    Err(eyre!("disk on fire"))
  }

  fn remove(&self, _key: &str) -> Result<()> {
    Err(eyre!("disk on fire"))
  }
}

/// A ticket with a two-stop route.
pub fn sample_ticket(id: u64) -> Ticket {
  Ticket {
    id,
    train: Train {
      id: Some(10 + id),
      name: format!("R {}", 600 + id),
      routes: vec![
        RouteStop {
          id: Some(1),
          station_name: "Bratislava hl.st.".to_string(),
          latitude: Some(48.158),
          longitude: Some(17.106),
          departure_time: Some("08:00".to_string()),
        },
        RouteStop {
          id: Some(2),
          station_name: "Zilina".to_string(),
          latitude: Some(49.226),
          longitude: Some(18.739),
          departure_time: Some("10:05".to_string()),
        },
      ],
    },
    start_station: Station {
      id: Some(1),
      name: "Bratislava hl.st.".to_string(),
    },
    end_station: Station {
      id: Some(2),
      name: "Zilina".to_string(),
    },
    purchased_at: Some("2025-05-01T10:00:00Z".to_string()),
    departure_time_at: Some("2025-05-02 08:00".to_string()),
    arrival_time_at: Some("2025-05-02 10:05".to_string()),
  }
}

pub fn sample_tickets(ids: &[u64]) -> Vec<Ticket> {
  ids.iter().map(|id| sample_ticket(*id)).collect()
}

/// Fetcher that replays queued responses and counts calls.
///
/// With a gate installed, each call waits for `Notify::notify_one` before
/// answering. The highest number of calls running at once is recorded.
#[derive(Default)]
pub struct ScriptedFetcher {
  responses: Mutex<VecDeque<Result<Vec<Ticket>, FetchError>>>,
  gate: Mutex<Option<Arc<Notify>>>,
  calls: AtomicUsize,
  running: AtomicUsize,
  peak: AtomicUsize,
}

impl ScriptedFetcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn respond_ok(&self, tickets: Vec<Ticket>) {
    self.responses.lock().unwrap().push_back(Ok(tickets));
  }

  pub fn respond_err(&self, status: u16) {
    self
      .responses
      .lock()
      .unwrap()
      .push_back(Err(FetchError::Status { status }));
  }

  /// Make subsequent calls block until the returned gate is notified.
  pub fn hold(&self) -> Arc<Notify> {
    let gate = Arc::new(Notify::new());
    *self.gate.lock().unwrap() = Some(gate.clone());
    gate
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  /// Most calls that were ever in progress at the same time.
  pub fn peak_concurrency(&self) -> usize {
    self.peak.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl TicketFetcher for ScriptedFetcher {
  async fn fetch_tickets(&self) -> Result<Vec<Ticket>, FetchError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
    self.peak.fetch_max(running, Ordering::SeqCst);

    let gate = self.gate.lock().unwrap().clone();
    if let Some(gate) = gate {
      gate.notified().await;
    }

    self.running.fetch_sub(1, Ordering::SeqCst);
    self
      .responses
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or(Err(FetchError::Status { status: 503 }))
  }
}

#[async_trait]
impl<F: TicketFetcher + ?Sized> TicketFetcher for Arc<F> {
  async fn fetch_tickets(&self) -> Result<Vec<Ticket>, FetchError> {
    (**self).fetch_tickets().await
  }
}
