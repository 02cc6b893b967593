//! Local ticket cache on top of the key-value store.
//!
//! The ticket list and the last-sync timestamp live under two keys. Every
//! failure here is logged and swallowed: a broken cache behaves like an empty
//! one.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::storage::KeyValueStore;

use super::types::Ticket;

const TICKETS_KEY: &str = "user_tickets";
const LAST_SYNC_KEY: &str = "tickets_last_sync";

/// Tickets read back from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedTickets {
  pub tickets: Vec<Ticket>,
  /// When the tickets were last fetched successfully, if known
  pub last_synced_at: Option<DateTime<Utc>>,
}

/// Derive the cache namespace for an account on a backend.
///
/// Different accounts or backends never read each other's tickets.
pub fn cache_namespace(api_url: &str, email: &str) -> String {
  let input = format!("{}\n{}", api_url.trim().trim_end_matches('/'), email.trim().to_lowercase());

  // SHA256 hash for stable, fixed-length keys
  let mut hasher = Sha256::new();
  hasher.update(input.as_bytes());
  let digest = hex::encode(hasher.finalize());
  digest[..16].to_string()
}

/// Persists the last successfully fetched ticket list.
#[derive(Clone)]
pub struct LocalTicketStore {
  kv: Arc<dyn KeyValueStore>,
  tickets_key: String,
  last_sync_key: String,
}

impl LocalTicketStore {
  pub fn new(kv: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
    Self {
      kv,
      tickets_key: format!("{}:{}", TICKETS_KEY, namespace),
      last_sync_key: format!("{}:{}", LAST_SYNC_KEY, namespace),
    }
  }

  /// Write `tickets` and the current time, replacing the previous value.
  /// Best-effort: failures are logged only.
  pub fn save(&self, tickets: &[Ticket]) {
    if let Err(e) = self.try_save(tickets, Utc::now()) {
      warn!("Error saving tickets locally: {}", e);
    }
  }

  fn try_save(&self, tickets: &[Ticket], synced_at: DateTime<Utc>) -> Result<()> {
    let data =
      serde_json::to_string(tickets).map_err(|e| eyre!("Failed to serialize tickets: {}", e))?;

    self.kv.set(&self.tickets_key, &data)?;
    self.kv.set(&self.last_sync_key, &synced_at.to_rfc3339())?;

    debug!("Saved {} tickets to local cache", tickets.len());
    Ok(())
  }

  /// Read the last saved tickets. `None` when nothing was saved or the
  /// stored value can't be read.
  pub fn load(&self) -> Option<CachedTickets> {
    let data = match self.kv.get(&self.tickets_key) {
      Ok(Some(data)) => data,
      Ok(None) => return None,
      Err(e) => {
        warn!("Error loading local tickets: {}", e);
        return None;
      }
    };

    let tickets: Vec<Ticket> = match serde_json::from_str(&data) {
      Ok(tickets) => tickets,
      Err(e) => {
        warn!("Cached tickets are corrupt, ignoring: {}", e);
        return None;
      }
    };

    let last_synced_at = match self.kv.get(&self.last_sync_key) {
      Ok(Some(raw)) => DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| warn!("Ignoring unreadable last-sync time '{}': {}", raw, e))
        .ok(),
      Ok(None) => None,
      Err(e) => {
        warn!("Error loading last-sync time: {}", e);
        None
      }
    };

    Some(CachedTickets {
      tickets,
      last_synced_at,
    })
  }

  /// Remove the cached tickets and sync time.
  pub fn clear(&self) -> Result<()> {
    self.kv.remove(&self.tickets_key)?;
    self.kv.remove(&self.last_sync_key)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::storage::{NoopStore, SqliteStore};
  use crate::test_support::{sample_ticket, FailingStore, MemoryStore};

  fn memory_store() -> (Arc<MemoryStore>, LocalTicketStore) {
    let kv = Arc::new(MemoryStore::new());
    let store = LocalTicketStore::new(kv.clone(), "ns");
    (kv, store)
  }

  #[test]
  fn test_load_before_save_is_none() {
    let (_, store) = memory_store();
    assert_eq!(store.load(), None);
  }

  #[test]
  fn test_load_returns_saved_tickets() {
    let (_, store) = memory_store();
    let tickets = vec![sample_ticket(1), sample_ticket(2)];

    let before = Utc::now();
    store.save(&tickets);

    let cached = store.load().unwrap();
    assert_eq!(cached.tickets, tickets);
    let synced = cached.last_synced_at.unwrap();
    assert!(synced >= before - chrono::Duration::seconds(1));
  }

  #[test]
  fn test_save_overwrites() {
    let (_, store) = memory_store();
    store.save(&[sample_ticket(1), sample_ticket(2)]);
    store.save(&[sample_ticket(3)]);

    let cached = store.load().unwrap();
    assert_eq!(cached.tickets, vec![sample_ticket(3)]);
  }

  #[test]
  fn test_save_empty_list_is_still_a_cache() {
    let (_, store) = memory_store();
    store.save(&[]);
    assert_eq!(store.load().unwrap().tickets, Vec::<Ticket>::new());
  }

  #[test]
  fn test_corrupt_tickets_load_as_none() {
    let (kv, store) = memory_store();
    kv.set("user_tickets:ns", "{not json").unwrap();
    assert_eq!(store.load(), None);
  }

  #[test]
  fn test_corrupt_timestamp_keeps_tickets() {
    let (kv, store) = memory_store();
    store.save(&[sample_ticket(1)]);
    kv.set("tickets_last_sync:ns", "yesterday").unwrap();

    let cached = store.load().unwrap();
    assert_eq!(cached.tickets.len(), 1);
    assert_eq!(cached.last_synced_at, None);
  }

  #[test]
  fn test_storage_errors_fail_soft() {
    let store = LocalTicketStore::new(Arc::new(FailingStore), "ns");
    store.save(&[sample_ticket(1)]);
    assert_eq!(store.load(), None);
  }

  #[test]
  fn test_noop_store_never_caches() {
    let store = LocalTicketStore::new(Arc::new(NoopStore), "ns");
    store.save(&[sample_ticket(1)]);
    assert_eq!(store.load(), None);
  }

  #[test]
  fn test_clear() {
    let kv = Arc::new(SqliteStore::open_in_memory().unwrap());
    let store = LocalTicketStore::new(kv, "ns");
    store.save(&[sample_ticket(1)]);
    store.clear().unwrap();
    assert_eq!(store.load(), None);
  }

  #[test]
  fn test_namespaces_are_isolated() {
    let kv = Arc::new(MemoryStore::new());
    let alice = LocalTicketStore::new(kv.clone(), &cache_namespace("https://a", "alice@x.sk"));
    let bob = LocalTicketStore::new(kv, &cache_namespace("https://a", "bob@x.sk"));

    alice.save(&[sample_ticket(1)]);
    assert_eq!(bob.load(), None);
    assert!(alice.load().is_some());
  }

  #[test]
  fn test_cache_namespace_normalizes() {
    assert_eq!(
      cache_namespace("https://a/api/", "Alice@X.sk"),
      cache_namespace("https://a/api", "alice@x.sk")
    );
    assert_eq!(cache_namespace("https://a", "b").len(), 16);
  }
}
