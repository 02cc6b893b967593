//! Shared services for one run of the program.

use color_eyre::Result;
use std::sync::Arc;
use tracing::warn;

use crate::config::Config;
use crate::session::{Session, SessionStore};
use crate::storage::{KeyValueStore, NoopStore, SqliteStore};
use crate::sync::TicketSynchronizer;
use crate::tickets::client::TicketClient;
use crate::tickets::store::{cache_namespace, LocalTicketStore};

/// Configuration plus the stores built from it, passed explicitly to
/// whatever needs them.
pub struct AppContext {
  config: Config,
  storage: Arc<dyn KeyValueStore>,
  sessions: SessionStore,
  persistent: bool,
}

impl AppContext {
  /// Open the on-disk database named by the configuration.
  ///
  /// If the database can't be opened the program still runs: nothing is
  /// cached and the session only lives for this run.
  pub fn open(config: Config) -> Self {
    match SqliteStore::open(config.cache.path.as_deref()) {
      Ok(store) => Self::with_storage(config, Arc::new(store)),
      Err(e) => {
        warn!("Local storage unavailable, running without it: {}", e);
        let mut ctx = Self::with_storage(config, Arc::new(NoopStore));
        ctx.persistent = false;
        ctx
      }
    }
  }

  pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStore>) -> Self {
    let sessions = SessionStore::new(storage.clone());
    Self {
      config,
      storage,
      sessions,
      persistent: true,
    }
  }

  /// Whether sessions and tickets survive past this run.
  pub fn is_persistent(&self) -> bool {
    self.persistent
  }

  pub fn sessions(&self) -> &SessionStore {
    &self.sessions
  }

  /// Bearer token: the environment override, else the stored session's.
  pub fn token(&self, session: Option<&Session>) -> Option<String> {
    Config::env_token().or_else(|| session.map(|s| s.token.clone()))
  }

  /// Ticket cache for `session`'s account.
  pub fn ticket_store(&self, session: Option<&Session>) -> LocalTicketStore {
    let email = session.map(|s| s.email.as_str()).unwrap_or_default();
    let namespace = cache_namespace(&self.config.api.url, email);

    let kv: Arc<dyn KeyValueStore> = if self.config.cache.enabled {
      self.storage.clone()
    } else {
      Arc::new(NoopStore)
    };
    LocalTicketStore::new(kv, &namespace)
  }

  /// Synchronizer for `session`'s tickets against the configured backend.
  pub fn synchronizer(&self, session: Option<&Session>) -> Result<TicketSynchronizer<TicketClient>> {
    let client = TicketClient::new(&self.config.api, self.token(session))?;
    Ok(TicketSynchronizer::new(client, self.ticket_store(session)))
  }
}
