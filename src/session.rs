//! The logged-in user, persisted between runs.

use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::storage::KeyValueStore;

const SESSION_KEY: &str = "user";

/// Privilege level of a regular user
pub const PRIVILEGE_USER: u8 = 1;
/// Privilege level of an administrator
pub const PRIVILEGE_ADMIN: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
  #[serde(default)]
  pub firstname: String,
  #[serde(default)]
  pub lastname: String,
  #[serde(default)]
  pub email: String,
  /// Bearer token for the backend
  #[serde(default)]
  pub token: String,
  #[serde(default = "default_privilege")]
  pub privilege: u8,
}

fn default_privilege() -> u8 {
  PRIVILEGE_USER
}

impl Session {
  pub fn is_admin(&self) -> bool {
    self.privilege >= PRIVILEGE_ADMIN
  }

  pub fn display_name(&self) -> String {
    let name = format!("{} {}", self.firstname, self.lastname);
    let name = name.trim();
    if name.is_empty() {
      self.email.clone()
    } else {
      name.to_string()
    }
  }
}

/// Reads and writes the session.
pub struct SessionStore {
  kv: Arc<dyn KeyValueStore>,
}

impl SessionStore {
  pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
    Self { kv }
  }

  /// Load the stored session. Unreadable values count as logged out.
  pub fn load(&self) -> Option<Session> {
    let raw = match self.kv.get(SESSION_KEY) {
      Ok(raw) => raw?,
      Err(e) => {
        warn!("Failed to load user session: {}", e);
        return None;
      }
    };

    match serde_json::from_str::<Session>(&raw) {
      Ok(session) if !session.token.is_empty() => Some(session),
      Ok(_) => None,
      Err(e) => {
        warn!("Stored user session is corrupt, ignoring: {}", e);
        None
      }
    }
  }

  /// Persist `session`. A session without a token is a logout.
  pub fn save(&self, session: &Session) -> Result<()> {
    if session.token.is_empty() {
      return self.clear();
    }

    let data =
      serde_json::to_string(session).map_err(|e| eyre!("Failed to serialize session: {}", e))?;
    self.kv.set(SESSION_KEY, &data)
  }

  pub fn clear(&self) -> Result<()> {
    self.kv.remove(SESSION_KEY)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::MemoryStore;

  fn session(token: &str) -> Session {
    Session {
      firstname: "Jana".to_string(),
      lastname: "Novak".to_string(),
      email: "jana@example.com".to_string(),
      token: token.to_string(),
      privilege: PRIVILEGE_USER,
    }
  }

  #[test]
  fn test_roundtrip() {
    let store = SessionStore::new(Arc::new(MemoryStore::new()));
    assert_eq!(store.load(), None);

    store.save(&session("abc")).unwrap();
    assert_eq!(store.load(), Some(session("abc")));
  }

  #[test]
  fn test_empty_token_clears() {
    let kv = Arc::new(MemoryStore::new());
    let store = SessionStore::new(kv.clone());
    store.save(&session("abc")).unwrap();
    store.save(&session("")).unwrap();

    assert_eq!(store.load(), None);
    assert_eq!(kv.get(SESSION_KEY).unwrap(), None);
  }

  #[test]
  fn test_corrupt_session_is_logged_out() {
    let kv = Arc::new(MemoryStore::new());
    kv.set(SESSION_KEY, "not json").unwrap();
    assert_eq!(SessionStore::new(kv).load(), None);
  }

  #[test]
  fn test_missing_fields_default() {
    let kv = Arc::new(MemoryStore::new());
    kv.set(SESSION_KEY, r#"{"token": "t", "email": "a@b.c"}"#).unwrap();

    let loaded = SessionStore::new(kv).load().unwrap();
    assert_eq!(loaded.privilege, PRIVILEGE_USER);
    assert!(!loaded.is_admin());
    assert_eq!(loaded.display_name(), "a@b.c");
  }

  #[test]
  fn test_admin_and_display_name() {
    let mut s = session("t");
    s.privilege = PRIVILEGE_ADMIN;
    assert!(s.is_admin());
    assert_eq!(s.display_name(), "Jana Novak");
  }
}
