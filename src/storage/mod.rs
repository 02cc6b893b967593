//! Durable key-value storage used for the ticket cache and the session.
//!
//! Values are plain strings (usually JSON). There are no transactional
//! guarantees across keys: callers that write several keys must tolerate
//! seeing only some of them on the next read.

mod kv;
mod sqlite;

pub use kv::{KeyValueStore, NoopStore};
pub use sqlite::SqliteStore;
