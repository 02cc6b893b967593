//! Tickets: domain types, the backend client and the local ticket cache.

pub mod api_types;
pub mod client;
pub mod store;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

use types::Ticket;

/// Failure of a ticket fetch. Every variant is transient from the
/// synchronizer's point of view.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("not logged in (no access token)")]
  Unauthenticated,
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("server responded with status {status}")]
  Status { status: u16 },
}

/// Source of the current user's tickets.
#[async_trait]
pub trait TicketFetcher: Send + Sync {
  async fn fetch_tickets(&self) -> Result<Vec<Ticket>, FetchError>;
}
