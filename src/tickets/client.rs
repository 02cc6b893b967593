use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;

use super::api_types::parse_tickets_body;
use super::types::Ticket;
use super::{FetchError, TicketFetcher};

/// Ticketing backend client
#[derive(Clone)]
pub struct TicketClient {
  http: reqwest::Client,
  tickets_url: Url,
  token: Option<String>,
}

impl TicketClient {
  pub fn new(api: &ApiConfig, token: Option<String>) -> Result<Self> {
    // Url::join replaces the last path segment unless the base ends with '/'
    let mut base = api.url.trim().to_string();
    if !base.ends_with('/') {
      base.push('/');
    }

    let base = Url::parse(&base).map_err(|e| eyre!("Invalid API url {}: {}", api.url, e))?;
    let tickets_url = base
      .join("tickets")
      .map_err(|e| eyre!("Invalid API url {}: {}", api.url, e))?;

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(api.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      tickets_url,
      token: token.filter(|t| !t.is_empty()),
    })
  }
}

#[async_trait]
impl TicketFetcher for TicketClient {
  /// Get the current user's tickets
  async fn fetch_tickets(&self) -> Result<Vec<Ticket>, FetchError> {
    let token = self.token.as_deref().ok_or(FetchError::Unauthenticated)?;

    debug!("GET {}", self.tickets_url);
    let response = self
      .http
      .get(self.tickets_url.clone())
      .header(CONTENT_TYPE, "application/json")
      .header(ACCEPT, "application/json")
      .bearer_auth(token)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        status: status.as_u16(),
      });
    }

    let body = response.bytes().await?;
    let tickets = parse_tickets_body(&body);
    debug!("Fetched {} tickets", tickets.len());

    Ok(tickets)
  }
}
