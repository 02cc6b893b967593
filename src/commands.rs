//! Non-interactive subcommands.

use color_eyre::{eyre::eyre, Result};
use std::fmt::Write as _;

use crate::context::AppContext;
use crate::session::{Session, PRIVILEGE_ADMIN, PRIVILEGE_USER};
use crate::sync::{RefreshTrigger, SyncPhase, SyncState, TicketSynchronizer};
use crate::tickets::TicketFetcher;
use crate::ui::format::{offline_banner, or_dash};

/// Credentials for `login`
pub struct Login {
  pub email: String,
  pub token: String,
  pub firstname: Option<String>,
  pub lastname: Option<String>,
  pub admin: bool,
}

pub fn login(ctx: &AppContext, login: Login) -> Result<()> {
  if login.token.trim().is_empty() {
    return Err(eyre!("Token must not be empty"));
  }
  if !ctx.is_persistent() {
    return Err(eyre!("Local storage is unavailable, the session can't be saved"));
  }

  let session = Session {
    firstname: login.firstname.unwrap_or_default(),
    lastname: login.lastname.unwrap_or_default(),
    email: login.email,
    token: login.token.trim().to_string(),
    privilege: if login.admin {
      PRIVILEGE_ADMIN
    } else {
      PRIVILEGE_USER
    },
  };
  ctx.sessions().save(&session)?;

  println!("Logged in as {}", session.display_name());
  Ok(())
}

/// Forget the session and its cached tickets.
pub fn logout(ctx: &AppContext) -> Result<()> {
  let session = ctx.sessions().load();
  ctx.ticket_store(session.as_ref()).clear()?;
  ctx.sessions().clear()?;

  println!("Logged out");
  Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
  match ctx.sessions().load() {
    Some(session) => {
      let role = if session.is_admin() { "admin" } else { "user" };
      println!("{} <{}> ({})", session.display_name(), session.email, role);
    }
    None => println!("Not logged in"),
  }
  Ok(())
}

/// Run one sync cycle and print the result. Returns whether tickets could be
/// shown.
pub async fn print_tickets<F: TicketFetcher>(
  sync: &TicketSynchronizer<F>,
  manual: bool,
) -> bool {
  if manual {
    sync.open();
    sync.refresh(RefreshTrigger::Manual).await;
  } else {
    sync.mount().await;
  }

  let state = sync.snapshot();
  if let Some(alert) = alert_to_print(&state, sync.take_alert()) {
    eprintln!("Error: {}", alert);
  }
  print!("{}", render_report(&state));
  sync.dismiss();

  state.is_ready()
}

/// A failed listing already reports the error itself.
fn alert_to_print(state: &SyncState, alert: Option<String>) -> Option<String> {
  match state.phase {
    SyncPhase::Failed { .. } => None,
    _ => alert,
  }
}

/// Plain-text rendering of the ticket list
pub fn render_report(state: &SyncState) -> String {
  let mut out = String::new();

  match &state.phase {
    SyncPhase::Loading => {
      let _ = writeln!(out, "Loading tickets...");
      return out;
    }
    SyncPhase::Failed { message } => {
      let _ = writeln!(out, "Error: {}", message);
      return out;
    }
    SyncPhase::Ready => {}
  }

  if let Some(banner) = offline_banner(state) {
    let _ = writeln!(out, "{}", banner);
  }

  if state.tickets.is_empty() {
    let _ = writeln!(out, "No tickets found");
    return out;
  }

  for ticket in &state.tickets {
    let _ = writeln!(
      out,
      "{:<12} {:<24} {} → {}",
      ticket.qr_payload(),
      ticket.train.name,
      ticket.start_station.name,
      ticket.end_station.name
    );
    let _ = writeln!(
      out,
      "{:<12} departure {}  arrival {}",
      "",
      or_dash(ticket.departure_time_at.as_deref()),
      or_dash(ticket.arrival_time_at.as_deref())
    );
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{sample_tickets, MemoryStore, ScriptedFetcher};
  use crate::tickets::store::LocalTicketStore;
  use std::sync::Arc;

  fn synchronizer(
    fetcher: Arc<ScriptedFetcher>,
  ) -> (LocalTicketStore, TicketSynchronizer<Arc<ScriptedFetcher>>) {
    let store = LocalTicketStore::new(Arc::new(MemoryStore::new()), "test");
    (store.clone(), TicketSynchronizer::new(fetcher, store))
  }

  #[test]
  fn test_report_lists_tickets() {
    let mut state = SyncState::new();
    state.apply_fetch(RefreshTrigger::Automatic, Ok(sample_tickets(&[7])), chrono::Utc::now());

    let report = render_report(&state);
    assert!(report.contains("ticket-7"));
    assert!(report.contains("Bratislava hl.st. → Zilina"));
    assert!(report.contains("departure 2025-05-02 08:00"));
    assert!(!report.contains("Offline Mode"));
  }

  #[test]
  fn test_report_failed() {
    let mut state = SyncState::new();
    state.apply_fetch(
      RefreshTrigger::Automatic,
      Err(crate::tickets::FetchError::Status { status: 500 }),
      chrono::Utc::now(),
    );
    assert!(render_report(&state).starts_with("Error: "));
  }

  #[tokio::test]
  async fn test_print_tickets_offline() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let (store, sync) = synchronizer(fetcher.clone());
    store.save(&sample_tickets(&[1]));
    fetcher.respond_err(502);

    assert!(print_tickets(&sync, false).await);
    assert_eq!(fetcher.calls(), 1);
  }

  #[tokio::test]
  async fn test_print_tickets_no_cache_fails() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let (_, sync) = synchronizer(fetcher.clone());
    fetcher.respond_err(502);

    assert!(!print_tickets(&sync, false).await);
  }

  #[tokio::test]
  async fn test_print_tickets_manual_uses_single_fetch() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let (store, sync) = synchronizer(fetcher.clone());
    fetcher.respond_ok(sample_tickets(&[1, 2]));

    assert!(print_tickets(&sync, true).await);
    assert_eq!(fetcher.calls(), 1);
    assert_eq!(store.load().unwrap().tickets.len(), 2);
  }

  #[tokio::test]
  async fn test_manual_failure_without_cache_reported_once() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let (_, sync) = synchronizer(fetcher.clone());
    fetcher.respond_err(502);

    sync.open();
    sync.refresh(RefreshTrigger::Manual).await;
    let state = sync.snapshot();

    assert_eq!(alert_to_print(&state, sync.take_alert()), None);
    assert_eq!(render_report(&state).matches("Error: ").count(), 1);
  }

  #[tokio::test]
  async fn test_manual_failure_with_cache_prints_alert() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let (store, sync) = synchronizer(fetcher.clone());
    store.save(&sample_tickets(&[1]));
    fetcher.respond_err(502);

    sync.open();
    sync.refresh(RefreshTrigger::Manual).await;
    let state = sync.snapshot();

    assert!(alert_to_print(&state, sync.take_alert()).is_some());
    assert!(!render_report(&state).contains("Error: "));
  }
}
