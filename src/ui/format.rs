use chrono::{DateTime, Local, Utc};

use crate::sync::SyncState;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Human-readable last-sync time in local time
pub fn format_sync_time(synced_at: Option<DateTime<Utc>>) -> String {
  match synced_at {
    Some(at) => at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    None => "Never".to_string(),
  }
}

/// Offline banner text, when the list is showing cached data
pub fn offline_banner(state: &SyncState) -> Option<String> {
  if state.is_ready() && state.is_stale {
    Some(format!(
      "Offline Mode • Last synced: {}",
      format_sync_time(state.last_synced_at)
    ))
  } else {
    None
  }
}

pub fn or_dash(value: Option<&str>) -> &str {
  value.filter(|v| !v.is_empty()).unwrap_or("-")
}
