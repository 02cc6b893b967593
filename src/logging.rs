use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `railpass=debug`)
const LOG_ENV: &str = "RAILPASS_LOG";

/// Log to a daily file in the data directory; the terminal belongs to the UI.
///
/// The returned guard flushes pending lines when dropped. Without a usable
/// log directory the program runs unlogged.
pub fn init() -> Option<WorkerGuard> {
  match log_dir().and_then(|dir| init_in(&dir)) {
    Ok(guard) => Some(guard),
    Err(e) => {
      eprintln!("Warning: logging disabled: {}", e);
      None
    }
  }
}

fn init_in(dir: &Path) -> Result<WorkerGuard> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(dir, "railpass.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}

fn log_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("railpass").join("logs"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unusable_log_dir_is_an_error() {
    let err = init_in(Path::new("/dev/null/railpass/logs")).unwrap_err();
    assert!(err.to_string().contains("Failed to create log directory"));
  }
}
