mod app;
mod commands;
mod config;
mod context;
mod event;
mod logging;
mod session;
mod storage;
mod sync;
#[cfg(test)]
mod test_support;
mod tickets;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "railpass")]
#[command(about = "Train tickets in the terminal, available offline")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/railpass/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Browse tickets interactively (default)
  Tui,
  /// Print tickets and exit
  Tickets {
    /// Require fresh data: report an error instead of falling back to the cache
    #[arg(long)]
    refresh: bool,
  },
  /// Store credentials for the backend
  Login {
    #[arg(long)]
    email: String,
    /// Access token issued by the backend
    #[arg(long, env = "RAILPASS_TOKEN")]
    token: String,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    admin: bool,
  },
  /// Forget credentials and cached tickets
  Logout,
  /// Show the stored user
  Whoami,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init();

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;
  let ctx = context::AppContext::open(config);

  match args.command.unwrap_or(Command::Tui) {
    Command::Tui => {
      let session = ctx.sessions().load();
      let sync = ctx.synchronizer(session.as_ref())?;

      // Initialize and run the app
      let mut app = app::App::new(sync, session.as_ref().map(|s| s.display_name()));
      app.run().await?;
    }
    Command::Tickets { refresh } => {
      let session = ctx.sessions().load();
      let sync = ctx.synchronizer(session.as_ref())?;
      if !commands::print_tickets(&sync, refresh).await {
        return Ok(ExitCode::FAILURE);
      }
    }
    Command::Login {
      email,
      token,
      first_name,
      last_name,
      admin,
    } => commands::login(
      &ctx,
      commands::Login {
        email,
        token,
        firstname: first_name,
        lastname: last_name,
        admin,
      },
    )?,
    Command::Logout => commands::logout(&ctx)?,
    Command::Whoami => commands::whoami(&ctx)?,
  }

  Ok(ExitCode::SUCCESS)
}
