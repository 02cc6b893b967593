use crate::event::{Event, EventHandler};
use crate::sync::{RefreshTrigger, SyncState, TicketSynchronizer};
use crate::tickets::types::Ticket;
use crate::tickets::TicketFetcher;
use crate::ui;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// View state - each variant owns its data
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
  /// Root view, backed by the synchronizer
  TicketList { selected: usize },

  /// Detail view (pushed via Enter)
  TicketDetail { ticket: Box<Ticket> },
}

/// Main application state
pub struct App<F: TicketFetcher + 'static> {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<ViewState>,

  /// Ticket list synchronizer
  sync: Arc<TicketSynchronizer<F>>,

  /// Latest ticket list state
  tickets: SyncState,

  /// Header label for the logged-in user
  user_label: Option<String>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl<F: TicketFetcher + 'static> App<F> {
  pub fn new(sync: TicketSynchronizer<F>, user_label: Option<String>) -> Self {
    let (tx, _rx) = mpsc::unbounded_channel();
    let tickets = sync.snapshot();

    Self {
      view_stack: vec![ViewState::TicketList { selected: 0 }],
      sync: Arc::new(sync),
      tickets,
      user_label,
      event_tx: tx,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create event handler
    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();
    self.forward_sync_changes();

    self.mount_ticket_list();

    // Main loop
    let result = async {
      while !self.should_quit {
        // Draw UI
        terminal.draw(|frame| ui::draw(frame, self))?;

        // Handle events
        if let Some(event) = events.next().await {
          self.handle_event(event);
        }
      }
      Ok::<_, color_eyre::Report>(())
    }
    .await;

    self.sync.dismiss();

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  /// Turn synchronizer state changes into redraw events
  fn forward_sync_changes(&self) {
    let mut rx = self.sync.subscribe();
    let tx = self.event_tx.clone();

    tokio::spawn(async move {
      while rx.changed().await.is_ok() {
        if tx.send(Event::Sync).is_err() {
          break;
        }
      }
    });
  }

  fn mount_ticket_list(&self) {
    let sync = self.sync.clone();
    tokio::spawn(async move {
      let outcome = sync.mount().await;
      debug!("Ticket list mount finished: {:?}", outcome);
    });
  }

  fn refresh_ticket_list(&self) {
    let sync = self.sync.clone();
    tokio::spawn(async move {
      let outcome = sync.refresh(RefreshTrigger::Manual).await;
      debug!("Manual refresh finished: {:?}", outcome);
    });
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {} // UI refresh happens automatically
      Event::Sync => self.on_sync_changed(),
    }
  }

  fn on_sync_changed(&mut self) {
    self.tickets = self.sync.snapshot();

    // Keep the selection inside the (possibly shorter) new list
    let last = self.tickets.tickets.len().saturating_sub(1);
    if let Some(ViewState::TicketList { selected }) = self.view_stack.first_mut() {
      *selected = (*selected).min(last);
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // A pending alert swallows input until dismissed
    if self.tickets.alert.is_some() {
      if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
        self.sync.take_alert();
        self.tickets.alert = None;
      }
      return;
    }

    let ticket_count = self.tickets.tickets.len();
    match self.view_stack.last_mut() {
      Some(ViewState::TicketList { selected }) => match key.code {
        KeyCode::Char('q') => self.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => {
          if *selected + 1 < ticket_count {
            *selected += 1;
          }
        }
        KeyCode::Char('k') | KeyCode::Up => {
          *selected = selected.saturating_sub(1);
        }
        KeyCode::Char('r') => self.refresh_ticket_list(),
        KeyCode::Enter => {
          let index = *selected;
          if let Some(ticket) = self.tickets.tickets.get(index).cloned() {
            self.sync.dismiss();
            self.view_stack.push(ViewState::TicketDetail {
              ticket: Box::new(ticket),
            });
          }
        }
        _ => {}
      },
      Some(ViewState::TicketDetail { .. }) => {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
          self.view_stack.pop();
          self.mount_ticket_list();
        }
      }
      None => {}
    }
  }

  pub fn current_view(&self) -> Option<&ViewState> {
    self.view_stack.last()
  }

  pub fn tickets(&self) -> &SyncState {
    &self.tickets
  }

  pub fn user_label(&self) -> Option<&str> {
    self.user_label.as_deref()
  }
}
