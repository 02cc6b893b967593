mod components;
pub mod format;
mod views;

use crate::app::{App, ViewState};
use crate::tickets::TicketFetcher;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw<F: TicketFetcher + 'static>(frame: &mut Frame, app: &App<F>) {
  let state = app.tickets();
  let on_list = matches!(app.current_view(), Some(ViewState::TicketList { .. }));
  let banner = if on_list {
    format::offline_banner(state)
  } else {
    None
  };

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),                                    // Header
      Constraint::Length(if banner.is_some() { 1 } else { 0 }), // Offline banner
      Constraint::Min(1),                                       // Main content
      Constraint::Length(1),                                    // Status bar
    ])
    .split(frame.area());

  draw_header(frame, chunks[0], app.user_label());

  if let Some(text) = &banner {
    components::banner::draw_offline_banner(frame, chunks[1], text);
  }

  // Draw current view
  match app.current_view() {
    Some(ViewState::TicketList { selected }) => {
      views::tickets::draw_ticket_list(frame, chunks[2], state, *selected);
    }
    Some(ViewState::TicketDetail { ticket }) => {
      views::ticket_detail::draw_ticket_detail(frame, chunks[2], ticket);
    }
    None => {}
  }

  // Draw status bar
  draw_status_bar(frame, chunks[3], app);

  if let Some(message) = &state.alert {
    components::alert::draw_alert(frame, chunks[2], "Error", message);
  }
}

fn draw_header(frame: &mut Frame, area: Rect, user: Option<&str>) {
  let mut spans = vec![Span::styled(
    " railpass ",
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  )];
  if let Some(user) = user {
    spans.push(Span::raw(" "));
    spans.push(Span::styled(user, Style::default().fg(Color::Cyan)));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status_bar<F: TicketFetcher + 'static>(frame: &mut Frame, area: Rect, app: &App<F>) {
  let hint = match app.current_view() {
    _ if app.tickets().alert.is_some() => " Enter/Esc:dismiss  Ctrl-C:quit",
    Some(ViewState::TicketDetail { .. }) => " q/Esc:back  Ctrl-C:quit",
    _ => " j/k:nav  Enter:details  r:refresh  q:quit",
  };

  let paragraph = Paragraph::new(hint).style(Style::default().fg(Color::DarkGray));
  frame.render_widget(paragraph, area);
}
