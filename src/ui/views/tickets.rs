use crate::sync::{SyncPhase, SyncState};
use crate::ui::format::{or_dash, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

pub fn draw_ticket_list(frame: &mut Frame, area: Rect, state: &SyncState, selected: usize) {
  let title = match (&state.phase, state.refreshing) {
    (SyncPhase::Loading, _) => " Tickets (loading...) ".to_string(),
    (_, true) => format!(" Tickets ({}) (refreshing...) ", state.tickets.len()),
    _ => format!(" Tickets ({}) ", state.tickets.len()),
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  match &state.phase {
    SyncPhase::Loading => {
      let paragraph = Paragraph::new("Loading tickets...")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }
    SyncPhase::Failed { message } => {
      let paragraph = Paragraph::new(format!("{}\n\nPress 'r' to retry.", message))
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, area);
      return;
    }
    SyncPhase::Ready => {}
  }

  if state.tickets.is_empty() {
    let paragraph = Paragraph::new("No tickets found")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = state
    .tickets
    .iter()
    .map(|ticket| {
      let lines = vec![
        Line::from(vec![
          Span::styled(
            truncate(&ticket.train.name, 30),
            Style::default()
              .fg(Color::Cyan)
              .add_modifier(Modifier::BOLD),
          ),
          Span::raw("  "),
          Span::styled(ticket.qr_payload(), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
          Span::raw("  "),
          Span::raw(truncate(&ticket.start_station.name, 30)),
          Span::styled(" → ", Style::default().fg(Color::Yellow)),
          Span::raw(truncate(&ticket.end_station.name, 30)),
        ]),
        Line::from(vec![
          Span::styled("  Departure: ", Style::default().fg(Color::DarkGray)),
          Span::raw(or_dash(ticket.departure_time_at.as_deref()).to_string()),
          Span::styled("  Arrival: ", Style::default().fg(Color::DarkGray)),
          Span::raw(or_dash(ticket.arrival_time_at.as_deref()).to_string()),
        ]),
      ];
      ListItem::new(lines)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut list_state = ListState::default();
  list_state.select(Some(selected));

  frame.render_stateful_widget(list, area, &mut list_state);
}
