use crate::tickets::types::Ticket;
use crate::ui::format::or_dash;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Ticket detail: QR payload, train and its route as a timeline
pub fn draw_ticket_detail(frame: &mut Frame, area: Rect, ticket: &Ticket) {
  let block = Block::default()
    .title(format!(" {} ", ticket.train.name))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  let inner = block.inner(area);
  frame.render_widget(block, area);

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(4), // Header
      Constraint::Length(1), // Separator
      Constraint::Min(1),    // Route
    ])
    .split(inner);

  let label = Style::default().fg(Color::DarkGray);
  let header = vec![
    Line::from(vec![
      Span::styled("Ticket: ", label),
      Span::styled(ticket.qr_payload(), Style::default().fg(Color::Cyan)),
      Span::styled("  Purchased: ", label),
      Span::raw(or_dash(ticket.purchased_at.as_deref()).to_string()),
    ]),
    Line::from(vec![
      Span::styled("From: ", label),
      Span::raw(ticket.start_station.name.as_str()),
      Span::styled("  To: ", label),
      Span::raw(ticket.end_station.name.as_str()),
    ]),
    Line::from(vec![
      Span::styled("Departure: ", label),
      Span::raw(or_dash(ticket.departure_time_at.as_deref()).to_string()),
      Span::styled("  Arrival: ", label),
      Span::raw(or_dash(ticket.arrival_time_at.as_deref()).to_string()),
    ]),
  ];
  frame.render_widget(Paragraph::new(header), chunks[0]);

  let sep = Paragraph::new("─".repeat(chunks[1].width as usize)).style(label);
  frame.render_widget(sep, chunks[1]);

  frame.render_widget(Paragraph::new(route_lines(ticket)), chunks[2]);
}

/// One line per stop; the first and last stops are highlighted
fn route_lines(ticket: &Ticket) -> Vec<Line<'_>> {
  let stops = &ticket.train.routes;
  if stops.is_empty() {
    return vec![Line::styled(
      "No route information",
      Style::default().fg(Color::DarkGray),
    )];
  }

  let last = stops.len() - 1;
  stops
    .iter()
    .enumerate()
    .map(|(index, stop)| {
      let (marker, color) = match index {
        0 => ("●", Color::Yellow),
        i if i == last => ("●", Color::Red),
        _ => ("○", Color::Yellow),
      };
      Line::from(vec![
        Span::styled(format!("{} ", marker), Style::default().fg(color)),
        Span::styled(
          format!("{:<30}", stop.station_name),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
          or_dash(stop.departure_time.as_deref()).to_string(),
          Style::default().fg(Color::DarkGray),
        ),
      ])
    })
    .collect()
}
