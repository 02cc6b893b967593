use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// One-line banner shown while the ticket list is served from the cache
pub fn draw_offline_banner(frame: &mut Frame, area: Rect, text: &str) {
  let line = Line::from(vec![
    Span::raw(" "),
    Span::raw(text),
    Span::raw("  "),
    Span::styled(
      "[r] Refresh",
      Style::default().add_modifier(Modifier::BOLD),
    ),
  ]);

  let paragraph =
    Paragraph::new(line).style(Style::default().fg(Color::White).bg(Color::Red));
  frame.render_widget(paragraph, area);
}
