use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// Modal alert centered over `area`
pub fn draw_alert(frame: &mut Frame, area: Rect, title: &str, message: &str) {
  let popup = popup_area(area);

  // Clear the area behind the popup
  frame.render_widget(Clear, popup);

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red))
    .title(format!(" {} ", title));

  let text = vec![
    Line::raw(message),
    Line::raw(""),
    Line::styled("Press Enter or Esc to dismiss", Style::default().fg(Color::DarkGray)),
  ];

  let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
  frame.render_widget(paragraph, popup);
}

/// 60% of the width, kept between 30 and 70 columns
fn popup_area(area: Rect) -> Rect {
  let width = u16::try_from(u32::from(area.width) * 60 / 100).unwrap_or(area.width);
  let width = width.clamp(30.min(area.width), 70.min(area.width));
  let height = 7.min(area.height);
  let x = area.x + area.width.saturating_sub(width) / 2;
  let y = area.y + area.height.saturating_sub(height) / 2;
  Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_popup_on_very_wide_terminal() {
    let popup = popup_area(Rect::new(0, 0, 2000, 50));
    assert_eq!(popup.width, 70);
    assert_eq!(popup.x, 965);
  }

  #[test]
  fn test_popup_fits_narrow_terminal() {
    let popup = popup_area(Rect::new(0, 0, 20, 5));
    assert_eq!(popup.width, 20);
    assert_eq!(popup.height, 5);
  }
}
