//! Confirmation popup shown while the workflow waits at a checkpoint.

use atf_protocol::gate_models::GateRequest;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

/// A `percent_x` by `percent_y` rectangle centered in `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(rows[1])[1]
}

pub fn render_gate_popup(frame: &mut Frame, area: Rect, request: &GateRequest) {
    let popup = centered_rect(60, 30, area);

    let text = vec![
        Line::from(request.prompt.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw("Proceed    "),
            Span::styled("[n] ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw("Stop"),
        ]),
    ];

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Confirmation")
            .border_style(Style::default().fg(Color::Yellow))
            .style(Style::default().bg(Color::Black)),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(60, 30, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.x, 20);
        assert!(inner.y > 0 && inner.bottom() < outer.bottom());
    }

    #[test]
    fn test_popup_shows_prompt_and_choices() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let request = GateRequest::new(4, "Proceed with the next agents?");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_gate_popup(frame, area, &request);
            })
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(content.contains("Confirmation"));
        assert!(content.contains("Proceed with the next agents?"));
        assert!(content.contains("[y] Proceed"));
        assert!(content.contains("[n] Stop"));
    }
}
