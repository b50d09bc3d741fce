//! Chat pane: the conversation with the assistant about the current file.

use atf_protocol::chat_models::{ChatMessage, ChatRole};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

fn chat_line(message: &ChatMessage) -> Line<'_> {
    let (who, who_style) = match message.role {
        ChatRole::User => ("You", Style::default().fg(Color::Cyan)),
        ChatRole::Assistant => ("Assistant", Style::default().fg(Color::Magenta)),
    };
    let body = if message.is_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{who}: "), who_style.add_modifier(Modifier::BOLD)),
        Span::styled(message.content.as_str(), body),
    ])
}

/// Render `messages`, keeping the newest ones in view.
pub fn render_chat(frame: &mut Frame, area: Rect, messages: &[ChatMessage], waiting: bool) {
    let title = if waiting { "Chat (waiting for reply...)" } else { "Chat" };
    let block = Block::default().borders(Borders::ALL).title(title);

    let mut lines: Vec<Line> = messages.iter().map(chat_line).collect();
    if lines.is_empty() {
        lines.push(Line::styled(
            "Ask about the generated results with Tab, then Enter.",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let visible = area.height.saturating_sub(2) as usize;
    let offset = lines.len().saturating_sub(visible);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((offset.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}
