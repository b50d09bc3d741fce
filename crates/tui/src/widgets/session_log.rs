//! Scrolling view of the session log.
//!
//! The view follows the tail while new messages arrive. Scrolling up pins it
//! to the current position until the user scrolls back to the bottom.

use atf_protocol::session_models::{MessageKind, SessionLog, SessionMessage};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

fn kind_style(kind: MessageKind) -> Style {
    match kind {
        MessageKind::Info => Style::default(),
        MessageKind::Success => Style::default().fg(Color::Green),
        MessageKind::Warning => Style::default().fg(Color::Yellow),
        MessageKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        MessageKind::System => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    }
}

fn message_line(message: &SessionMessage) -> Line<'_> {
    Line::from(vec![
        Span::styled(
            format!("[{}] ", message.timestamp),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{}: ", message.agent_name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(message.text.as_str(), kind_style(message.kind)),
    ])
}

#[derive(Debug, Clone)]
pub struct SessionLogView {
    /// Lines scrolled from the top.
    pub scroll_offset: usize,
    follow: bool,
    /// Largest offset seen at the last render.
    max_offset: usize,
}

impl Default for SessionLogView {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLogView {
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            follow: true,
            max_offset: 0,
        }
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, log: &SessionLog) {
        let block = Block::default().borders(Borders::ALL).title("Session Log");

        let total = log.len();
        let visible = area.height.saturating_sub(2) as usize;
        self.max_offset = total.saturating_sub(visible);
        if self.follow {
            self.scroll_offset = self.max_offset;
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_offset);
        }

        let paragraph = if log.is_empty() {
            Paragraph::new("Select a file and press Enter to start the workflow.")
                .style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(log.iter().map(message_line).collect::<Vec<_>>())
        };
        frame.render_widget(
            paragraph
                .block(block)
                .scroll((self.scroll_offset.min(u16::MAX as usize) as u16, 0)),
            area,
        );

        if total > visible {
            let mut state = ScrollbarState::default()
                .content_length(total)
                .viewport_content_length(visible)
                .position(self.scroll_offset);
            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));
            frame.render_stateful_widget(scrollbar, area, &mut state);
        }
    }

    pub fn scroll_up(&mut self) {
        self.page_up(1);
    }

    pub fn scroll_down(&mut self) {
        self.page_down(1);
    }

    pub fn page_up(&mut self, lines: usize) {
        self.follow = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn page_down(&mut self, lines: usize) {
        self.scroll_offset = (self.scroll_offset + lines).min(self.max_offset);
        self.follow = self.scroll_offset >= self.max_offset;
    }

    /// Back to following the newest message.
    pub fn follow_tail(&mut self) {
        self.follow = true;
        self.scroll_offset = self.max_offset;
    }
}
