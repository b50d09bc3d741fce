//! Single-line text input used for the file name and the chat message.

use crate::event::EventStatus;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

const PROMPT: &str = "> ";

/// Editable line with a cursor.
#[derive(Debug, Clone)]
pub struct Composer {
    title: String,
    input: String,
    /// Cursor position in characters, not bytes.
    cursor: usize,
}

impl Composer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            input: String::new(),
            cursor: 0,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map_or(self.input.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.input.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.insert_char(c);
        }
    }

    /// Backspace.
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.input.remove(at);
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Return the text and empty the field.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    /// Editing keys only; Enter, Tab and Esc are left to the app.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> EventStatus {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return EventStatus::NotConsumed;
        }
        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.delete_char(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            _ => return EventStatus::NotConsumed,
        }
        EventStatus::Consumed
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, focused: bool) {
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(self.title.as_str());

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(format!("{PROMPT}{}", self.input))
            .style(Style::default().fg(if focused { Color::Yellow } else { Color::Gray }))
            .render(inner, buf);
    }

    /// Terminal cursor position for this field rendered in `area`.
    pub fn cursor_position(&self, area: Rect) -> Position {
        let offset = (PROMPT.len() + self.cursor) as u16;
        let max_x = area.right().saturating_sub(2);
        Position::new((area.x + 1 + offset).min(max_x), area.y + 1)
    }
}
