//! TUI application state and event loop.
//!
//! `App` owns what the screen shows: the agent table, the session log of the
//! current run, the chat and the two input fields. Core events arrive on
//! `event_rx` and user actions leave as `Op`s on `op_tx`; both are driven by
//! one `tokio::select!` loop.

use anyhow::Result;
use atf_core::config::AppConfig;
use atf_protocol::agent_models::AgentDescriptor;
use atf_protocol::chat_models::ChatMessage;
use atf_protocol::config_models::GlobalConfig;
use atf_protocol::gate_models::GateRequest;
use atf_protocol::ipc::{Event, Op};
use atf_protocol::run_models::RunStatus;
use atf_protocol::session_models::SessionLog;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::select;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_stream::StreamExt;
use uuid::Uuid;

use crate::event_handler;
use crate::tui::{Tui, TuiEvent};
use crate::widgets::chat::render_chat;
use crate::widgets::gate_popup::render_gate_popup;
use crate::widgets::pipeline::render_pipeline;
use crate::widgets::{Composer, SessionLogView};

/// What the UI knows about the current run and the chat.
#[derive(Debug, Clone, Default)]
pub struct WorkflowView {
    pub run_id: Option<Uuid>,
    pub input: Option<String>,
    pub status: RunStatus,
    pub current_agent_id: Option<u32>,
    pub completed_agent_ids: Vec<u32>,
    pub log: SessionLog,
    pub pending_gate: Option<GateRequest>,
    pub error: Option<String>,
    pub chat: Vec<ChatMessage>,
    pub chat_waiting: bool,
    /// Last rejected operation, shown in the status bar.
    pub notice: Option<String>,
}

impl WorkflowView {
    /// Forget the run; the chat survives.
    pub fn clear_run(&mut self) {
        *self = Self {
            chat: std::mem::take(&mut self.chat),
            chat_waiting: self.chat_waiting,
            ..Self::default()
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    File,
    Chat,
}

#[derive(Debug, Clone)]
pub struct InputState {
    pub focus: Focus,
    pub file: Composer,
    pub chat: Composer,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            focus: Focus::File,
            file: Composer::new("File (Enter to run)"),
            chat: Composer::new("Chat (Enter to send)"),
        }
    }
}

impl InputState {
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::File => Focus::Chat,
            Focus::Chat => Focus::File,
        };
    }

    pub fn focused(&self) -> &Composer {
        match self.focus {
            Focus::File => &self.file,
            Focus::Chat => &self.chat,
        }
    }

    pub fn focused_mut(&mut self) -> &mut Composer {
        match self.focus {
            Focus::File => &mut self.file,
            Focus::Chat => &mut self.chat,
        }
    }
}

/// Main TUI application state.
pub struct App {
    pub descriptors: Vec<AgentDescriptor>,
    pub settings: GlobalConfig,
    pub view: WorkflowView,
    pub input: InputState,
    pub log_view: SessionLogView,
    /// Backend output directory, when the backend answered at startup.
    pub output_path: Option<String>,
    /// Channel to send operations to the core.
    pub op_tx: UnboundedSender<Op>,
    /// Channel to receive events from the core.
    pub event_rx: UnboundedReceiver<Event>,
    /// Flag to indicate if the application should exit.
    pub should_exit: bool,
}

impl App {
    pub fn new(
        config: AppConfig,
        op_tx: UnboundedSender<Op>,
        event_rx: UnboundedReceiver<Event>,
    ) -> Self {
        Self {
            descriptors: config.agents,
            settings: config.global,
            view: WorkflowView::default(),
            input: InputState::default(),
            log_view: SessionLogView::new(),
            output_path: None,
            op_tx,
            event_rx,
            should_exit: false,
        }
    }

    pub fn with_output_path(mut self, output_path: Option<String>) -> Self {
        self.output_path = output_path;
        self
    }

    /// Main event loop.
    ///
    /// Uses `tokio::select!` to handle keyboard input and core events concurrently.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut tui_events = tui.event_stream();

        tui.frame_requester().schedule_frame();

        while !self.should_exit {
            select! {
                Some(event) = self.event_rx.recv() => {
                    self.handle_core_event(event);
                    tui.frame_requester().schedule_frame();
                }
                Some(tui_event) = tui_events.next() => {
                    self.handle_tui_event(tui, tui_event)?;
                }
                else => break,
            }
        }

        Ok(())
    }

    fn handle_core_event(&mut self, event: Event) {
        event_handler::handle_core_event(&mut self.view, event);
    }

    fn handle_tui_event(&mut self, tui: &mut Tui, event: TuiEvent) -> Result<()> {
        match event {
            TuiEvent::Key(key_event) => {
                self.handle_key_event(key_event);
                tui.frame_requester().schedule_frame();
            }
            TuiEvent::Paste(text) => {
                if self.view.pending_gate.is_none() {
                    self.input.focused_mut().insert_str(&text);
                    tui.frame_requester().schedule_frame();
                }
            }
            TuiEvent::Draw => {
                tui.draw(|frame| self.render(frame))?;
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        self.should_exit = event_handler::handle_keyboard_event(
            key_event,
            &mut self.input,
            &mut self.log_view,
            &mut self.view,
            &self.op_tx,
        );
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(8),    // Agents + session log
                Constraint::Length(8), // Chat
                Constraint::Length(3), // Inputs
            ])
            .split(frame.area());

        self.render_status_bar(frame, chunks[0]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1]);
        render_pipeline(
            frame,
            middle[0],
            &self.descriptors,
            self.settings.step_numbering,
            &self.view,
        );
        self.log_view.render(frame, middle[1], &self.view.log);

        render_chat(frame, chunks[2], &self.view.chat, self.view.chat_waiting);

        let inputs = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[3]);
        let focus = self.input.focus;
        self.input
            .file
            .render(inputs[0], frame.buffer_mut(), focus == Focus::File);
        self.input
            .chat
            .render(inputs[1], frame.buffer_mut(), focus == Focus::Chat);

        if let Some(request) = &self.view.pending_gate {
            let area = frame.area();
            render_gate_popup(frame, area, request);
        } else {
            let area = if focus == Focus::File { inputs[0] } else { inputs[1] };
            frame.set_cursor_position(self.input.focused().cursor_position(area));
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_style = match self.view.status {
            RunStatus::Idle => Style::default().fg(Color::Gray),
            RunStatus::Running => Style::default().fg(Color::Yellow),
            RunStatus::AwaitingGate => Style::default().fg(Color::Magenta),
            RunStatus::Completed => Style::default().fg(Color::Green),
            RunStatus::Aborted => Style::default().fg(Color::DarkGray),
            RunStatus::Failed => Style::default().fg(Color::Red),
        };

        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.settings.workflow_name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("{:?}", self.view.status), status_style),
        ];
        if let Some(input) = &self.view.input {
            spans.push(Span::raw(format!(" | {input}")));
        }
        if let Some(path) = &self.output_path {
            spans.push(Span::styled(
                format!(" | output: {path}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if let Some(notice) = self.view.notice.as_ref().or(self.view.error.as_ref()) {
            spans.push(Span::styled(format!(" | {notice}"), Style::default().fg(Color::Red)));
        }
        spans.push(Span::styled(
            " | Tab switch  Ctrl+R reset  Esc quit",
            Style::default().fg(Color::DarkGray),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
