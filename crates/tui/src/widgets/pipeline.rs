//! Pipeline table: one row per agent with its step number and status.

use crate::app::WorkflowView;
use atf_core::agents::step_number;
use atf_protocol::agent_models::AgentDescriptor;
use atf_protocol::config_models::StepNumbering;
use atf_protocol::run_models::RunStatus;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Disabled,
    Pending,
    Running,
    Completed,
    Failed,
}

impl AgentStatus {
    fn label(self) -> &'static str {
        match self {
            AgentStatus::Disabled => "Disabled",
            AgentStatus::Pending => "Pending",
            AgentStatus::Running => "Running",
            AgentStatus::Completed => "Completed",
            AgentStatus::Failed => "Failed",
        }
    }

    fn style(self) -> Style {
        match self {
            AgentStatus::Disabled => Style::default().fg(Color::DarkGray),
            AgentStatus::Pending => Style::default().fg(Color::Gray),
            AgentStatus::Running => Style::default().fg(Color::Yellow),
            AgentStatus::Completed => Style::default().fg(Color::Green),
            AgentStatus::Failed => Style::default().fg(Color::Red),
        }
    }
}

pub fn agent_status(descriptor: &AgentDescriptor, view: &WorkflowView) -> AgentStatus {
    if !descriptor.enabled {
        return AgentStatus::Disabled;
    }
    if view.completed_agent_ids.contains(&descriptor.id) {
        return AgentStatus::Completed;
    }
    if view.current_agent_id != Some(descriptor.id) {
        return AgentStatus::Pending;
    }
    match view.status {
        RunStatus::Running | RunStatus::AwaitingGate => AgentStatus::Running,
        RunStatus::Failed => AgentStatus::Failed,
        _ => AgentStatus::Pending,
    }
}

/// Render the agents in `descriptors` order, highlighting the current one.
pub fn render_pipeline(
    frame: &mut Frame,
    area: Rect,
    descriptors: &[AgentDescriptor],
    numbering: StepNumbering,
    view: &WorkflowView,
) {
    let rows: Vec<Row> = descriptors
        .iter()
        .map(|descriptor| {
            let step = step_number(descriptors, descriptor.id, numbering)
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            let status = agent_status(descriptor, view);
            Row::new(vec![
                Cell::from(step),
                Cell::from(descriptor.name.as_str()),
                Cell::from(status.label()).style(status.style()),
            ])
            .style(if descriptor.enabled {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            })
        })
        .collect();

    let header = Row::new(vec![Cell::from("Step"), Cell::from("Agent"), Cell::from("Status")])
        .style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Agents"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if view.status.is_active() {
        state.select(
            view.current_agent_id
                .and_then(|id| descriptors.iter().position(|d| d.id == id)),
        );
    }

    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use atf_core::agents::catalog::default_descriptors;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered(descriptors: &[AgentDescriptor], numbering: StepNumbering, view: &WorkflowView) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(70, 12)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_pipeline(frame, area, descriptors, numbering, view);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    fn step_of<'a>(lines: &'a [String], name: &str) -> &'a str {
        let line = lines.iter().find(|l| l.contains(name)).unwrap();
        line.trim_start_matches('│').split_whitespace().next().unwrap()
    }

    #[test]
    fn test_statuses_follow_the_run() {
        let descriptors = default_descriptors();
        let view = WorkflowView {
            status: RunStatus::Running,
            current_agent_id: Some(3),
            completed_agent_ids: vec![1, 2],
            ..WorkflowView::default()
        };

        assert_eq!(agent_status(&descriptors[0], &view), AgentStatus::Completed);
        assert_eq!(agent_status(&descriptors[2], &view), AgentStatus::Running);
        assert_eq!(agent_status(&descriptors[3], &view), AgentStatus::Pending);

        let failed = WorkflowView {
            status: RunStatus::Failed,
            ..view
        };
        assert_eq!(agent_status(&descriptors[2], &failed), AgentStatus::Failed);
    }

    #[test]
    fn test_disabled_agent_is_marked() {
        let mut descriptors = default_descriptors();
        descriptors[4].enabled = false;
        let view = WorkflowView::default();

        assert_eq!(agent_status(&descriptors[4], &view), AgentStatus::Disabled);
        let lines = rendered(&descriptors, StepNumbering::Descriptor, &view);
        let row = lines.iter().find(|l| l.contains("Automation Design Agent")).unwrap();
        assert!(row.contains("Disabled"));
    }

    #[test]
    fn test_step_numbers_follow_policy() {
        let mut descriptors = default_descriptors();
        descriptors.truncate(3);
        descriptors[0].enabled = false;
        let view = WorkflowView::default();

        let by_descriptor = rendered(&descriptors, StepNumbering::Descriptor, &view);
        assert_eq!(step_of(&by_descriptor, "Test Case Generation Agent"), "3");

        let by_enabled = rendered(&descriptors, StepNumbering::Enabled, &view);
        assert_eq!(step_of(&by_enabled, "Test Case Generation Agent"), "2");
        assert_eq!(step_of(&by_enabled, "Requirement Analysis Agent"), "-");
    }
}
