//! Terminal rendering of session messages and agent tables.

use atf_protocol::agent_models::AgentDescriptor;
use atf_protocol::session_models::{MessageKind, SessionMessage};
use colored::{ColoredString, Colorize};

fn paint(text: &str, kind: MessageKind) -> ColoredString {
    match kind {
        MessageKind::Info => text.normal(),
        MessageKind::Success => text.green(),
        MessageKind::Warning => text.yellow(),
        MessageKind::Error => text.red().bold(),
        MessageKind::System => text.cyan().bold(),
    }
}

/// `[12:00:01] Agent name  text`
pub fn session_line(message: &SessionMessage) -> String {
    format!(
        "{} {}  {}",
        format!("[{}]", message.timestamp).dimmed(),
        message.agent_name.bold(),
        paint(&message.text, message.kind)
    )
}

/// One row of `atf agents`.
pub fn agent_row(step: Option<usize>, descriptor: &AgentDescriptor) -> String {
    let step = step.map_or_else(|| "-".to_string(), |n| n.to_string());
    let mut flags = Vec::new();
    if descriptor.checkpoint_after {
        flags.push("checkpoint");
    }
    if !descriptor.enabled {
        flags.push("disabled");
    }

    let row = format!(
        "{:>3}  {:<38} {}",
        step,
        descriptor.name,
        flags.join(", ")
    );
    if descriptor.enabled {
        row.normal().to_string()
    } else {
        row.dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_line_contains_fields() {
        colored::control::set_override(false);
        let message = SessionMessage::new("Workflow stopped by user", MessageKind::Warning, "ATF Workflow");
        let line = session_line(&message);
        assert!(line.contains("ATF Workflow"));
        assert!(line.ends_with("Workflow stopped by user"));
        assert!(line.starts_with(&format!("[{}]", message.timestamp)));
    }

    #[test]
    fn test_agent_row_flags() {
        colored::control::set_override(false);
        let descriptor = AgentDescriptor::new(4, "Test Data Generation Agent").with_checkpoint(true);
        let row = agent_row(Some(4), &descriptor);
        assert!(row.trim_start().starts_with('4'));
        assert!(row.ends_with("checkpoint"));

        let disabled = AgentDescriptor::new(6, "Automation Execution Agent").with_enabled(false);
        assert!(agent_row(None, &disabled).contains("-  Automation Execution Agent"));
    }
}
