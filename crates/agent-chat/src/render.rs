//! Text rendering of the chat state for the terminal.
//!
//! Every function returns the text to print, colored with ANSI escapes.

use std::fmt::Write as _;

use agent_chat_core::agents::{AGENTS, AgentProfile};
use agent_chat_core::conversation::{Message, Role, ThinkingStep, Trace};
use agent_chat_core::trace::format_percent;
use agent_chat_core::{ConversationSummary, HealthStatus};
use owo_colors::OwoColorize;

use crate::command::HELP;

/// The bar drawn in front of each message.
pub const BAR_CHAR: &str = "▎";

/// Renders a message of the conversation.
pub fn message(msg: &Message) -> String {
    match msg.role() {
        Role::User => {
            format!("{}🧑 {}", BAR_CHAR.bright_green(), msg.content())
        }
        Role::Assistant => {
            let mut out = format!("{}🤖 ", BAR_CHAR.bright_cyan());
            if let Some(agent) = msg.agent() {
                out.push_str(&badge(agent));
            }
            if let Some(confidence) = msg.confidence().filter(|c| *c > 0.0) {
                let confident =
                    format!("{} confident", format_percent(confidence));
                let _ = write!(out, " {}", confident.dimmed());
            }
            out.push('\n');
            let bar = BAR_CHAR.bright_cyan();
            for line in msg.content().lines() {
                let _ = writeln!(out, "{bar}{}", line.bright_white());
            }
            out.pop();
            out
        }
    }
}

/// Renders the agent name in its accent color.
///
/// Agents missing from the roster keep the reported name and take the
/// general agent's color.
pub fn badge(agent: &str) -> String {
    let label = match AgentProfile::find(agent) {
        Some(profile) => format!("[{}]", profile.name),
        None => format!("[{agent}]"),
    };
    let (r, g, b) = AgentProfile::resolve(agent).accent;
    label.truecolor(r, g, b).bold().to_string()
}

/// Renders a progress step on a single line.
pub fn step(step: &ThinkingStep) -> String {
    let mut out = if step.done {
        format!("{} {}", "✓".green(), step.step)
    } else {
        step.step.clone()
    };
    if let Some(detail) = &step.detail {
        let _ = write!(out, " {}", format!("({detail})").dimmed());
    }
    out
}

/// Renders the trace panel of an answer.
pub fn trace(trace: &Trace) -> String {
    let panel = trace.panel();
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Agent Reasoning Trace".bold());
    let _ = writeln!(
        out,
        "  {} {}",
        "Reasoning:".dimmed(),
        panel.reasoning.unwrap_or("-")
    );
    if let Some(processing_time) = &panel.processing_time {
        let label = "Processing time:".dimmed();
        let _ = writeln!(out, "  {label} {processing_time}");
    }
    if let Some(iterations) = panel.iterations {
        let _ = writeln!(out, "  {} {iterations}", "Iterations:".dimmed());
    }
    if !panel.routing.is_empty() {
        let _ = writeln!(out, "  {}", "Routing:".dimmed());
        for step in &trace.routing {
            out.push_str("    ");
            if let Some(iteration) = step.iteration {
                let _ = write!(out, "{iteration}. ");
            }
            out.push_str(&badge(&step.agent));
            if let Some(action) = &step.action {
                let _ = write!(out, " {action}");
            }
            let _ = writeln!(out, " {}", format_percent(step.confidence));
        }
    }
    out.pop();
    out
}

/// Renders the numbered conversation list, marking the active one.
pub fn conversations(
    conversations: &[ConversationSummary],
    current: Option<&str>,
) -> String {
    if conversations.is_empty() {
        return "No conversations yet.".dimmed().to_string();
    }
    let mut out = String::new();
    for (index, conversation) in conversations.iter().enumerate() {
        let marker = if current == Some(conversation.id.as_str()) {
            "*"
        } else {
            " "
        };
        let title = if conversation.title.is_empty() {
            "Untitled"
        } else {
            conversation.title.as_str()
        };
        let _ = write!(out, "{marker}{:>3}. {}", index + 1, title.bold());
        if let Some(count) = conversation.message_count {
            let _ = write!(out, " {}", format!("({count} messages)").dimmed());
        }
        out.push('\n');
    }
    out.pop();
    out
}

/// Renders the agent roster.
pub fn roster() -> String {
    let mut out = String::new();
    for agent in AGENTS {
        let _ = writeln!(out, "{} {}", badge(agent.id), agent.description);
        let specialties = agent.specialties.join(", ");
        let _ = writeln!(out, "    {}", specialties.dimmed());
    }
    out.pop();
    out
}

/// Renders the backend status report.
pub fn health(status: &HealthStatus) -> String {
    let healthy = status.status.eq_ignore_ascii_case("healthy");
    let headline = if healthy {
        status.status.bright_green().to_string()
    } else {
        status.status.bright_red().to_string()
    };
    format!(
        "{} {headline}\n  {} {}\n  {} {}\n  {} {}",
        "Backend:".bold(),
        "Model:".dimmed(),
        status.model,
        "Vector store:".dimmed(),
        status.vector_store,
        "API base:".dimmed(),
        status.api_base,
    )
}

/// Renders the command help.
pub fn help() -> String {
    let mut out = String::new();
    for (usage, description) in HELP {
        let usage = format!("{usage:<20}");
        let _ = writeln!(out, "  {} {description}", usage.bold());
    }
    let hint = "Anything else is sent as a message.";
    let _ = write!(out, "  {}", hint.dimmed());
    out
}

#[cfg(test)]
mod tests {
    use agent_chat_core::conversation::RoutingStep;

    use super::*;

    #[test]
    fn test_assistant_message() {
        let msg = Message::assistant(
            "Line one\nLine two",
            "knowledge".to_owned(),
            0.666,
            None,
        );
        let text = message(&msg);
        assert!(text.contains("[Knowledge]"));
        assert!(text.contains("67% confident"));
        assert!(text.contains("Line one"));
        assert!(text.contains("Line two"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_zero_confidence_is_hidden() {
        let msg = Message::assistant("Hi", "general".to_owned(), 0.0, None);
        assert!(!message(&msg).contains("confident"));

        let user = message(&Message::user("Hello"));
        assert!(user.ends_with("Hello"));
    }

    #[test]
    fn test_unknown_agent_keeps_name() {
        assert!(badge("astrologer").contains("[astrologer]"));
        assert!(!badge("astrologer").contains("General"));

        let text = message(&Message::assistant(
            "Hi",
            "router".to_owned(),
            0.9,
            None,
        ));
        assert!(text.contains("[router]"));
        assert!(text.contains("90% confident"));
    }

    #[test]
    fn test_trace_iteration_rows() {
        let trace = Trace {
            reasoning: None,
            processing_time_ms: 0.0,
            iterations: 2,
            routing: vec![
                RoutingStep {
                    agent: "router".to_owned(),
                    confidence: 0.7,
                    action: Some("Routed to knowledge".to_owned()),
                    reasoning: None,
                    iteration: Some(1),
                },
                RoutingStep {
                    agent: "professional".to_owned(),
                    confidence: 0.85,
                    action: Some("Answered".to_owned()),
                    reasoning: None,
                    iteration: Some(2),
                },
            ],
        };
        let text = super::trace(&trace);
        let rows: Vec<_> = text.lines().skip(4).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("    1. "));
        assert!(rows[0].contains("[router]"));
        assert!(rows[0].ends_with(" Routed to knowledge 70%"));
        assert!(rows[1].contains("[Professional]"));
        assert!(rows[1].ends_with(" Answered 85%"));
    }

    #[test]
    fn test_step() {
        let done = step(&ThinkingStep::done(
            "📊 Confidence: 70%",
            "Routing confidence score",
        ));
        assert!(done.contains("📊 Confidence: 70%"));
        assert!(done.contains("(Routing confidence score)"));

        let pending = step(&ThinkingStep::pending("Analyzing query..."));
        assert_eq!(pending, "Analyzing query...");
    }

    #[test]
    fn test_trace_panel() {
        let trace = Trace {
            reasoning: Some("Asked about a fact".to_owned()),
            processing_time_ms: 1234.5,
            iterations: 0,
            routing: vec![RoutingStep {
                agent: "knowledge".to_owned(),
                confidence: 0.8,
                ..Default::default()
            }],
        };
        let text = super::trace(&trace);
        assert!(text.contains("Asked about a fact"));
        assert!(text.contains("1234.50ms"));
        assert!(!text.contains("Iterations:"));
        assert!(text.contains("80%"));
    }

    #[test]
    fn test_conversations() {
        let list = vec![
            ConversationSummary {
                id: "c-2".to_owned(),
                title: "Planning".to_owned(),
                message_count: Some(4),
                updated_at: None,
            },
            ConversationSummary {
                id: "c-1".to_owned(),
                title: String::new(),
                ..Default::default()
            },
        ];
        let text = conversations(&list, Some("c-1"));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("   1. "));
        assert!(lines[0].contains("(4 messages)"));
        assert!(lines[1].starts_with("*  2. "));
        assert!(lines[1].contains("Untitled"));
    }

    #[test]
    fn test_roster() {
        let text = roster();
        assert_eq!(text.lines().count(), AGENTS.len() * 2);
        assert!(text.contains("Email drafting"));
    }
}
