//! Parsing of the lines typed into the prompt.

/// A line typed into the prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Plain text to send to the backend.
    Send(String),
    /// Start a new conversation.
    New,
    /// Show the conversation list.
    List,
    /// Open a conversation by its position in the list or by id.
    Open(String),
    /// Show the trace of the latest answer.
    Trace,
    /// Show the agent roster.
    Agents,
    /// Ask the backend for its status.
    Health,
    /// Show the available commands.
    Help,
    /// Leave the program.
    Quit,
    /// Nothing was typed.
    Empty,
    /// A command that could not be understood, with a hint for the user.
    Invalid(String),
}

/// One line per command, shown by `/help`.
pub const HELP: &[(&str, &str)] = &[
    ("/new", "start a new conversation"),
    ("/list", "list your conversations"),
    ("/open <number|id>", "open a conversation"),
    ("/trace", "show how the latest answer was routed"),
    ("/agents", "list the agents"),
    ("/health", "check the backend status"),
    ("/help", "show this help"),
    ("/quit", "leave"),
];

impl Command {
    /// Parses a line. Lines not starting with `/` are messages.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Send(line.to_owned());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match (name.to_ascii_lowercase().as_str(), arg) {
            ("new", "") => Self::New,
            ("list", "") => Self::List,
            ("open", "") => {
                Self::Invalid("usage: /open <number|id>".to_owned())
            }
            ("open", arg) => Self::Open(arg.to_owned()),
            ("trace", "") => Self::Trace,
            ("agents", "") => Self::Agents,
            ("health", "") => Self::Health,
            ("help", "") => Self::Help,
            ("quit" | "exit", "") => Self::Quit,
            (
                "new" | "list" | "trace" | "agents" | "health" | "help"
                | "quit" | "exit",
                _,
            ) => {
                Self::Invalid(format!("/{name} takes no arguments"))
            }
            _ => Self::Invalid(format!(
                "unknown command /{name}, type /help for a list"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Command::parse("  What's my schedule?\n"),
            Command::Send("What's my schedule?".to_owned())
        );
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn test_commands() {
        assert_eq!(Command::parse("/new"), Command::New);
        assert_eq!(Command::parse("/LIST"), Command::List);
        assert_eq!(Command::parse("/open 2"), Command::Open("2".to_owned()));
        assert_eq!(
            Command::parse("/open   conv-abc "),
            Command::Open("conv-abc".to_owned())
        );
        assert_eq!(Command::parse("/trace"), Command::Trace);
        assert_eq!(Command::parse("/agents"), Command::Agents);
        assert_eq!(Command::parse("/health"), Command::Health);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/exit"), Command::Quit);
    }

    #[test]
    fn test_invalid_commands() {
        assert!(matches!(Command::parse("/open"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/new chat"), Command::Invalid(_)));
        assert_eq!(
            Command::parse("/dance"),
            Command::Invalid(
                "unknown command /dance, type /help for a list".to_owned()
            )
        );
    }
}
