use agent_chat_protocol::ConversationSummary;

use crate::conversation::{Message, ThinkingStep};
use crate::trace::ANALYZING_STEP;

/// Everything a chat view displays.
///
/// The state only changes through [`StoreState::apply`]. Each switch of
/// the active conversation starts a new generation, and results of a send
/// that started in an older generation are rejected as stale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StoreState {
    conversations: Vec<ConversationSummary>,
    current_conversation_id: Option<String>,
    messages: Vec<Message>,
    thinking_steps: Vec<ThinkingStep>,
    in_flight: bool,
    generation: u64,
}

/// A state transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// A fresh conversation list arrived.
    ConversationsLoaded(Vec<ConversationSummary>),
    /// Leave the active conversation for an unpersisted one.
    NewChat,
    /// A stored conversation was fetched and becomes active.
    ConversationOpened {
        /// Its backend id.
        id: String,
        /// Its history.
        messages: Vec<Message>,
    },
    /// The user submitted a message.
    SendStarted {
        /// The text as typed.
        text: String,
    },
    /// The backend answered; show the derived steps.
    ResponseReceived {
        /// Generation the send started in.
        generation: u64,
        /// The derived steps.
        steps: Vec<ThinkingStep>,
    },
    /// The backend call failed.
    SendFailed {
        /// Generation the send started in.
        generation: u64,
        /// What went wrong.
        description: String,
    },
    /// Append the answer.
    Commit {
        /// Generation the send started in.
        generation: u64,
        /// The assistant message.
        message: Message,
        /// The conversation id reported by the backend.
        conversation_id: Option<String>,
    },
    /// The send is over, whatever its outcome.
    SendSettled,
}

/// What [`StoreState::apply`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    Unchanged,
    /// The state changed.
    Changed,
    /// The action belongs to an older generation and was dropped.
    Stale,
    /// The send was accepted; the request should carry these values.
    SendAccepted {
        /// Current generation.
        generation: u64,
        /// The active conversation, `None` if unpersisted.
        conversation_id: Option<String>,
    },
    /// The answer was appended.
    Committed {
        /// Whether the backend id was adopted for a new conversation.
        adopted_id: bool,
    },
}

impl Transition {
    /// Returns whether the state was modified.
    #[inline]
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged | Self::Stale)
    }
}

impl StoreState {
    /// Conversations, most recent first.
    #[inline]
    pub fn conversations(&self) -> &[ConversationSummary] {
        &self.conversations
    }

    /// The active conversation, `None` until the backend assigns an id.
    #[inline]
    pub fn current_conversation_id(&self) -> Option<&str> {
        self.current_conversation_id.as_deref()
    }

    /// Messages of the active conversation.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Progress of the current send.
    #[inline]
    pub fn thinking_steps(&self) -> &[ThinkingStep] {
        &self.thinking_steps
    }

    /// Whether a send is outstanding. Input should be disabled meanwhile.
    #[inline]
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Applies an action.
    pub fn apply(&mut self, action: Action) -> Transition {
        trace!("applying {action:?}");
        match action {
            Action::ConversationsLoaded(conversations) => {
                self.conversations = conversations;
                Transition::Changed
            }
            Action::NewChat => {
                self.switch_to(None, Vec::new());
                Transition::Changed
            }
            Action::ConversationOpened { id, messages } => {
                self.switch_to(Some(id), messages);
                Transition::Changed
            }
            Action::SendStarted { text } => {
                if self.in_flight || text.trim().is_empty() {
                    return Transition::Unchanged;
                }
                self.messages.push(Message::user(text));
                self.thinking_steps =
                    vec![ThinkingStep::pending(ANALYZING_STEP)];
                self.in_flight = true;
                Transition::SendAccepted {
                    generation: self.generation,
                    conversation_id: self.current_conversation_id.clone(),
                }
            }
            Action::ResponseReceived { generation, steps } => {
                if generation != self.generation {
                    return Transition::Stale;
                }
                self.thinking_steps = steps;
                Transition::Changed
            }
            Action::SendFailed {
                generation,
                description,
            } => {
                if generation != self.generation {
                    return Transition::Stale;
                }
                self.thinking_steps = vec![ThinkingStep::failed(description)];
                Transition::Changed
            }
            Action::Commit {
                generation,
                message,
                conversation_id,
            } => {
                if generation != self.generation {
                    return Transition::Stale;
                }
                self.messages.push(message);
                self.thinking_steps.clear();

                let adopted_id = match conversation_id {
                    Some(id)
                        if !id.is_empty()
                            && self.current_conversation_id.is_none() =>
                    {
                        self.current_conversation_id = Some(id);
                        true
                    }
                    _ => false,
                };
                Transition::Committed { adopted_id }
            }
            Action::SendSettled => {
                if !self.in_flight {
                    return Transition::Unchanged;
                }
                self.in_flight = false;
                Transition::Changed
            }
        }
    }

    fn switch_to(&mut self, id: Option<String>, messages: Vec<Message>) {
        self.current_conversation_id = id;
        self.messages = messages;
        self.thinking_steps.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer() -> Message {
        Message::assistant("Hello!", "general".to_owned(), 0.6, None)
    }

    #[test]
    fn test_blank_send_is_unchanged() {
        let mut state = StoreState::default();
        for text in ["", "   ", "\n\t"] {
            let transition = state.apply(Action::SendStarted {
                text: text.to_owned(),
            });
            assert_eq!(transition, Transition::Unchanged);
        }
        assert_eq!(state, StoreState::default());
    }

    #[test]
    fn test_send_lifecycle() {
        let mut state = StoreState::default();
        let transition = state.apply(Action::SendStarted {
            text: "hi".to_owned(),
        });
        assert_eq!(
            transition,
            Transition::SendAccepted {
                generation: 0,
                conversation_id: None,
            }
        );
        assert!(state.in_flight());
        assert_eq!(state.thinking_steps()[0].step, ANALYZING_STEP);

        // A second send while the first is outstanding is dropped.
        let transition = state.apply(Action::SendStarted {
            text: "again".to_owned(),
        });
        assert_eq!(transition, Transition::Unchanged);
        assert_eq!(state.messages().len(), 1);

        let transition = state.apply(Action::Commit {
            generation: 0,
            message: answer(),
            conversation_id: Some("c-1".to_owned()),
        });
        assert_eq!(transition, Transition::Committed { adopted_id: true });
        assert_eq!(state.current_conversation_id(), Some("c-1"));
        assert!(state.thinking_steps().is_empty());
        assert!(state.in_flight());

        assert_eq!(state.apply(Action::SendSettled), Transition::Changed);
        assert_eq!(state.apply(Action::SendSettled), Transition::Unchanged);
    }

    #[test]
    fn test_known_conversation_keeps_id() {
        let mut state = StoreState::default();
        state.apply(Action::ConversationOpened {
            id: "c-1".to_owned(),
            messages: vec![],
        });
        let Transition::SendAccepted {
            generation,
            conversation_id,
        } = state.apply(Action::SendStarted {
            text: "hi".to_owned(),
        })
        else {
            panic!("send was not accepted");
        };
        assert_eq!(conversation_id.as_deref(), Some("c-1"));

        let transition = state.apply(Action::Commit {
            generation,
            message: answer(),
            conversation_id: Some("c-2".to_owned()),
        });
        assert_eq!(transition, Transition::Committed { adopted_id: false });
        assert_eq!(state.current_conversation_id(), Some("c-1"));
    }

    #[test]
    fn test_switch_makes_send_stale() {
        let mut state = StoreState::default();
        state.apply(Action::SendStarted {
            text: "hi".to_owned(),
        });
        state.apply(Action::NewChat);

        let stale = [
            Action::ResponseReceived {
                generation: 0,
                steps: vec![ThinkingStep::pending("late")],
            },
            Action::SendFailed {
                generation: 0,
                description: "late".to_owned(),
            },
            Action::Commit {
                generation: 0,
                message: answer(),
                conversation_id: Some("c-1".to_owned()),
            },
        ];
        for action in stale {
            assert_eq!(state.apply(action), Transition::Stale);
        }
        assert!(state.messages().is_empty());
        assert!(state.thinking_steps().is_empty());
        assert_eq!(state.current_conversation_id(), None);

        // Input stays disabled until the send settles.
        assert!(state.in_flight());
        state.apply(Action::SendSettled);
        assert!(!state.in_flight());
    }

    #[test]
    fn test_failure_replaces_steps() {
        let mut state = StoreState::default();
        state.apply(Action::SendStarted {
            text: "hi".to_owned(),
        });
        state.apply(Action::SendFailed {
            generation: 0,
            description: "connection refused".to_owned(),
        });
        assert_eq!(
            state.thinking_steps(),
            [ThinkingStep::failed("connection refused")]
        );
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_missing_id_stays_unpersisted() {
        let mut state = StoreState::default();
        state.apply(Action::SendStarted {
            text: "hi".to_owned(),
        });
        let transition = state.apply(Action::Commit {
            generation: 0,
            message: answer(),
            conversation_id: Some(String::new()),
        });
        assert_eq!(transition, Transition::Committed { adopted_id: false });
        assert_eq!(state.current_conversation_id(), None);
    }
}
