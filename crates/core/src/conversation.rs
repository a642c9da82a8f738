//! Conversation-related types.

use agent_chat_protocol::{IterationDetail, RoutingEntry, StoredMessage};

/// Who wrote a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The person typing.
    User,
    /// An agent of the backend.
    Assistant,
}

/// A message in the active conversation.
///
/// Messages are immutable once created; the store only ever appends them
/// or replaces the whole list.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    role: Role,
    content: String,
    agent: Option<String>,
    confidence: Option<f64>,
    trace: Option<Trace>,
}

impl Message {
    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            agent: None,
            confidence: None,
            trace: None,
        }
    }

    /// Creates an assistant message. An empty agent name is dropped.
    #[inline]
    pub fn assistant<S: Into<String>>(
        content: S,
        agent: String,
        confidence: f64,
        trace: Option<Trace>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            agent: (!agent.is_empty()).then_some(agent),
            confidence: Some(confidence),
            trace,
        }
    }

    /// Returns who wrote this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the message text (markdown for assistant messages).
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the agent that answered, for assistant messages.
    #[inline]
    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref()
    }

    /// Returns the routing confidence, for assistant messages.
    #[inline]
    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// Returns the trace attached when the answer arrived.
    ///
    /// Traces are never stored by the backend, so messages loaded from
    /// history have none.
    #[inline]
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }
}

impl From<StoredMessage> for Message {
    fn from(stored: StoredMessage) -> Self {
        if stored.role == "user" {
            return Self::user(stored.content);
        }
        if stored.role != "assistant" {
            debug!("treating stored role {:?} as assistant", stored.role);
        }
        Self {
            role: Role::Assistant,
            content: stored.content,
            agent: stored.agent.filter(|agent| !agent.is_empty()),
            confidence: stored.confidence,
            trace: None,
        }
    }
}

/// How an answer was produced, reconstructed from the response metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trace {
    /// The routing explanation, if the backend gave one.
    pub reasoning: Option<String>,
    /// Backend processing time in milliseconds.
    pub processing_time_ms: f64,
    /// Number of agent iterations.
    pub iterations: u32,
    /// Every routing decision, in the order the backend reported them.
    pub routing: Vec<RoutingStep>,
}

/// One routing decision inside a [`Trace`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoutingStep {
    /// The agent involved.
    pub agent: String,
    /// Confidence of the decision, in `[0, 1]`.
    pub confidence: f64,
    /// What happened, for iteration details.
    pub action: Option<String>,
    /// Why it happened.
    pub reasoning: Option<String>,
    /// The iteration number, for iteration details.
    pub iteration: Option<u32>,
}

impl From<&RoutingEntry> for RoutingStep {
    fn from(entry: &RoutingEntry) -> Self {
        Self {
            agent: entry.agent_name.clone(),
            confidence: entry.confidence,
            action: None,
            reasoning: entry.reasoning.clone(),
            iteration: None,
        }
    }
}

impl From<&IterationDetail> for RoutingStep {
    fn from(detail: &IterationDetail) -> Self {
        Self {
            agent: detail.agent.clone(),
            confidence: detail.confidence,
            action: Some(detail.action.clone()),
            reasoning: detail.reasoning.clone(),
            iteration: Some(detail.iteration),
        }
    }
}

/// A progress line shown while a request is in flight.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThinkingStep {
    /// The headline, e.g. `📊 Confidence: 70%`.
    pub step: String,
    /// Secondary text under the headline.
    pub detail: Option<String>,
    /// Whether the step has completed.
    pub done: bool,
}

impl ThinkingStep {
    /// A step that is still running.
    #[inline]
    pub fn pending<S: Into<String>>(step: S) -> Self {
        Self {
            step: step.into(),
            detail: None,
            done: false,
        }
    }

    /// A completed step.
    #[inline]
    pub fn done<S: Into<String>, D: Into<String>>(step: S, detail: D) -> Self {
        Self {
            step: step.into(),
            detail: Some(detail.into()),
            done: true,
        }
    }

    /// The step shown when a send fails.
    #[inline]
    pub fn failed<D: Into<String>>(detail: D) -> Self {
        Self {
            step: "❌ Error occurred".to_owned(),
            detail: Some(detail.into()),
            done: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_messages_have_no_trace() {
        let user = Message::from(StoredMessage {
            role: "user".to_owned(),
            content: "Hi".to_owned(),
            agent: Some("ignored".to_owned()),
            confidence: Some(0.5),
        });
        assert_eq!(user.role(), Role::User);
        assert_eq!(user.agent(), None);
        assert_eq!(user.confidence(), None);

        let assistant = Message::from(StoredMessage {
            role: "assistant".to_owned(),
            content: "Hello".to_owned(),
            agent: Some("general".to_owned()),
            confidence: Some(0.6),
        });
        assert_eq!(assistant.role(), Role::Assistant);
        assert_eq!(assistant.agent(), Some("general"));
        assert_eq!(assistant.confidence(), Some(0.6));
        assert!(assistant.trace().is_none());
    }

    #[test]
    fn test_empty_agent_is_absent() {
        let msg = Message::assistant("ok", String::new(), 0.0, None);
        assert_eq!(msg.agent(), None);
    }
}
