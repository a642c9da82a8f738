use agent_chat_protocol::{
    ChatResponse, ErrorKind, IterationDetail, RoutingEntry, RoutingTrail,
    StoredMessage,
};
use serde::{Deserialize, Serialize};

/// A successful chat answer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetAnswer {
    pub response: String,
    pub agent_used: String,
    pub confidence: f64,
    pub processing_time_ms: f64,
    pub iterations: u32,
    /// The conversation id the backend reports. When `None`, the id of
    /// the request is echoed back.
    pub conversation_id: Option<String>,
    pub routing_history: Vec<RoutingEntry>,
    pub iteration_details: Vec<IterationDetail>,
}

impl PresetAnswer {
    /// Creates an answer from `agent` with no routing data.
    #[inline]
    pub fn new<R: Into<String>, A: Into<String>>(
        response: R,
        agent: A,
        confidence: f64,
    ) -> Self {
        Self {
            response: response.into(),
            agent_used: agent.into(),
            confidence,
            iterations: 1,
            ..Default::default()
        }
    }

    /// Sets the conversation id the backend assigns.
    #[inline]
    pub fn in_conversation<S: Into<String>>(mut self, id: S) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    /// Sets the reported processing time.
    #[inline]
    pub fn took_ms(mut self, processing_time_ms: f64) -> Self {
        self.processing_time_ms = processing_time_ms;
        self
    }

    /// Appends a flat routing decision.
    #[inline]
    pub fn with_routing(
        mut self,
        agent: &str,
        confidence: f64,
        reasoning: Option<&str>,
    ) -> Self {
        self.routing_history.push(RoutingEntry {
            agent_name: agent.to_owned(),
            confidence,
            reasoning: reasoning.map(ToOwned::to_owned),
        });
        self
    }

    /// Appends an iteration detail and bumps the iteration count to
    /// cover it.
    #[inline]
    pub fn with_iteration(
        mut self,
        iteration: u32,
        agent: &str,
        action: &str,
        confidence: f64,
        reasoning: Option<&str>,
    ) -> Self {
        self.iteration_details.push(IterationDetail {
            iteration,
            agent: agent.to_owned(),
            action: action.to_owned(),
            confidence,
            reasoning: reasoning.map(ToOwned::to_owned),
        });
        self.iterations = self.iterations.max(iteration);
        self
    }

    pub(crate) fn into_response(
        self,
        request_conversation: Option<String>,
    ) -> ChatResponse {
        ChatResponse {
            response: self.response,
            agent_used: self.agent_used,
            confidence: self.confidence,
            processing_time_ms: self.processing_time_ms,
            iterations: self.iterations,
            conversation_id: self.conversation_id.or(request_conversation),
            routing: RoutingTrail::from_wire(
                Some(self.routing_history),
                Some(self.iteration_details),
            ),
        }
    }
}

/// How a preset failure presents itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Status,
    MalformedBody,
}

impl From<FailureKind> for ErrorKind {
    #[inline]
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Transport => ErrorKind::Transport,
            FailureKind::Status => ErrorKind::Status,
            FailureKind::MalformedBody => ErrorKind::MalformedBody,
        }
    }
}

/// The reply the scripted backend gives to the next chat request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    #[serde(rename = "answer")]
    Answer(PresetAnswer),
    #[serde(rename = "failure")]
    Failure { kind: FailureKind, message: String },
}

impl PresetReply {
    /// Creates a failing reply.
    #[inline]
    pub fn failure<S: Into<String>>(kind: FailureKind, message: S) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }
}

impl From<PresetAnswer> for PresetReply {
    #[inline]
    fn from(answer: PresetAnswer) -> Self {
        Self::Answer(answer)
    }
}

/// A stored user message.
#[inline]
pub fn stored_user<S: Into<String>>(content: S) -> StoredMessage {
    StoredMessage {
        role: "user".to_owned(),
        content: content.into(),
        ..Default::default()
    }
}

/// A stored assistant message.
#[inline]
pub fn stored_assistant<S: Into<String>>(
    content: S,
    agent: &str,
    confidence: f64,
) -> StoredMessage {
    StoredMessage {
        role: "assistant".to_owned(),
        content: content.into(),
        agent: Some(agent.to_owned()),
        confidence: Some(confidence),
    }
}
