use serde::{Deserialize, Serialize};

/// One row of the conversation list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationSummary {
    /// Identifier assigned by the backend.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Number of stored messages, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u32>,
    /// Last update time as reported by the backend (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body of `GET /api/conversations`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationList {
    /// Conversations, most recent first.
    pub conversations: Vec<ConversationSummary>,
}

/// A message as stored by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredMessage {
    /// `"user"` or `"assistant"`.
    pub role: String,
    /// The message text.
    pub content: String,
    /// The agent that produced an assistant message.
    pub agent: Option<String>,
    /// Routing confidence of an assistant message, in `[0, 1]`.
    pub confidence: Option<f64>,
}

/// Body of `GET /api/conversations/{id}/messages`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageList {
    /// Messages in insertion order.
    pub messages: Vec<StoredMessage>,
}

/// An entry of the flat `routing_history` list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingEntry {
    /// The agent that was selected.
    pub agent_name: String,
    /// Routing confidence, in `[0, 1]`.
    pub confidence: f64,
    /// Why the agent was chosen.
    pub reasoning: Option<String>,
}

/// An entry of the per-iteration `iteration_details` list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IterationDetail {
    /// Iteration number, starting at 1.
    pub iteration: u32,
    /// The agent that executed.
    pub agent: String,
    /// What happened, e.g. `"Routed to knowledge"`.
    pub action: String,
    /// Confidence of this step, in `[0, 1]`.
    pub confidence: f64,
    /// Why this happened.
    pub reasoning: Option<String>,
}

/// How the backend explains the routing of a response.
///
/// Older backends send a flat `routing_history`, newer ones send
/// `iteration_details`. Both lists are accepted on the wire; when both
/// are non-empty the flat history is used.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RoutingTrail {
    /// A flat list of routing decisions.
    History(Vec<RoutingEntry>),
    /// Per-iteration details of a multi-step run.
    Iterations(Vec<IterationDetail>),
    /// The response carries no routing data.
    #[default]
    Missing,
}

impl RoutingTrail {
    /// Picks the variant from the two optional wire lists.
    pub fn from_wire(
        routing_history: Option<Vec<RoutingEntry>>,
        iteration_details: Option<Vec<IterationDetail>>,
    ) -> Self {
        match (routing_history, iteration_details) {
            (Some(history), _) if !history.is_empty() => Self::History(history),
            (_, Some(details)) if !details.is_empty() => {
                Self::Iterations(details)
            }
            _ => Self::Missing,
        }
    }
}

/// Body of a `POST /api/chat` response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "WireChatResponse")]
pub struct ChatResponse {
    /// The answer text (markdown).
    pub response: String,
    /// The agent that handled the query.
    pub agent_used: String,
    /// Routing confidence, in `[0, 1]`.
    pub confidence: f64,
    /// Backend processing time in milliseconds.
    pub processing_time_ms: f64,
    /// Number of agent iterations the backend ran.
    pub iterations: u32,
    /// The conversation the exchange was stored in, if any.
    pub conversation_id: Option<String>,
    /// Routing explanation.
    pub routing: RoutingTrail,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct WireChatResponse {
    response: Option<String>,
    agent_used: Option<String>,
    confidence: Option<f64>,
    processing_time_ms: Option<f64>,
    iterations: Option<u32>,
    conversation_id: Option<String>,
    routing_history: Option<Vec<RoutingEntry>>,
    iteration_details: Option<Vec<IterationDetail>>,
}

impl From<WireChatResponse> for ChatResponse {
    fn from(wire: WireChatResponse) -> Self {
        Self {
            response: wire.response.unwrap_or_default(),
            agent_used: wire.agent_used.unwrap_or_default(),
            confidence: wire.confidence.unwrap_or_default(),
            processing_time_ms: wire.processing_time_ms.unwrap_or_default(),
            iterations: wire.iterations.unwrap_or_default(),
            conversation_id: wire.conversation_id,
            routing: RoutingTrail::from_wire(
                wire.routing_history,
                wire.iteration_details,
            ),
        }
    }
}

/// Body of `GET /health`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    /// Service status, `"healthy"` when up.
    pub status: String,
    /// The LLM model the backend uses.
    pub model: String,
    /// The vector store backing retrieval.
    pub vector_store: String,
    /// Base URL of the backend's LLM API.
    pub api_base: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_history_wins_over_iterations() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "response": "Hi",
            "agent_used": "general",
            "routing_history": [
                { "agent_name": "general", "confidence": 0.6 }
            ],
            "iteration_details": [
                { "iteration": 1, "agent": "router", "action": "Routed to general" }
            ],
        }))
        .unwrap();
        assert!(matches!(resp.routing, RoutingTrail::History(ref h) if h.len() == 1));
    }

    #[test]
    fn test_empty_history_falls_through() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "routing_history": [],
            "iteration_details": [
                { "iteration": 1, "agent": "router", "action": "Routed to knowledge" }
            ],
        }))
        .unwrap();
        let RoutingTrail::Iterations(details) = resp.routing else {
            panic!("expected iteration details");
        };
        assert_eq!(details[0].action, "Routed to knowledge");
        assert_eq!(details[0].reasoning, None);
    }

    #[test]
    fn test_nulls_and_absent_fields() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "response": "ok",
            "confidence": null,
            "routing_history": null,
        }))
        .unwrap();
        assert_eq!(resp.response, "ok");
        assert_eq!(resp.agent_used, "");
        assert_eq!(resp.confidence, 0.0);
        assert_eq!(resp.conversation_id, None);
        assert_eq!(resp.routing, RoutingTrail::Missing);
    }

    #[test]
    fn test_conversation_extra_fields() {
        let list: ConversationList = serde_json::from_value(json!({
            "conversations": [{
                "id": "c1",
                "user_id": "user",
                "title": "Trip plans",
                "created_at": "2025-01-01T10:00:00",
                "updated_at": "2025-01-02T10:00:00",
                "message_count": 4
            }],
            "total": 1
        }))
        .unwrap();
        assert_eq!(list.conversations[0].title, "Trip plans");
        assert_eq!(list.conversations[0].message_count, Some(4));
    }
}
