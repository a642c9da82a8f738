use std::error::Error;

use crate::error::ErrorKind;
use crate::request::ChatRequest;
use crate::response::{
    ChatResponse, ConversationList, HealthStatus, MessageList,
};

/// The error type for a chat backend.
pub trait BackendError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents the chat backend: the service that routes
/// queries to agents and stores conversations.
///
/// Once the backend is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the backend should be prepared for being dropped anytime. The
/// returned futures own everything they need, so callers can hold them
/// across other operations on the same backend.
pub trait ChatBackend: Send + Sync {
    /// The error type that may be returned by the backend.
    type Error: BackendError;

    /// Lists the stored conversations of a user, most recent first.
    fn list_conversations(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<ConversationList, Self::Error>> + Send + 'static;

    /// Fetches the full message history of a conversation.
    fn fetch_messages(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<MessageList, Self::Error>> + Send + 'static;

    /// Sends a user message and waits for the routed answer.
    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, Self::Error>> + Send + 'static;

    /// Asks the backend for its status report.
    fn check_health(
        &self,
    ) -> impl Future<Output = Result<HealthStatus, Self::Error>> + Send + 'static;
}
