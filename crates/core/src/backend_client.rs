use std::pin::Pin;
use std::sync::Arc;

use agent_chat_protocol::{
    BackendError, ChatBackend, ChatRequest, ChatResponse, ConversationList,
    HealthStatus, MessageList,
};
use tracing::Instrument;

use crate::error::BackendFailure;

type BoxedCall<T> =
    Pin<Box<dyn Future<Output = Result<T, BackendFailure>> + Send>>;

/// Object-safe mirror of [`ChatBackend`].
trait ErasedBackend: Send + Sync {
    fn list_conversations(&self, user_id: &str) -> BoxedCall<ConversationList>;

    fn fetch_messages(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> BoxedCall<MessageList>;

    fn send_chat(&self, req: &ChatRequest) -> BoxedCall<ChatResponse>;

    fn check_health(&self) -> BoxedCall<HealthStatus>;
}

impl<B: ChatBackend> ErasedBackend for B {
    fn list_conversations(&self, user_id: &str) -> BoxedCall<ConversationList> {
        erase(ChatBackend::list_conversations(self, user_id))
    }

    fn fetch_messages(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> BoxedCall<MessageList> {
        erase(ChatBackend::fetch_messages(self, conversation_id, user_id))
    }

    fn send_chat(&self, req: &ChatRequest) -> BoxedCall<ChatResponse> {
        erase(ChatBackend::send_chat(self, req))
    }

    fn check_health(&self) -> BoxedCall<HealthStatus> {
        erase(ChatBackend::check_health(self))
    }
}

fn erase<T, E>(
    fut: impl Future<Output = Result<T, E>> + Send + 'static,
) -> BoxedCall<T>
where
    T: Send + 'static,
    E: BackendError,
{
    Box::pin(async move {
        fut.await.map_err(|err| {
            debug!("backend call failed: {err:?}");
            BackendFailure::from_error(&err)
        })
    })
}

/// A wrapper around a chat backend that provides a type-erased interface
/// for the other modules.
#[derive(Clone)]
pub struct BackendClient {
    backend: Arc<dyn ErasedBackend>,
}

impl BackendClient {
    #[inline]
    pub fn new<B: ChatBackend + 'static>(backend: B) -> Self {
        // We have to erase the type `B`, since the store doesn't have a
        // generic parameter and we don't want it either.
        Self {
            backend: Arc::new(backend),
        }
    }

    pub async fn list_conversations(
        &self,
        user_id: &str,
    ) -> Result<ConversationList, BackendFailure> {
        self.backend
            .list_conversations(user_id)
            .instrument(trace_span!("backend list", user_id = user_id))
            .await
    }

    pub async fn fetch_messages(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> Result<MessageList, BackendFailure> {
        self.backend
            .fetch_messages(conversation_id, user_id)
            .instrument(trace_span!(
                "backend fetch",
                conversation_id = conversation_id
            ))
            .await
    }

    pub async fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> Result<ChatResponse, BackendFailure> {
        trace!("sending a chat request: {req:?}");
        self.backend
            .send_chat(req)
            .instrument(trace_span!("backend chat"))
            .await
    }

    pub async fn check_health(&self) -> Result<HealthStatus, BackendFailure> {
        self.backend
            .check_health()
            .instrument(trace_span!("backend health"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use agent_chat_protocol::{DEFAULT_USER_ID, ErrorKind};
    use agent_chat_test_backend::{
        FailureKind, PresetAnswer, PresetReply, ScriptedBackend,
    };

    use super::*;

    #[tokio::test]
    async fn test_send_chat() {
        let backend = ScriptedBackend::default();
        backend.add_reply(PresetAnswer::new("How are you?", "general", 0.6));
        let client = BackendClient::new(backend.clone());

        let req = ChatRequest::new("Hi", DEFAULT_USER_ID, None);
        let resp = client.send_chat(&req).await.unwrap();
        assert_eq!(resp.response, "How are you?");
        assert_eq!(backend.calls().chat_requests, [req]);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let backend = ScriptedBackend::default();
        backend.add_reply(PresetReply::failure(
            FailureKind::MalformedBody,
            "malformed response: expected value at line 1 column 1",
        ));
        let client = BackendClient::new(backend);

        let req = ChatRequest::new("Hi", DEFAULT_USER_ID, None);
        let err = client.send_chat(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedBody);
        assert!(err.message().starts_with("malformed response"));
    }
}
