use std::time::Duration;

use agent_chat_core::conversation::{Message, Role};
use agent_chat_core::{
    BackendFailure, ConversationStore, ConversationStoreBuilder, SendOutcome,
};
use agent_chat_http::{HttpBackend, HttpBackendConfigBuilder};
use agent_chat_protocol::ChatBackend;

use crate::config::CliConfig;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    store_builder: ConversationStoreBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified backend.
    pub fn with_backend<B: ChatBackend + 'static>(backend: B) -> Self {
        let store_builder = ConversationStoreBuilder::with_backend(backend);
        Self { store_builder }
    }

    /// Creates a session builder talking HTTP to the configured backend.
    pub fn with_config(config: &CliConfig) -> Self {
        let backend_config = HttpBackendConfigBuilder::new()
            .with_base_url(config.base_url.clone())
            .build();
        Self::with_backend(HttpBackend::new(backend_config))
            .with_user_id(config.user_id.clone())
            .with_commit_delay(config.commit_delay)
    }

    /// Sets the user identity.
    #[inline]
    pub fn with_user_id<S: Into<String>>(mut self, user_id: S) -> Self {
        self.store_builder = self.store_builder.with_user_id(user_id);
        self
    }

    /// Sets how long thinking steps stay visible before the answer.
    #[inline]
    pub fn with_commit_delay(mut self, delay: Duration) -> Self {
        self.store_builder = self.store_builder.with_commit_delay(delay);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        Session {
            store: self.store_builder.build(),
        }
    }
}

/// A chat session, like a window with a sidebar of conversations, a message
/// list and an input box.
///
/// The session is basically a wrapper around [`ConversationStore`] that adds
/// what a text front end needs on top of it.
#[derive(Clone)]
pub struct Session {
    store: ConversationStore,
}

impl Session {
    /// Returns the underlying store.
    #[inline]
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Sends a message and waits until its answer is settled.
    #[inline]
    pub async fn send_message(&self, message: &str) -> SendOutcome {
        self.store.send_message(message).await
    }

    /// Opens a conversation, returning its id.
    ///
    /// `selector` is either a 1-based position in the conversation list or
    /// a conversation id.
    pub async fn open(&self, selector: &str) -> Result<String, BackendFailure> {
        let id = self.resolve(selector);
        debug!("opening conversation {id}");
        self.store.load_conversation(&id).await?;
        Ok(id)
    }

    /// Returns the latest answer that carries a trace.
    pub fn latest_traced_answer(&self) -> Option<Message> {
        self.store
            .state()
            .messages()
            .iter()
            .rev()
            .find(|msg| msg.role() == Role::Assistant && msg.trace().is_some())
            .cloned()
    }

    fn resolve(&self, selector: &str) -> String {
        let state = self.store.state();
        let conversations = state.conversations();
        match selector.parse::<usize>() {
            Ok(position) if (1..=conversations.len()).contains(&position) => {
                conversations[position - 1].id.clone()
            }
            _ => selector.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use agent_chat_test_backend::{PresetAnswer, ScriptedBackend, stored_user};

    use super::*;

    #[tokio::test]
    async fn test_open_by_position_or_id() {
        let backend = ScriptedBackend::default();
        backend.add_conversation("c-1", "Greeting", vec![stored_user("Hi")]);
        backend.add_conversation("c-2", "Planning", vec![]);
        let session = SessionBuilder::with_backend(backend.clone()).build();
        session.store().load_conversations().await;

        assert_eq!(session.open("2").await.unwrap(), "c-1");
        assert_eq!(session.store().state().messages().len(), 1);
        assert_eq!(session.open("c-2").await.unwrap(), "c-2");
        assert!(session.open("7").await.is_err());
        assert_eq!(backend.calls().fetched_conversations, ["c-1", "c-2", "7"]);
    }

    #[tokio::test]
    async fn test_latest_traced_answer() {
        let backend = ScriptedBackend::default();
        backend.add_reply(PresetAnswer::new("Hello!", "general", 0.6));
        let session = SessionBuilder::with_backend(backend)
            .with_commit_delay(Duration::ZERO)
            .build();
        assert!(session.latest_traced_answer().is_none());

        session.send_message("Hi").await;
        let answer = session.latest_traced_answer().unwrap();
        assert_eq!(answer.content(), "Hello!");
        assert_eq!(answer.trace().unwrap().iterations, 1);
    }
}
