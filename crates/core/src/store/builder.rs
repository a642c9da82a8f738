use std::time::Duration;

use agent_chat_protocol::{ChatBackend, DEFAULT_USER_ID};

use super::ConversationStore;
use crate::backend_client::BackendClient;

/// How long an answer's thinking steps stay visible before the answer is
/// appended to the conversation.
pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_millis(1000);

/// [`ConversationStore`] builder.
pub struct ConversationStoreBuilder {
    pub(crate) backend: BackendClient,
    pub(crate) user_id: String,
    pub(crate) commit_delay: Duration,
}

impl ConversationStoreBuilder {
    /// Creates a new builder with the specified backend.
    #[inline]
    pub fn with_backend<B: ChatBackend + 'static>(backend: B) -> Self {
        Self {
            backend: BackendClient::new(backend),
            user_id: DEFAULT_USER_ID.to_owned(),
            commit_delay: DEFAULT_COMMIT_DELAY,
        }
    }

    /// Sets the user whose conversations are listed and written.
    #[inline]
    pub fn with_user_id<S: Into<String>>(mut self, user_id: S) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Sets the pause between receiving an answer and appending it.
    #[inline]
    pub fn with_commit_delay(mut self, delay: Duration) -> Self {
        self.commit_delay = delay;
        self
    }

    /// Builds the store.
    #[inline]
    pub fn build(self) -> ConversationStore {
        ConversationStore::from_builder(self)
    }
}
