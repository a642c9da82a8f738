mod builder;
mod state;

use std::sync::Arc;
use std::time::Duration;

use agent_chat_protocol::{ChatRequest, HealthStatus};
use tokio::sync::watch;
use tokio::time::sleep;

use crate::backend_client::BackendClient;
use crate::conversation::{Message, ThinkingStep};
use crate::error::BackendFailure;
use crate::trace::reconstruct;
pub use builder::{ConversationStoreBuilder, DEFAULT_COMMIT_DELAY};
pub use state::{Action, StoreState, Transition};

/// How a [`ConversationStore::send_message`] call ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The text was blank or another send was in flight; nothing was sent.
    Ignored,
    /// The answer was appended to the conversation. Carries the thinking
    /// steps that were shown before it.
    Committed(Vec<ThinkingStep>),
    /// The user switched conversations before the answer could be
    /// appended, so it was dropped.
    Discarded,
    /// The backend call failed. The failure is shown as a thinking step.
    Failed(BackendFailure),
}

/// The client-side state of the chat, mediating every read and write
/// through the backend.
///
/// Cloning is cheap; clones share the same state. Every change is
/// published to the receivers returned by [`ConversationStore::subscribe`].
#[derive(Clone)]
pub struct ConversationStore {
    inner: Arc<Inner>,
}

struct Inner {
    backend: BackendClient,
    user_id: String,
    commit_delay: Duration,
    state: watch::Sender<StoreState>,
}

impl ConversationStore {
    fn from_builder(builder: ConversationStoreBuilder) -> Self {
        let ConversationStoreBuilder {
            backend,
            user_id,
            commit_delay,
        } = builder;

        let (state, _) = watch::channel(StoreState::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                user_id,
                commit_delay,
                state,
            }),
        }
    }

    /// Returns a snapshot of the current state.
    #[inline]
    pub fn state(&self) -> StoreState {
        self.inner.state.borrow().clone()
    }

    /// Returns a receiver notified of every state change.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.inner.state.subscribe()
    }

    /// Returns the user this store acts for.
    #[inline]
    pub fn user_id(&self) -> &str {
        &self.inner.user_id
    }

    /// Refreshes the conversation list.
    ///
    /// A failure is logged and the previous list is kept.
    pub async fn load_conversations(&self) {
        match self
            .inner
            .backend
            .list_conversations(&self.inner.user_id)
            .await
        {
            Ok(list) => {
                debug!("loaded {} conversations", list.conversations.len());
                self.apply(Action::ConversationsLoaded(list.conversations));
            }
            Err(err) => {
                warn!("failed to load conversations: {err}");
            }
        }
    }

    /// Switches to a new, not yet persisted conversation.
    ///
    /// An answer still pending for the previous conversation is discarded.
    pub fn new_chat(&self) {
        self.apply(Action::NewChat);
    }

    /// Opens a stored conversation.
    ///
    /// On failure the state is left untouched and the error is returned
    /// for the caller to report.
    pub async fn load_conversation(
        &self,
        id: &str,
    ) -> Result<(), BackendFailure> {
        let list = self
            .inner
            .backend
            .fetch_messages(id, &self.inner.user_id)
            .await
            .inspect_err(|err| {
                error!("failed to load conversation {id}: {err}");
            })?;

        let messages = list.messages.into_iter().map(Message::from).collect();
        self.apply(Action::ConversationOpened {
            id: id.to_owned(),
            messages,
        });
        Ok(())
    }

    /// Sends a user message and appends the answer once it arrives.
    ///
    /// The user message is appended immediately. When the backend answers,
    /// the derived thinking steps stay visible for the commit delay before
    /// the answer replaces them. The first answer of a new conversation
    /// assigns its id and triggers one refresh of the conversation list.
    ///
    /// Dropping the returned future leaves the conversation as it is but
    /// still re-enables input.
    pub async fn send_message<S: Into<String>>(&self, text: S) -> SendOutcome {
        let text = text.into();
        let Transition::SendAccepted {
            generation,
            conversation_id,
        } = self.apply(Action::SendStarted { text: text.clone() })
        else {
            debug!("ignoring the message");
            return SendOutcome::Ignored;
        };
        let settle = SettleOnDrop(self);

        let req =
            ChatRequest::new(text, self.inner.user_id.clone(), conversation_id);

        let resp = match self.inner.backend.send_chat(&req).await {
            Ok(resp) => resp,
            Err(err) => {
                error!("failed to send the message: {err}");
                self.apply(Action::SendFailed {
                    generation,
                    description: err.message().to_owned(),
                });
                return SendOutcome::Failed(err);
            }
        };

        let reconstruction = reconstruct(&resp);
        let steps = reconstruction.steps;
        let transition = self.apply(Action::ResponseReceived {
            generation,
            steps: steps.clone(),
        });
        if transition == Transition::Stale {
            return SendOutcome::Discarded;
        }

        sleep(self.inner.commit_delay).await;

        let message = Message::assistant(
            resp.response,
            resp.agent_used,
            resp.confidence,
            Some(reconstruction.trace),
        );
        match self.apply(Action::Commit {
            generation,
            message,
            conversation_id: resp.conversation_id,
        }) {
            Transition::Committed { adopted_id } => {
                // Input is re-enabled before the list refresh.
                drop(settle);
                if adopted_id {
                    self.load_conversations().await;
                }
                SendOutcome::Committed(steps)
            }
            _ => SendOutcome::Discarded,
        }
    }

    /// Asks the backend for its status report.
    #[inline]
    pub async fn check_health(&self) -> Result<HealthStatus, BackendFailure> {
        self.inner.backend.check_health().await
    }

    fn apply(&self, action: Action) -> Transition {
        let mut transition = Transition::Unchanged;
        self.inner.state.send_if_modified(|state| {
            transition = state.apply(action);
            transition.is_change()
        });
        if transition == Transition::Stale {
            debug!("dropped a result of a previous conversation");
        }
        transition
    }
}

/// Clears the in-flight flag when a send ends, including by cancellation.
struct SettleOnDrop<'a>(&'a ConversationStore);

impl Drop for SettleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.apply(Action::SendSettled);
    }
}
