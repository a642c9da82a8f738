//! A local scripted chat backend for testing purpose.

mod preset;

use std::collections::{HashMap, VecDeque};
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use agent_chat_protocol::{
    BackendError, ChatBackend, ChatRequest, ChatResponse, ConversationList,
    ConversationSummary, ErrorKind, HealthStatus, MessageList, StoredMessage,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Error {}

impl BackendError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Every call the backend has received, in order per operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallLog {
    pub list_conversations: usize,
    pub fetched_conversations: Vec<String>,
    pub chat_requests: Vec<ChatRequest>,
    pub health_checks: usize,
}

#[derive(Default)]
struct Script {
    conversations: Vec<ConversationSummary>,
    histories: HashMap<String, Vec<StoredMessage>>,
    replies: VecDeque<PresetReply>,
    list_failure: Option<String>,
    delay: Option<Duration>,
    calls: CallLog,
}

/// A local fake backend for testing purpose.
///
/// Before sending requests, you need to setup the script: the stored
/// conversations and the replies to upcoming chat requests. Replies are
/// consumed in order, one per chat request. If there are no replies left,
/// an error will be returned.
///
/// Clones share the same script, so a test can hand one clone to the code
/// under test and keep another to add replies or inspect [`CallLog`].
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    /// Stores a conversation, placing it at the top of the list.
    pub fn add_conversation(
        &self,
        id: &str,
        title: &str,
        messages: Vec<StoredMessage>,
    ) {
        let mut script = self.lock();
        script.conversations.insert(
            0,
            ConversationSummary {
                id: id.to_owned(),
                title: title.to_owned(),
                message_count: Some(messages.len() as u32),
                updated_at: None,
            },
        );
        script.histories.insert(id.to_owned(), messages);
    }

    #[inline]
    pub fn add_reply(&self, reply: impl Into<PresetReply>) {
        self.lock().replies.push_back(reply.into());
    }

    /// Makes every following list request fail with `message`.
    #[inline]
    pub fn fail_conversation_list<S: Into<String>>(&self, message: S) {
        self.lock().list_failure = Some(message.into());
    }

    /// Delays every response by `duration`.
    #[inline]
    pub fn set_delay(&self, duration: Duration) {
        self.lock().delay = Some(duration);
    }

    /// Returns a copy of the calls received so far.
    #[inline]
    pub fn calls(&self) -> CallLog {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for ScriptedBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let script = self.lock();
        f.debug_struct("ScriptedBackend")
            .field("conversations", &script.conversations.len())
            .field("pending_replies", &script.replies.len())
            .finish_non_exhaustive()
    }
}

impl ChatBackend for ScriptedBackend {
    type Error = Error;

    fn list_conversations(
        &self,
        _user_id: &str,
    ) -> impl Future<Output = Result<ConversationList, Self::Error>> + Send + 'static
    {
        let mut script = self.lock();
        script.calls.list_conversations += 1;
        let result = match &script.list_failure {
            Some(message) => Err(Error::new(message, ErrorKind::Transport)),
            None => Ok(ConversationList {
                conversations: script.conversations.clone(),
            }),
        };
        delayed(script.delay, result)
    }

    fn fetch_messages(
        &self,
        conversation_id: &str,
        _user_id: &str,
    ) -> impl Future<Output = Result<MessageList, Self::Error>> + Send + 'static
    {
        let mut script = self.lock();
        script
            .calls
            .fetched_conversations
            .push(conversation_id.to_owned());
        let result = match script.histories.get(conversation_id) {
            Some(messages) => Ok(MessageList {
                messages: messages.clone(),
            }),
            None => Err(Error::new(
                "backend returned 404 Not Found",
                ErrorKind::Status,
            )),
        };
        delayed(script.delay, result)
    }

    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, Self::Error>> + Send + 'static
    {
        let mut script = self.lock();
        script.calls.chat_requests.push(req.clone());
        let result = match script.replies.pop_front() {
            Some(PresetReply::Answer(answer)) => {
                Ok(answer.into_response(req.conversation_id.clone()))
            }
            Some(PresetReply::Failure { kind, message }) => {
                Err(Error::new(message, kind.into()))
            }
            None => Err(Error::new("no more replies", ErrorKind::Other)),
        };
        delayed(script.delay, result)
    }

    fn check_health(
        &self,
    ) -> impl Future<Output = Result<HealthStatus, Self::Error>> + Send + 'static
    {
        let mut script = self.lock();
        script.calls.health_checks += 1;
        let result = Ok(HealthStatus {
            status: "healthy".to_owned(),
            model: "scripted".to_owned(),
            vector_store: "memory".to_owned(),
            api_base: "local".to_owned(),
        });
        delayed(script.delay, result)
    }
}

fn delayed<T: Send + 'static>(
    delay: Option<Duration>,
    value: T,
) -> impl Future<Output = T> + Send + 'static {
    async move {
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        value
    }
}
