//! A chat backend reached over HTTP+JSON.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use agent_chat_protocol::{
    BackendError, ChatBackend, ChatRequest, ChatResponse, ConversationList,
    ErrorKind, HealthStatus, MessageList,
};
use mime::Mime;
use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use tracing::Instrument;

pub use config::{
    DEFAULT_BASE_URL, HttpBackendConfig, HttpBackendConfigBuilder,
};

/// Error type for [`HttpBackend`].
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

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl BackendError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// HTTP chat backend.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    config: Arc<HttpBackendConfig>,
}

impl HttpBackend {
    /// Creates a new `HttpBackend` with the given configuration.
    #[inline]
    pub fn new(config: HttpBackendConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    /// Creates a new `HttpBackend` that sends requests through `client`,
    /// for callers that need custom timeouts or proxy settings.
    #[inline]
    pub fn with_client(client: Client, config: HttpBackendConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    /// Returns the configuration of this backend.
    #[inline]
    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }
}

impl ChatBackend for HttpBackend {
    type Error = Error;

    fn list_conversations(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<ConversationList, Self::Error>> + Send + 'static
    {
        let req = proto::conversations_url(&self.config, user_id)
            .map(|url| self.client.get(url));
        fetch_json(req).instrument(debug_span!("list conversations"))
    }

    fn fetch_messages(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<MessageList, Self::Error>> + Send + 'static
    {
        let req = proto::messages_url(&self.config, conversation_id, user_id)
            .map(|url| self.client.get(url));
        fetch_json(req).instrument(debug_span!(
            "fetch messages",
            conversation_id = conversation_id
        ))
    }

    fn send_chat(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, Self::Error>> + Send + 'static
    {
        let http_req = proto::chat_url(&self.config)
            .map(|url| self.client.post(url).json(req));
        fetch_json(http_req).instrument(debug_span!(
            "send chat",
            conversation_id = req.conversation_id.as_deref()
        ))
    }

    fn check_health(
        &self,
    ) -> impl Future<Output = Result<HealthStatus, Self::Error>> + Send + 'static
    {
        let req = proto::health_url(&self.config).map(|url| self.client.get(url));
        fetch_json(req).instrument(debug_span!("check health"))
    }
}

async fn fetch_json<T: DeserializeOwned>(
    req: Result<RequestBuilder, Error>,
) -> Result<T, Error> {
    let req = req?.header(header::ACCEPT, "application/json");
    let resp = match req.send().await {
        Ok(resp) => resp,
        Err(err) => {
            error!("request failed: {err}");
            return Err(Error::new(format!("{err}"), ErrorKind::Transport));
        }
    };

    let status = resp.status();
    if !status.is_success() {
        warn!("backend returned {status} for {}", resp.url());
        return Err(Error::new(
            format!("backend returned {status}"),
            ErrorKind::Status,
        ));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    let is_json = content_type
        .as_deref()
        .and_then(|v| v.parse().ok())
        .map(|m: Mime| {
            m.subtype() == mime::JSON
                || m.suffix().is_some_and(|s| s == mime::JSON)
        })
        .unwrap_or(false);
    if !is_json {
        return Err(Error::new(
            format!("Unexpected content type: {content_type:?}"),
            ErrorKind::MalformedBody,
        ));
    }

    let body = resp
        .bytes()
        .await
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Transport))?;
    trace!("got response body: {} bytes", body.len());
    proto::decode(&body)
}
