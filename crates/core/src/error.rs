use agent_chat_protocol::{BackendError, ErrorKind};

/// A failed backend call, detached from the backend's own error type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendFailure {
    kind: ErrorKind,
    message: String,
}

impl BackendFailure {
    pub(crate) fn from_error<E: BackendError>(err: &E) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Returns the kind of the underlying error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable description of the failure.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}
