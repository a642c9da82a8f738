use serde::{Deserialize, Serialize};

/// The user identity used when none is configured.
///
/// The backend has no authentication, every client shares this identity
/// unless told otherwise.
pub const DEFAULT_USER_ID: &str = "user";

/// Body of a `POST /api/chat` request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message, sent as typed.
    pub message: String,
    /// The user identity.
    pub user_id: String,
    /// The conversation to continue, or `None` to let the backend start
    /// a new one.
    pub conversation_id: Option<String>,
}

impl ChatRequest {
    /// Creates a request for the given message.
    #[inline]
    pub fn new<M: Into<String>, U: Into<String>>(
        message: M,
        user_id: U,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            user_id: user_id.into(),
            conversation_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unpersisted_conversation_is_null() {
        let req = ChatRequest::new("hi", DEFAULT_USER_ID, None);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "message": "hi",
                "user_id": "user",
                "conversation_id": null,
            })
        );
    }
}
