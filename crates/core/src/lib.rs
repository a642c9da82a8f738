//! Client-side core of the multi-agent chat: the conversation store that
//! mediates every read and write through the backend, and the trace
//! reconstructor that explains how each answer was routed.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod agents;
mod backend_client;
pub mod conversation;
mod error;
mod store;
pub mod trace;

pub use agent_chat_protocol::{ConversationSummary, HealthStatus};
pub use error::BackendFailure;
pub use store::{
    Action, ConversationStore, ConversationStoreBuilder, DEFAULT_COMMIT_DELAY,
    SendOutcome, StoreState, Transition,
};
