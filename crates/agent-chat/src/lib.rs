//! A terminal front end for the multi-agent chat.
//!
//! The crate includes a CLI tool for chatting in the terminal. The pieces
//! it is made of (configuration, command parsing, rendering) are exposed
//! as a library so other front ends can reuse them.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod command;
mod config;
pub mod render;
mod session;

pub use config::{
    BASE_URL_VAR, COMMIT_DELAY_VAR, CliConfig, ConfigError, USER_ID_VAR,
};
pub use session::{Session, SessionBuilder};

/// Re-exports of [`agent_chat_core`] crate.
pub mod core {
    pub use agent_chat_core::*;
}
