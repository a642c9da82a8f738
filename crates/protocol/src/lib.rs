//! The contract between chat clients and the multi-agent chat backend.
//!
//! This crate describes the JSON payloads exchanged with the backend and
//! the [`ChatBackend`] trait every transport implements, so that the
//! conversation store can run against the real HTTP service or a scripted
//! fake without modification.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to. Decoding is
//! deliberately lenient: a field the backend omits takes its empty value
//! rather than failing the whole payload.

#![deny(missing_docs)]

mod backend;
mod error;
mod request;
mod response;

pub use backend::*;
pub use error::*;
pub use request::*;
pub use response::*;
