//! Conversation session management.
//!
//! A `Session` is an append-only list of turns with a fixed title. The
//! `SessionStore` owns every session for the lifetime of the process, and the
//! `TurnAssembler` threads a question through history, the model, and back.

mod assembler;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use assembler::{AskOutcome, TurnAssembler};
pub use store::SessionStore;
pub use types::{Session, SessionSummary, Speaker, Turn};
