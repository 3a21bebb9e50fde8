//! Instruction template that frames every model call.

use crate::session::{Speaker, Turn};
use crate::Message;

pub const DEFAULT_INSTRUCTIONS: &str = "\
You are Lira, a capable and meticulous AI assistant.

Answer the user's latest message using the conversation so far as context.
Keep answers concise unless the question clearly calls for elaboration. \
Before answering, think through every part of the question, then reply with \
a well-structured response.";

/// Fixed persona/style instructions plus the replayed conversation.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    instructions: String,
}

impl PromptTemplate {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
        }
    }

    /// Render the model context: the instructions as a system message, then
    /// every turn in chronological order. History is never trimmed.
    pub fn build_context(&self, turns: &[Turn]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(Message::system(self.instructions.clone()));
        messages.extend(turns.iter().map(|turn| match turn.speaker() {
            Speaker::User => Message::user(turn.text()),
            Speaker::Assistant => Message::assistant(turn.text()),
        }));
        messages
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_INSTRUCTIONS)
    }
}
