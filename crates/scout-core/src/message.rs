//! Conversation Messages
//!
//! Role/content pairs, ordered and append-only within a conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System prompt/instructions
    System,
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool result (injected as context)
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

impl Role {
    /// Whether this role is shown in the chat transcript.
    ///
    /// System prompts and tool traffic are reasoning-loop internals; the
    /// browser only ever sees user and assistant entries.
    pub fn is_visible(self) -> bool {
        matches!(self, Role::User | Role::Assistant)
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text content
    pub content: String,

    /// Timestamp
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a tool result message
    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(Role::Tool, content)
    }

    /// Estimate token count (rough approximation)
    pub fn estimate_tokens(&self) -> u32 {
        // ~4 characters per token, +4 for role overhead
        (self.content.len() / 4) as u32 + 4
    }
}

/// Conversation history with utility methods
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,

    /// Maximum context length (in estimated tokens)
    #[serde(default = "default_max_context")]
    max_context_tokens: u32,
}

fn default_max_context() -> u32 {
    8192
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut conv = Self::new();
        conv.push(Message::system(prompt));
        conv
    }

    /// Seed a conversation with a single assistant greeting.
    ///
    /// This is what a fresh chat session starts from; the greeting counts
    /// toward the visible transcript.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut conv = Self::new();
        conv.push(Message::assistant(greeting));
        conv
    }

    /// Add a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get messages as mutable
    pub fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }

    /// Get the last message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Messages shown in the chat transcript (user/assistant only)
    pub fn visible_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role.is_visible())
    }

    /// Number of transcript-visible messages
    pub fn visible_len(&self) -> usize {
        self.visible_messages().count()
    }

    /// Clear all messages except system prompt
    pub fn clear_history(&mut self) {
        self.messages.retain(|m| m.role == Role::System);
    }

    /// Estimate total tokens in conversation
    pub fn estimate_tokens(&self) -> u32 {
        self.messages.iter().map(Message::estimate_tokens).sum()
    }

    /// Truncate to fit within the token limit, preserving the system prompt
    /// and the most recent messages
    pub fn truncate_to_fit(&mut self) {
        while self.estimate_tokens() > self.max_context_tokens && self.messages.len() > 2 {
            if let Some(pos) = self.messages.iter().position(|m| m.role != Role::System) {
                // Never drop the most recent message
                if pos < self.messages.len() - 1 {
                    self.messages.remove(pos);
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("What is Generative AI?");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "What is Generative AI?");
    }

    #[test]
    fn test_greeting_seed() {
        let conv = Conversation::with_greeting("Hi there! How can I help you today?");
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.last().unwrap().role, Role::Assistant);
    }

    #[test]
    fn test_visible_messages_skip_internals() {
        let mut conv = Conversation::with_system_prompt("You are helpful.");
        conv.push(Message::user("Hi"));
        conv.push(Message::tool("[lookup result]"));
        conv.push(Message::assistant("Hello!"));

        assert_eq!(conv.len(), 4);
        assert_eq!(conv.visible_len(), 2);
    }

    #[test]
    fn test_truncate_keeps_system_and_latest() {
        let mut conv = Conversation {
            messages: Vec::new(),
            max_context_tokens: 40,
        };
        conv.push(Message::system("sys"));
        for i in 0..20 {
            conv.push(Message::user(format!("message number {i}")));
        }
        conv.truncate_to_fit();

        assert!(conv.estimate_tokens() <= 40 || conv.len() <= 2);
        assert_eq!(conv.messages()[0].role, Role::System);
        assert_eq!(conv.last().unwrap().content, "message number 19");
    }
}
