use std::fmt;

use chrono::{DateTime, Utc};

use crate::llm::{Message, MessageRole};

/// Conversation history for one chat session, stored as alternating
/// user/assistant messages.
#[derive(Debug, Clone)]
pub struct ChatMemory {
    messages: Vec<Message>,
    started_at: DateTime<Utc>,
}

impl Default for ChatMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatMemory {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn add_exchange(&mut self, user_input: &str, reply: &str) {
        self.messages.push(Message::user(user_input));
        self.messages.push(Message::assistant(reply));
    }

    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    /// Forget every exchange and restart the session clock.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.started_at = Utc::now();
    }

    pub fn summary(&self) -> SessionSummary {
        let last_pair = match self.messages.as_slice() {
            [.., user, reply]
                if user.role == MessageRole::User && reply.role == MessageRole::Assistant =>
            {
                Some((user.content.clone(), reply.content.clone()))
            }
            _ => None,
        };
        let (last_user_input, last_agent_response) = last_pair.unzip();

        SessionSummary {
            turns: self.messages.len() / 2,
            last_user_input,
            last_agent_response,
            started_at: self.started_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub turns: usize,
    pub last_user_input: Option<String>,
    pub last_agent_response: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session Summary:")?;
        writeln!(f, "  started_at: {}", self.started_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "  turns: {}", self.turns)?;
        writeln!(
            f,
            "  last_user_input: {}",
            self.last_user_input.as_deref().unwrap_or("None")
        )?;
        write!(
            f,
            "  last_agent_response: {}",
            self.last_agent_response.as_deref().unwrap_or("None")
        )
    }
}
