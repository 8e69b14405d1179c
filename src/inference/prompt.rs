// file: src/inference/prompt.rs
// description: plain role-prefixed prompt layout for the fine-tuned model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub user: String,
    pub assistant: String,
}

impl ChatExchange {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }
}

/// Replays the history as `User:` / `Assistant:` lines and ends with the
/// new user message.
pub fn format_prompt(history: &[ChatExchange], message: &str) -> String {
    let mut prompt = String::new();

    for exchange in history {
        prompt.push_str("User: ");
        prompt.push_str(&exchange.user);
        prompt.push('\n');
        prompt.push_str("Assistant: ");
        prompt.push_str(&exchange.assistant);
        prompt.push('\n');
    }

    prompt.push_str("User: ");
    prompt.push_str(message);
    prompt.push('\n');
    prompt
}
