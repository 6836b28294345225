pub mod openai;

pub use openai::OpenAIClient;

use crate::error::ProviderError;
use crate::group_chat::Turn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    /// Participant that produced the message, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// External text-generation service driving every participant
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Produce the next message for `speaker`, given its role prompt and the
    /// conversation so far
    async fn complete(
        &self,
        role_prompt: &str,
        context: &[Turn],
        speaker: &str,
    ) -> Result<String, ProviderError>;
}

/// Build the chat message list seen by `speaker`.
///
/// The role prompt becomes the system message. Turns produced by the speaker
/// itself are replayed as assistant messages, everyone else's as user
/// messages tagged with their name.
pub fn build_messages(role_prompt: &str, context: &[Turn], speaker: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(context.len() + 1);
    messages.push(Message {
        role: MessageRole::System,
        content: role_prompt.to_string(),
        name: None,
    });

    for turn in context {
        let role = if turn.speaker == speaker {
            MessageRole::Assistant
        } else {
            MessageRole::User
        };
        messages.push(Message {
            role,
            content: turn.text.clone(),
            name: Some(turn.speaker.clone()),
        });
    }

    messages
}
