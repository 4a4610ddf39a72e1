pub mod gemini;
pub mod local;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

pub use gemini::GeminiClient;
pub use local::LocalAI;
pub use openai::OpenAIClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// One conversation turn. On the wire the text travels as `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(rename = "content", alias = "text")]
    pub text: String,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    #[cfg(test)]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }
}

/// A remote text-completion service.
///
/// `messages` is the full ordered conversation: system instruction first,
/// caller context next, the user's message last.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short name used in logs and the health endpoint.
    fn name(&self) -> &str;

    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError>;
}
