use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::ai::local::CAPABILITIES;
use crate::ai::{CompletionProvider, LocalAI, Message};
use crate::error::ChatError;
use crate::services::{ChatRecord, ChatStore};

pub const PROVIDER_FAILURE_WARNING: &str = "Using offline response system due to API issues";
pub const PERSISTENCE_FAILURE_WARNING: &str = "Failed to save chat history";

/// Reply handed back for one user message
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyResult {
    pub text: String,
    pub is_from_fallback: bool,
    pub warning: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// How the reply text was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Remote(String),
    LocalFallback {
        reply: &'static str,
        warning: Option<&'static str>,
    },
}

fn local_reply(message: &str) -> &'static str {
    match LocalAI::match_topic(message) {
        Some(topic) => {
            log::debug!("📚 Local reply for topic '{}'", topic.key());
            topic.reply()
        }
        None => CAPABILITIES,
    }
}

/// Whether a remote provider takes part in answering.
pub enum ProviderMode {
    Remote(Arc<dyn CompletionProvider>),
    LocalOnly,
}

/// Picks a reply for a tourist's message: remote completion when a provider
/// is configured, local keyword rules otherwise or when the provider fails.
pub struct ResponseSelector {
    mode: ProviderMode,
    store: Option<Arc<dyn ChatStore>>,
    system_prompt: String,
}

impl ResponseSelector {
    pub fn new(
        provider: Option<Arc<dyn CompletionProvider>>,
        store: Option<Arc<dyn ChatStore>>,
        system_prompt: impl Into<String>,
    ) -> Self {
        let mode = match provider {
            Some(provider) => ProviderMode::Remote(provider),
            None => ProviderMode::LocalOnly,
        };
        Self {
            mode,
            store,
            system_prompt: system_prompt.into(),
        }
    }

    /// Name of the active provider, `local` when running offline.
    pub fn provider_name(&self) -> &str {
        match &self.mode {
            ProviderMode::Remote(provider) => provider.name(),
            ProviderMode::LocalOnly => "local",
        }
    }

    pub async fn submit_message(
        &self,
        message: Option<&str>,
        user_id: Option<&str>,
        context: &[Message],
    ) -> Result<ReplyResult, ChatError> {
        let message = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => return Err(ChatError::InvalidInput),
        };

        let selection = self.select(message, context).await;
        let timestamp = Utc::now();

        match selection {
            Selection::Remote(text) => {
                // A blank user id counts as anonymous.
                let warning = match user_id {
                    Some(user_id) if !user_id.trim().is_empty() => {
                        self.persist(user_id, message, &text).await
                    }
                    _ => None,
                };
                Ok(ReplyResult {
                    text,
                    is_from_fallback: false,
                    warning: warning.map(str::to_string),
                    timestamp,
                })
            }
            Selection::LocalFallback { reply, warning } => Ok(ReplyResult {
                text: reply.to_string(),
                is_from_fallback: true,
                warning: warning.map(str::to_string),
                timestamp,
            }),
        }
    }

    async fn select(&self, message: &str, context: &[Message]) -> Selection {
        let provider = match &self.mode {
            ProviderMode::Remote(provider) => provider,
            ProviderMode::LocalOnly => {
                log::debug!("📡 No provider configured, using local rules");
                return Selection::LocalFallback {
                    reply: local_reply(message),
                    warning: None,
                };
            }
        };

        let mut messages = Vec::with_capacity(context.len() + 2);
        messages.push(Message::system(self.system_prompt.as_str()));
        messages.extend_from_slice(context);
        messages.push(Message::user(message));

        match provider.complete(&messages).await {
            Ok(reply) => {
                log::debug!("📡 Reply from {}", provider.name());
                Selection::Remote(reply)
            }
            Err(e) => {
                log::warn!("⚠️ {} error, falling back to local rules: {}", provider.name(), e);
                Selection::LocalFallback {
                    reply: local_reply(message),
                    warning: Some(PROVIDER_FAILURE_WARNING),
                }
            }
        }
    }

    /// Stores the exchange; a failure only yields a warning for the reply.
    async fn persist(&self, user_id: &str, message: &str, response: &str) -> Option<&'static str> {
        let store = self.store.as_ref()?;
        let record = ChatRecord::new(user_id, message, response);
        match store.append(&record).await {
            Ok(()) => None,
            Err(e) => {
                log::error!("Failed to save chat history for {}: {}", user_id, e);
                Some(PERSISTENCE_FAILURE_WARNING)
            }
        }
    }

    /// Most recent exchanges of a user, newest first.
    pub async fn history(&self, user_id: &str, limit: usize) -> anyhow::Result<Vec<ChatRecord>> {
        match &self.store {
            Some(store) => store.recent(user_id, limit).await,
            None => Ok(Vec::new()),
        }
    }
}
