//! Chat assistant: candidates with same-model retry, then the offline intent responder.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ModelError;
use crate::intent::offline_reply;
use crate::orchestrator::{FallbackOrchestrator, RetryPolicy};
use crate::prompts::CHAT_SYSTEM_PROMPT;
use crate::provider::{InferenceProvider, InferenceTask};
use crate::types::ResultSource;

/// Always non-empty `text`. `source` is for logs and history only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub source: ResultSource,
}

pub struct ChatAssistant {
    orchestrator: FallbackOrchestrator,
}

impl ChatAssistant {
    pub fn new(provider: Arc<dyn InferenceProvider>, candidates: Vec<String>, retry_pause: Duration) -> Self {
        Self {
            orchestrator: FallbackOrchestrator::new(
                "CHAT",
                provider,
                candidates,
                RetryPolicy::with_retry(retry_pause),
            ),
        }
    }

    pub async fn reply(&self, user_text: &str) -> ChatReply {
        let task = InferenceTask {
            prompt: CHAT_SYSTEM_PROMPT,
            user_text: Some(user_text),
            attachment: None,
        };
        let accept = |text: String| {
            if text.trim().is_empty() {
                Err(ModelError::Transient("empty reply".into()))
            } else {
                Ok(text)
            }
        };

        match self.orchestrator.run(task, accept).await {
            Ok(success) => ChatReply {
                text: success.value,
                source: ResultSource::Model(success.model),
            },
            Err(exhausted) => {
                tracing::warn!(
                    "[CHAT] All connections failed ({}). Switching to offline responder.",
                    exhausted
                );
                ChatReply {
                    text: offline_reply(user_text).to_string(),
                    source: ResultSource::Offline,
                }
            }
        }
    }
}
