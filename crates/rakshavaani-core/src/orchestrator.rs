//! Model Fallback Orchestrator.
//!
//! Walks an ordered candidate list one model at a time. Each candidate gets a bounded
//! number of attempts (with a fixed pause between them); a "model not found" failure skips
//! straight to the next candidate. The first accepted response wins and nothing after it is
//! called. Calls are strictly sequential, never raced.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{Exhausted, ModelError};
use crate::provider::{InferenceProvider, InferenceTask};

/// Per-candidate attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts_per_candidate: u32,
    pub pause: Duration,
}

impl RetryPolicy {
    /// Voice path: one call per candidate.
    pub fn single_attempt() -> Self {
        Self {
            attempts_per_candidate: 1,
            pause: Duration::ZERO,
        }
    }

    /// Chat path: two calls per candidate, `pause` apart.
    pub fn with_retry(pause: Duration) -> Self {
        Self {
            attempts_per_candidate: 2,
            pause,
        }
    }
}

/// First accepted response and the candidate that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    pub value: T,
    pub model: String,
}

pub struct FallbackOrchestrator {
    label: &'static str,
    provider: Arc<dyn InferenceProvider>,
    candidates: Vec<String>,
    policy: RetryPolicy,
}

impl FallbackOrchestrator {
    pub fn new(
        label: &'static str,
        provider: Arc<dyn InferenceProvider>,
        candidates: Vec<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            label,
            provider,
            candidates,
            policy,
        }
    }

    /// Try candidates in order. `accept` turns raw text into the caller's value; an `Err`
    /// from it counts as a failed attempt exactly like a provider error.
    pub async fn run<T, F>(&self, task: InferenceTask<'_>, mut accept: F) -> Result<Success<T>, Exhausted>
    where
        F: FnMut(String) -> Result<T, ModelError>,
    {
        let mut attempts = 0usize;
        let mut last_error: Option<ModelError> = None;

        for model in &self.candidates {
            for attempt in 1..=self.policy.attempts_per_candidate.max(1) {
                if attempt > 1 {
                    tokio::time::sleep(self.policy.pause).await;
                }
                attempts += 1;
                tracing::info!("[{}] Attempting model: {} (attempt {})", self.label, model, attempt);

                let outcome = match self.provider.generate(model, task).await {
                    Ok(text) => accept(text),
                    Err(e) => Err(ModelError::from(e)),
                };

                match outcome {
                    Ok(value) => {
                        return Ok(Success {
                            value,
                            model: model.clone(),
                        })
                    }
                    Err(err) => {
                        tracing::warn!("[{}] Model {} failed: {}", self.label, model, err);
                        let permanent = err.is_permanent();
                        last_error = Some(err);
                        if permanent {
                            break;
                        }
                    }
                }
            }
        }

        let exhausted = Exhausted {
            attempts,
            last_error,
        };
        tracing::warn!("[{}] {}", self.label, exhausted);
        Err(exhausted)
    }
}
