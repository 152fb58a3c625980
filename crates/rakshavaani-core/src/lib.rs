//! RakshaVaani core library.
//! Model fallback orchestration for the voice-security gateway, plus the local
//! heuristics it falls back to when no model answers.

pub mod analysis;
pub mod assistant;
pub mod config;
pub mod degraded;
pub mod detection;
pub mod error;
pub mod history;
pub mod intent;
pub mod normalizer;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
pub mod risk;
pub mod types;
pub mod validator;

pub use analysis::CallAnalyzer;
pub use assistant::{ChatAssistant, ChatReply};
pub use config::GuardConfig;
pub use degraded::{DegradedModeGenerator, RandomSource, ThreadRandom};
pub use detection::{Detection, VoiceDetector};
pub use error::{CoreError, Exhausted, HistoryError, ModelError, ParseError, ProviderError};
pub use history::{HistoryStore, RecordKind};
pub use orchestrator::{FallbackOrchestrator, RetryPolicy, Success};
pub use provider::{GeminiClient, InferenceProvider, InferenceTask, InlineAttachment};
pub use risk::{ScriptedTranscriber, Transcriber};
pub use types::{
    AnalysisRequest, Classification, ClassificationResult, ResultSource, RiskAnalysisResult, RiskLevel,
};
pub use validator::{check_fields, Authorization, FieldCheck, KeyAllowList, ValidAnalysisRequest};

/// Crate version, reported in the gateway's startup log.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
