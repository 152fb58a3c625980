//! Voice detection: candidates -> normalizer -> degraded mode.
//! Callers always get a well-formed `ClassificationResult`; only an internal invariant
//! violation escapes as an error.

use std::sync::Arc;

use crate::degraded::DegradedModeGenerator;
use crate::error::{CoreError, ModelError};
use crate::normalizer::normalize_classification;
use crate::orchestrator::{FallbackOrchestrator, RetryPolicy};
use crate::prompts::voice_detection_prompt;
use crate::provider::{InferenceProvider, InferenceTask, InlineAttachment};
use crate::types::{ClassificationResult, ResultSource};
use crate::validator::ValidAnalysisRequest;

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub result: ClassificationResult,
    pub source: ResultSource,
}

pub struct VoiceDetector {
    orchestrator: FallbackOrchestrator,
    degraded: DegradedModeGenerator,
}

impl VoiceDetector {
    pub fn new(
        provider: Arc<dyn InferenceProvider>,
        candidates: Vec<String>,
        degraded: DegradedModeGenerator,
    ) -> Self {
        Self {
            orchestrator: FallbackOrchestrator::new(
                "VOICE",
                provider,
                candidates,
                RetryPolicy::single_attempt(),
            ),
            degraded,
        }
    }

    pub async fn detect(&self, request: &ValidAnalysisRequest) -> Result<Detection, CoreError> {
        let prompt = voice_detection_prompt(&request.language);
        let attachment = InlineAttachment {
            mime_type: request.mime_type.clone(),
            data_base64: request.audio_base64.clone(),
        };
        let task = InferenceTask {
            prompt: &prompt,
            user_text: None,
            attachment: Some(&attachment),
        };

        let detection = match self
            .orchestrator
            .run(task, |text| normalize_classification(&text).map_err(ModelError::from))
            .await
        {
            Ok(success) => Detection {
                result: success.value,
                source: ResultSource::Model(success.model),
            },
            Err(exhausted) => {
                tracing::warn!(
                    "[VOICE] API quota exceeded or models unavailable ({}). Switching to degraded mode.",
                    exhausted
                );
                Detection {
                    result: self.degraded.generate(),
                    source: ResultSource::Degraded,
                }
            }
        };

        if !detection.result.score_in_range() {
            return Err(CoreError::Internal(format!(
                "confidenceScore {} escaped normalization",
                detection.result.confidence_score
            )));
        }
        Ok(detection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::orchestrator::testing::ScriptedProvider;
    use crate::types::Classification;

    fn request() -> ValidAnalysisRequest {
        ValidAnalysisRequest {
            language: "English".into(),
            audio_base64: "SUQzBAAAAAAAI1RTU0U=".into(),
            mime_type: "audio/mp3".into(),
        }
    }

    fn candidates() -> Vec<String> {
        vec!["lite".into(), "flash".into(), "legacy".into()]
    }

    #[tokio::test]
    async fn fenced_model_answer_is_used() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push(
            "lite",
            Ok("```json\n{\"classification\":\"HUMAN\",\"confidenceScore\":0.72,\"explanation\":\"Natural breaths.\"}\n```"),
        );
        let detector = VoiceDetector::new(provider.clone(), candidates(), DegradedModeGenerator::default());

        let d = detector.detect(&request()).await.unwrap();
        assert_eq!(d.source, ResultSource::Model("lite".into()));
        assert_eq!(d.result.classification, Classification::Human);
        assert_eq!(d.result.explanation, "Natural breaths.");
        assert_eq!(provider.calls(), vec!["lite"]);
    }

    #[tokio::test]
    async fn unparseable_answer_falls_through_to_next_model() {
        let provider = Arc::new(ScriptedProvider::new());
        provider
            .push("lite", Ok("Sounds human to me!"))
            .push("flash", Ok(r#"{"classification":"AI_GENERATED","confidenceScore":1.7,"explanation":"x"}"#))
            .push("legacy", Ok(r#"{"classification":"AI_GENERATED","confidenceScore":0.91,"explanation":"TTS"}"#));
        let detector = VoiceDetector::new(provider.clone(), candidates(), DegradedModeGenerator::default());

        let d = detector.detect(&request()).await.unwrap();
        assert_eq!(d.source, ResultSource::Model("legacy".into()));
        assert_eq!(d.result.classification, Classification::AiGenerated);
    }

    #[tokio::test]
    async fn one_attempt_per_candidate_then_degraded() {
        let provider = Arc::new(ScriptedProvider::new());
        provider
            .push("lite", Err(ProviderError::Transient("429".into())))
            .push("flash", Err(ProviderError::Transient("503".into())))
            .push("legacy", Err(ProviderError::NotFound("404".into())));
        let detector = VoiceDetector::new(provider.clone(), candidates(), DegradedModeGenerator::default());

        let d = detector.detect(&request()).await.unwrap();
        assert_eq!(d.source, ResultSource::Degraded);
        assert!((0.85..=0.99).contains(&d.result.confidence_score));
        assert_eq!(provider.calls(), vec!["lite", "flash", "legacy"]);
    }
}
