//! Call analysis: transcript first, then the heuristic risk scorer.

use std::sync::Arc;

use crate::risk::{score_transcript, Transcriber};
use crate::types::RiskAnalysisResult;

pub struct CallAnalyzer {
    transcriber: Arc<dyn Transcriber>,
}

impl CallAnalyzer {
    pub fn new(transcriber: Arc<dyn Transcriber>) -> Self {
        Self { transcriber }
    }

    pub async fn analyze(&self, audio_base64: &str) -> RiskAnalysisResult {
        let transcript = self.transcriber.transcribe(audio_base64).await;
        let result = score_transcript(&transcript);
        tracing::info!(
            "[ANALYSIS] Transcript scored {} ({:?})",
            result.score,
            result.risk_level
        );
        result
    }
}
