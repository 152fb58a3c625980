//! Heuristic Risk Scorer and the simulated transcription step of the call-analysis path.
//! No remote service is involved; both halves are deterministic except for the delay.

use async_trait::async_trait;
use std::time::Duration;

use crate::types::{RiskAnalysisResult, RiskLevel};

/// Fraud-indicator keywords, matched as lower-case substrings.
pub const FRAUD_KEYWORDS: &[&str] = &["otp", "blocked", "account", "verify", "bank", "urgency"];

const BASE_SCORE: u32 = 40;
const PER_MATCH: u32 = 15;
pub const MAX_SCORE: u8 = 98;

/// Annotations shown with every analysis. Static: not derived from the matched keywords.
const REASONS: &[&str] = &[
    "Urgency detected",
    "Bank impersonation",
    "Request for sensitive data (OTP)",
];
const RISKY_PHRASES: &[&str] = &["blocked today", "share your OTP", "immediately"];

/// Demo transcript returned by the scripted transcriber.
pub const SCRIPTED_TRANSCRIPT: &str =
    "Sir your bank account will be blocked today. Please share your OTP immediately for verification.";

/// Distinct keywords present in the transcript, in keyword-list order.
pub fn matched_keywords(transcript: &str) -> Vec<&'static str> {
    let lower = transcript.to_lowercase();
    FRAUD_KEYWORDS
        .iter()
        .copied()
        .filter(|k| lower.contains(k))
        .collect()
}

/// `min(40 + 15 * matches, 98)`.
pub fn score_for_matches(matches: usize) -> u8 {
    let raw = BASE_SCORE.saturating_add(PER_MATCH.saturating_mul(matches as u32));
    raw.min(MAX_SCORE as u32) as u8
}

/// Score a transcript. Never fails.
pub fn score_transcript(transcript: &str) -> RiskAnalysisResult {
    let matches = matched_keywords(transcript);
    let score = score_for_matches(matches.len());
    RiskAnalysisResult {
        transcript: transcript.to_string(),
        risk_level: RiskLevel::from_score(score),
        score,
        reasons: REASONS.iter().map(|s| s.to_string()).collect(),
        risky_phrases: RISKY_PHRASES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Audio -> text. Real speech recognition is out of scope.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_base64: &str) -> String;
}

/// Waits `delay`, then returns the fixed demo transcript regardless of the audio.
#[derive(Debug, Clone)]
pub struct ScriptedTranscriber {
    delay: Duration,
}

impl ScriptedTranscriber {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, _audio_base64: &str) -> String {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        SCRIPTED_TRANSCRIPT.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_formula_and_cap() {
        let expected = [40, 55, 70, 85, 98, 98, 98];
        for (k, want) in expected.iter().enumerate() {
            assert_eq!(score_for_matches(k), *want, "k = {}", k);
        }
        assert_eq!(score_for_matches(usize::MAX), 98);
    }

    #[test]
    fn zero_matches_is_safe_at_forty() {
        let r = score_transcript("Hello, your parcel has arrived at the post office.");
        assert_eq!(r.score, 40);
        assert_eq!(r.risk_level, RiskLevel::Safe);
    }

    #[test]
    fn two_matches_stays_suspicious() {
        let r = score_transcript("Please VERIFY your Account details.");
        assert_eq!(matched_keywords(&r.transcript), vec!["account", "verify"]);
        assert_eq!(r.score, 70);
        assert_eq!(r.risk_level, RiskLevel::Suspicious);
    }

    #[test]
    fn three_matches_is_fraud() {
        let r = score_transcript("Your bank account is blocked");
        assert_eq!(r.score, 85);
        assert_eq!(r.risk_level, RiskLevel::Fraud);
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let r = score_transcript("otp otp OTP otp");
        assert_eq!(r.score, 55);
    }

    #[test]
    fn annotations_are_static() {
        let clean = score_transcript("nothing here");
        let risky = score_transcript(SCRIPTED_TRANSCRIPT);
        assert_eq!(clean.reasons, risky.reasons);
        assert_eq!(clean.risky_phrases, risky.risky_phrases);
        assert_eq!(risky.reasons.len(), 3);
        assert_eq!(risky.risky_phrases, vec!["blocked today", "share your OTP", "immediately"]);
    }

    #[test]
    fn scripted_transcript_scores_as_fraud() {
        let r = score_transcript(SCRIPTED_TRANSCRIPT);
        assert_eq!(
            matched_keywords(SCRIPTED_TRANSCRIPT),
            vec!["otp", "blocked", "account", "bank"]
        );
        assert_eq!(r.score, 98);
        assert_eq!(r.risk_level, RiskLevel::Fraud);
    }

    #[tokio::test]
    async fn scripted_transcriber_ignores_audio() {
        let t = ScriptedTranscriber::new(Duration::ZERO);
        assert_eq!(t.transcribe("SUQz").await, SCRIPTED_TRANSCRIPT);
        assert_eq!(t.transcribe("").await, SCRIPTED_TRANSCRIPT);
    }
}
