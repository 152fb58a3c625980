//! Request-scoped value types shared by the gateway and the core services.

use serde::{Deserialize, Serialize};

/// Verdict on whether a voice clip was synthesized or spoken by a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    AiGenerated,
    Human,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::AiGenerated => "AI_GENERATED",
            Classification::Human => "HUMAN",
        }
    }
}

/// Structured answer of the voice-detection path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub classification: Classification,
    pub confidence_score: f64,
    pub explanation: String,
}

impl ClassificationResult {
    /// True when `confidence_score` is a finite value in [0, 1].
    pub fn score_in_range(&self) -> bool {
        self.confidence_score.is_finite() && (0.0..=1.0).contains(&self.confidence_score)
    }
}

/// Inbound voice-detection payload after extraction from the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub language: Option<String>,
    pub audio_base64: Option<String>,
    /// Container format hint (`mp3`, `wav`, ...). Defaults to mp3.
    pub audio_format: Option<String>,
}

/// Risk band derived from the heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Fraud,
}

impl RiskLevel {
    /// `> 70` is Fraud, `41..=70` Suspicious, anything else Safe.
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            RiskLevel::Fraud
        } else if score > 40 {
            RiskLevel::Suspicious
        } else {
            RiskLevel::Safe
        }
    }
}

/// Output of the call-analysis path (transcript plus heuristic verdict).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysisResult {
    pub transcript: String,
    pub risk_level: RiskLevel,
    pub score: u8,
    pub reasons: Vec<String>,
    pub risky_phrases: Vec<String>,
}

/// Where a caller-visible result came from. Logged and persisted, never returned over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum ResultSource {
    Model(String),
    Degraded,
    Offline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_wire_names() {
        let json = serde_json::to_string(&Classification::AiGenerated).unwrap();
        assert_eq!(json, "\"AI_GENERATED\"");
        let parsed: Classification = serde_json::from_str("\"HUMAN\"").unwrap();
        assert_eq!(parsed, Classification::Human);
        assert!(serde_json::from_str::<Classification>("\"ROBOT\"").is_err());
    }

    #[test]
    fn risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Safe);
        assert_eq!(RiskLevel::from_score(41), RiskLevel::Suspicious);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::Suspicious);
        assert_eq!(RiskLevel::from_score(71), RiskLevel::Fraud);
        assert_eq!(RiskLevel::from_score(98), RiskLevel::Fraud);
    }

    #[test]
    fn result_serializes_camel_case() {
        let r = ClassificationResult {
            classification: Classification::Human,
            confidence_score: 0.9,
            explanation: "breathing".into(),
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["classification"], "HUMAN");
        assert_eq!(v["confidenceScore"], 0.9);
    }
}
