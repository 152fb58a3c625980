//! Response Normalizer: raw model text -> `ClassificationResult`.

use crate::error::ParseError;
use crate::types::ClassificationResult;

/// Strip code fences and parse the model's JSON verdict.
///
/// An unknown `classification` or a `confidenceScore` outside [0, 1] is rejected rather
/// than clamped, so a misbehaving model falls through to the next candidate.
pub fn normalize_classification(raw: &str) -> Result<ClassificationResult, ParseError> {
    let body = strip_code_fences(raw);
    if body.is_empty() {
        return Err(ParseError::Empty);
    }
    let result: ClassificationResult =
        serde_json::from_str(&body).map_err(|e| ParseError::Json(e.to_string()))?;
    if !result.score_in_range() {
        return Err(ParseError::ScoreOutOfRange(result.confidence_score.to_string()));
    }
    Ok(result)
}

/// Remove every triple-backtick fence (with or without a language tag) and trim.
pub fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find("```") {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + 3..];
        // An opening fence may carry a tag such as `json`; drop it up to the line break.
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        rest = &rest[tag_len..];
    }
    out.push_str(rest);
    out.trim().to_string()
}
