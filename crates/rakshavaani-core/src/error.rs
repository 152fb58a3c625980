//! Error types for the RakshaVaani orchestration core.

use thiserror::Error;

/// Failure reported by the remote inference provider for a single call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The model identifier is unknown or unsupported. Retrying the same model is pointless.
    #[error("model not found: {0}")]
    NotFound(String),

    /// Timeout, quota exhaustion or any other failure that may clear on its own.
    #[error("provider request failed: {0}")]
    Transient(String),
}

/// Structured output could not be read from a model's text response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("response is empty")]
    Empty,

    #[error("response is not valid JSON: {0}")]
    Json(String),

    #[error("confidenceScore {0} is outside [0, 1]")]
    ScoreOutOfRange(String),
}

/// Why a single candidate attempt did not produce a usable response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("transient model failure: {0}")]
    Transient(String),

    #[error("permanent model failure: {0}")]
    Permanent(String),

    #[error("unusable model output: {0}")]
    Parse(#[from] ParseError),
}

impl ModelError {
    /// Permanent failures are never retried against the same candidate.
    pub fn is_permanent(&self) -> bool {
        matches!(self, ModelError::Permanent(_))
    }
}

impl From<ProviderError> for ModelError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(msg) => ModelError::Permanent(msg),
            ProviderError::Transient(msg) => ModelError::Transient(msg),
        }
    }
}

/// Every candidate failed. Carries the last failure for logs only.
#[derive(Debug, Clone)]
pub struct Exhausted {
    pub attempts: usize,
    pub last_error: Option<ModelError>,
}

impl std::fmt::Display for Exhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.last_error {
            Some(e) => write!(f, "all {} model attempts failed (last error: {})", self.attempts, e),
            None => write!(f, "no model candidates configured"),
        }
    }
}

impl std::error::Error for Exhausted {}

/// Best-effort history store failures. Callers log these and carry on.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history store: {0}")]
    Sled(#[from] sled::Error),

    #[error("history record encoding: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures that escape the fallback chain. Surfaced to callers as internal errors.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("internal processing error: {0}")]
    Internal(String),
}
