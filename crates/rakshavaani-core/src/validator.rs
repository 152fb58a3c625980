//! Request gate: credential allow-list and required-field checks.
//! Runs before any remote call so rejected requests never spend provider quota.

use crate::types::AnalysisRequest;

/// Outcome of the credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authorized,
    Unauthorized,
}

/// Outcome of the field check on the voice path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    WellFormed(ValidAnalysisRequest),
    MissingFields,
}

/// A voice-detection request with both required fields present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAnalysisRequest {
    pub language: String,
    pub audio_base64: String,
    pub mime_type: String,
}

/// Accepted API keys: the deployment's real key plus the fixed test key.
#[derive(Debug, Clone, Default)]
pub struct KeyAllowList {
    keys: Vec<String>,
}

impl KeyAllowList {
    /// Empty keys are dropped so an unset secret never matches an empty header.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = keys
            .into_iter()
            .map(Into::into)
            .filter(|k: &String| !k.is_empty())
            .collect();
        Self { keys }
    }

    /// Exact match against the allow-list. A missing header is unauthorized.
    pub fn authorize(&self, presented: Option<&str>) -> Authorization {
        match presented {
            Some(key) if self.keys.iter().any(|k| k == key) => Authorization::Authorized,
            _ => Authorization::Unauthorized,
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Both `language` and the audio payload must be present and non-empty.
pub fn check_fields(request: &AnalysisRequest) -> FieldCheck {
    let language = non_empty(request.language.as_deref());
    let audio = non_empty(request.audio_base64.as_deref());
    match (language, audio) {
        (Some(language), Some(audio)) => FieldCheck::WellFormed(ValidAnalysisRequest {
            language: language.to_string(),
            audio_base64: audio.to_string(),
            mime_type: mime_type_for(request.audio_format.as_deref()),
        }),
        _ => FieldCheck::MissingFields,
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

fn mime_type_for(format: Option<&str>) -> String {
    let fmt = format
        .map(|f| f.trim().trim_start_matches("audio/").to_ascii_lowercase())
        .filter(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
        .unwrap_or_else(|| "mp3".to_string());
    format!("audio/{}", fmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> KeyAllowList {
        KeyAllowList::new(["real-secret", "sk_test_123456789"])
    }

    #[test]
    fn accepts_only_listed_keys() {
        let keys = allow_list();
        assert_eq!(keys.authorize(Some("real-secret")), Authorization::Authorized);
        assert_eq!(keys.authorize(Some("sk_test_123456789")), Authorization::Authorized);
        assert_eq!(keys.authorize(Some("sk_test_12345678")), Authorization::Unauthorized);
        assert_eq!(keys.authorize(Some("REAL-SECRET")), Authorization::Unauthorized);
        assert_eq!(keys.authorize(None), Authorization::Unauthorized);
    }

    #[test]
    fn empty_secret_never_authorizes() {
        let keys = KeyAllowList::new(["", "sk_test_123456789"]);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.authorize(Some("")), Authorization::Unauthorized);
    }

    #[test]
    fn missing_or_empty_fields_rejected() {
        let cases = [
            AnalysisRequest { language: None, audio_base64: Some("AAA".into()), audio_format: None },
            AnalysisRequest { language: Some("English".into()), audio_base64: None, audio_format: None },
            AnalysisRequest { language: Some(String::new()), audio_base64: Some("AAA".into()), audio_format: None },
            AnalysisRequest { language: Some("Tamil".into()), audio_base64: Some(String::new()), audio_format: None },
        ];
        for case in cases {
            assert_eq!(check_fields(&case), FieldCheck::MissingFields, "{:?}", case);
        }
    }

    #[test]
    fn well_formed_defaults_to_mp3() {
        let req = AnalysisRequest {
            language: Some("Hindi".into()),
            audio_base64: Some("SUQz".into()),
            audio_format: None,
        };
        match check_fields(&req) {
            FieldCheck::WellFormed(valid) => {
                assert_eq!(valid.language, "Hindi");
                assert_eq!(valid.mime_type, "audio/mp3");
            }
            FieldCheck::MissingFields => panic!("expected well-formed"),
        }
    }

    #[test]
    fn audio_format_selects_mime() {
        assert_eq!(mime_type_for(Some("WAV")), "audio/wav");
        assert_eq!(mime_type_for(Some("audio/ogg")), "audio/ogg");
        assert_eq!(mime_type_for(Some("../etc")), "audio/mp3");
    }
}
