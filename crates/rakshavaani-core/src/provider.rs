//! Remote inference provider: the trait the orchestrator calls, and the Gemini REST client.
//! The orchestrator only needs "model + prompt + optional inline attachment -> text".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CoreError, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The key travels in this header, never in the URL, so it cannot surface in error text.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Binary payload sent inline with the prompt (base64 data plus declared MIME type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAttachment {
    pub mime_type: String,
    pub data_base64: String,
}

/// One prompt sent to one model.
#[derive(Debug, Clone, Copy)]
pub struct InferenceTask<'a> {
    pub prompt: &'a str,
    /// Second text part (the user's chat message), sent after the prompt.
    pub user_text: Option<&'a str>,
    pub attachment: Option<&'a InlineAttachment>,
}

/// Minimal contract of a generative-model service.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    async fn generate(&self, model: &str, task: InferenceTask<'_>) -> Result<String, ProviderError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Inline { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

/// Gemini `generateContent` client over reqwest.
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Build a client with a per-call transport timeout.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Internal(format!("HTTP client setup: {}", e.without_url())))?;
        Ok(Self {
            api_key: api_key.into().trim().to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Names of the models visible to this key, without the `models/` prefix.
    pub async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let res = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .send()
            .await
            .map_err(|e| ProviderError::Transient(format!("ListModels request: {}", e.without_url())))?;
        let status = res.status();
        if !status.is_success() {
            return Err(ProviderError::Transient(format!(
                "ListModels failed: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )));
        }
        let parsed: ListModelsResponse = res
            .json()
            .await
            .map_err(|e| ProviderError::Transient(format!("ListModels response: {}", e.without_url())))?;
        Ok(parsed
            .models
            .into_iter()
            .map(|m| m.name.trim_start_matches("models/").to_string())
            .collect())
    }
}

#[async_trait]
impl InferenceProvider for GeminiClient {
    async fn generate(&self, model: &str, task: InferenceTask<'_>) -> Result<String, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        let mut parts = vec![Part::Text { text: task.prompt }];
        if let Some(text) = task.user_text {
            parts.push(Part::Text { text });
        }
        if let Some(att) = task.attachment {
            parts.push(Part::Inline {
                inline_data: InlineData {
                    mime_type: &att.mime_type,
                    data: &att.data_base64,
                },
            });
        }
        let body = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let res = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transient(format!("request to {}: {}", model, e.without_url())))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| ProviderError::Transient(format!("reading {} response: {}", model, e.without_url())))?;

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &text));
        }

        extract_text(&text)
    }
}

/// 404 or a "not found / not supported" message means the model id itself is bad.
fn classify_failure(status: u16, body: &str) -> ProviderError {
    let (message, api_status) = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .map(|e| (e.message, e.status))
        .unwrap_or_else(|| (body.chars().take(300).collect(), String::new()));
    let detail = format!("[{}] {}", status, message);
    let lower = message.to_lowercase();
    if status == 404
        || api_status == "NOT_FOUND"
        || lower.contains("is not found")
        || lower.contains("not supported for generatecontent")
    {
        ProviderError::NotFound(detail)
    } else {
        ProviderError::Transient(detail)
    }
}

fn extract_text(body: &str) -> Result<String, ProviderError> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Transient(format!("unreadable provider response: {}", e)))?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(ProviderError::Transient("provider returned no candidates".into()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let att = InlineAttachment {
            mime_type: "audio/mp3".into(),
            data_base64: "SUQz".into(),
        };
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: "prompt" },
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: &att.mime_type,
                            data: &att.data_base64,
                        },
                    },
                ],
            }],
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(v["contents"][0]["parts"][1]["inline_data"]["mime_type"], "audio/mp3");
        assert_eq!(v["contents"][0]["parts"][1]["inline_data"]["data"], "SUQz");
    }

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Namaste. "},{"text":"Stay safe."}]}},{"content":{"parts":[{"text":"ignored"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "Namaste. Stay safe.");
    }

    #[test]
    fn empty_candidates_is_transient() {
        assert!(matches!(
            extract_text(r#"{"candidates":[]}"#),
            Err(ProviderError::Transient(_))
        ));
        assert!(matches!(extract_text("<html>"), Err(ProviderError::Transient(_))));
    }

    #[test]
    fn not_found_detection() {
        let body = r#"{"error":{"code":404,"message":"models/gemini-exp-1206 is not found for API version v1beta","status":"NOT_FOUND"}}"#;
        assert!(matches!(classify_failure(404, body), ProviderError::NotFound(_)));

        let body = r#"{"error":{"code":400,"message":"models/embedding-001 is not supported for generateContent.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(classify_failure(400, body), ProviderError::NotFound(_)));

        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted (e.g. check quota).","status":"RESOURCE_EXHAUSTED"}}"#;
        match classify_failure(429, body) {
            ProviderError::Transient(msg) => assert!(msg.starts_with("[429]")),
            other => panic!("expected transient, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_provider_errors_do_not_carry_the_key() {
        const KEY: &str = "AIzaSECRET-DEPLOYMENT-KEY";
        // Port 1 on loopback refuses the connection immediately.
        let client = GeminiClient::new(KEY, "http://127.0.0.1:1/v1beta", Duration::from_secs(2)).unwrap();

        let err = client.list_models().await.unwrap_err();
        assert!(matches!(err, ProviderError::Transient(_)));
        assert!(!err.to_string().contains(KEY), "{}", err);

        let task = InferenceTask {
            prompt: "prompt",
            user_text: Some("hello"),
            attachment: None,
        };
        let err = client.generate("gemini-2.0-flash", task).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transient(_)));
        assert!(!err.to_string().contains(KEY), "{}", err);
        assert!(!err.to_string().contains("key="), "{}", err);
    }

    #[test]
    fn client_keeps_trimmed_key_and_base_url() {
        let client = GeminiClient::new(" k \n", "http://localhost:9/v1beta/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.api_key, "k");
        assert_eq!(client.base_url, "http://localhost:9/v1beta");
    }
}
