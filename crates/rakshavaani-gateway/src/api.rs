//! HTTP surface: credential gate, JSON contracts and best-effort history around the core services.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, ConnectInfo, DefaultBodyLimit, State},
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rakshavaani_core::{
    check_fields, AnalysisRequest, Authorization, CallAnalyzer, ChatAssistant, DegradedModeGenerator, FieldCheck,
    GeminiClient, GuardConfig, HistoryStore, InferenceProvider, KeyAllowList, RecordKind, ScriptedTranscriber,
    VoiceDetector,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub(crate) const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) keys: Arc<KeyAllowList>,
    pub(crate) detector: Arc<VoiceDetector>,
    pub(crate) assistant: Arc<ChatAssistant>,
    pub(crate) analyzer: Arc<CallAnalyzer>,
    /// Model listing for diagnostics; absent when the provider is not Gemini.
    pub(crate) catalog: Option<Arc<GeminiClient>>,
    pub(crate) history: Option<Arc<HistoryStore>>,
}

impl AppState {
    /// Wire the core services from configuration around one provider handle.
    pub(crate) fn build(
        config: &GuardConfig,
        provider: Arc<dyn InferenceProvider>,
        history: Option<Arc<HistoryStore>>,
    ) -> Self {
        Self::build_with_degraded(config, provider, DegradedModeGenerator::default(), history)
    }

    /// Same as `build`, with the degraded-mode generator supplied by the caller.
    pub(crate) fn build_with_degraded(
        config: &GuardConfig,
        provider: Arc<dyn InferenceProvider>,
        degraded: DegradedModeGenerator,
        history: Option<Arc<HistoryStore>>,
    ) -> Self {
        Self {
            keys: Arc::new(config.allow_list()),
            detector: Arc::new(VoiceDetector::new(
                Arc::clone(&provider),
                config.voice_models.clone(),
                degraded,
            )),
            assistant: Arc::new(ChatAssistant::new(
                provider,
                config.chat_models.clone(),
                config.chat_retry_pause,
            )),
            analyzer: Arc::new(CallAnalyzer::new(Arc::new(ScriptedTranscriber::new(
                config.transcribe_delay,
            )))),
            catalog: None,
            history,
        }
    }

    pub(crate) fn with_catalog(mut self, client: Arc<GeminiClient>) -> Self {
        self.catalog = Some(client);
        self
    }

    /// sled writes are blocking; keep them off the async workers.
    async fn record(&self, kind: RecordKind, record: serde_json::Value) {
        let Some(store) = self.history.clone() else {
            return;
        };
        if let Err(e) = tokio::task::spawn_blocking(move || store.record_best_effort(kind, &record)).await {
            tracing::warn!("[HISTORY] {:?} record task failed: {}", kind, e);
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let presented = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
        match self.keys.authorize(presented) {
            Authorization::Authorized => Ok(()),
            Authorization::Unauthorized => Err(ApiError::Unauthorized),
        }
    }
}

/// Caller-visible failures. Model failures never get here.
#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized,
    MissingFields(&'static str),
    PayloadTooLarge,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid API key or malformed request".to_string(),
            ),
            ApiError::MissingFields(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body exceeds the upload limit".to_string(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("[GATEWAY] Internal error: {}", msg);
                let msg = if msg.is_empty() {
                    "Internal processing error".to_string()
                } else {
                    msg
                };
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(json!({ "status": "error", "message": message }))).into_response()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoiceDetectionBody {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    audio_base64: Option<String>,
    #[serde(default)]
    audio_format: Option<String>,
}

#[derive(Deserialize)]
struct ChatBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallAnalysisBody {
    #[serde(default)]
    audio_base64: Option<String>,
}

pub(crate) fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/voice-detection", post(voice_detection))
        .route("/api/chat", post(chat))
        .route("/api/call-analysis", post(call_analysis))
        .route("/api/models", get(list_models))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(log_request))
}

/// Body over the upload limit is a 413; any other unreadable body counts as missing fields.
fn read_body<T>(body: Result<Json<T>, JsonRejection>, missing: &'static str) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!("[GATEWAY] Rejected oversized body: {}", rejection);
            Err(ApiError::PayloadTooLarge)
        }
        Err(rejection) => {
            tracing::warn!("[GATEWAY] Unreadable body: {}", rejection);
            Err(ApiError::MissingFields(missing))
        }
    }
}

async fn log_request(request: Request<Body>, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    tracing::info!("[GATEWAY] {} {} from {}", request.method(), request.uri().path(), peer);
    next.run(request).await
}

async fn health() -> &'static str {
    "OK"
}

/// POST /api/voice-detection: key check, field check, then classification (never a model error).
async fn voice_detection(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<VoiceDetectionBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.authorize(&headers)?;

    const MISSING: &str = "Missing language or audioBase64";
    let body = read_body(body, MISSING)?;
    let request = AnalysisRequest {
        language: body.language,
        audio_base64: body.audio_base64,
        audio_format: body.audio_format,
    };
    let valid = match check_fields(&request) {
        FieldCheck::WellFormed(valid) => valid,
        FieldCheck::MissingFields => return Err(ApiError::MissingFields(MISSING)),
    };

    let detection = state
        .detector
        .detect(&valid)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    state
        .record(
            RecordKind::VoiceDetection,
            json!({
                "language": valid.language,
                "result": detection.result,
                "source": detection.source,
            }),
        )
        .await;

    Ok(Json(json!({
        "status": "success",
        "language": valid.language,
        "classification": detection.result.classification,
        "confidenceScore": detection.result.confidence_score,
        "explanation": detection.result.explanation,
    })))
}

/// POST /api/chat: remote models first, offline intents when they are all down.
async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.authorize(&headers)?;

    const MISSING: &str = "Missing message";
    let message = read_body(body, MISSING)?
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or(ApiError::MissingFields(MISSING))?;

    let reply = state.assistant.reply(&message).await;

    state
        .record(
            RecordKind::Chat,
            json!({
                "message": message,
                "reply": reply.text,
                "source": reply.source,
            }),
        )
        .await;

    Ok(Json(json!({ "status": "success", "reply": reply.text })))
}

/// POST /api/call-analysis: simulated transcript scored by the local heuristics.
async fn call_analysis(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CallAnalysisBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.authorize(&headers)?;

    const MISSING: &str = "Missing audioBase64";
    let audio = read_body(body, MISSING)?
        .audio_base64
        .filter(|a| !a.is_empty())
        .ok_or(ApiError::MissingFields(MISSING))?;

    let analysis = state.analyzer.analyze(&audio).await;
    let record = serde_json::to_value(&analysis).map_err(|e| ApiError::Internal(e.to_string()))?;
    state.record(RecordKind::CallAnalysis, record.clone()).await;

    let mut payload = json!({ "status": "success" });
    if let (Some(out), serde_json::Value::Object(fields)) = (payload.as_object_mut(), record) {
        out.extend(fields);
    }
    Ok(Json(payload))
}

/// GET /api/models: which models the configured provider key can see.
async fn list_models(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.authorize(&headers)?;

    let Some(catalog) = &state.catalog else {
        return Ok(Json(json!({
            "status": "error",
            "message": "Model catalog unavailable for this provider",
        })));
    };
    match catalog.list_models().await {
        Ok(models) => Ok(Json(json!({ "status": "success", "models": models }))),
        Err(e) => Ok(Json(json!({ "status": "error", "message": e.to_string() }))),
    }
}
