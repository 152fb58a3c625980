//! RakshaVaani Gateway: voice-security API.
//! Voice detection, chat and call analysis over the core fallback orchestration.

mod api;

use rakshavaani_core::{GeminiClient, GuardConfig, HistoryStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Keys stay server-side; clients only ever send their x-api-key credential.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[rakshavaani-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GuardConfig::from_env();
    if config.provider_api_key.is_empty() {
        tracing::warn!(
            "[GATEWAY] GEMINI_API_KEY not set: model calls will fail and degraded/offline modes will answer"
        );
    }

    let client = match GeminiClient::new(
        config.provider_api_key.clone(),
        config.provider_base_url.clone(),
        config.provider_timeout,
    ) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("[GATEWAY] Cannot build provider client: {}", e);
            std::process::exit(1);
        }
    };

    let history = config.history_path.as_ref().and_then(|path| {
        match HistoryStore::open(Some(path)) {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                tracing::warn!("[GATEWAY] History disabled, store at {} failed to open: {}", path.display(), e);
                None
            }
        }
    });

    let state = api::AppState::build(&config, client.clone(), history).with_catalog(client);
    let app = api::router(state, config.max_body_bytes);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("[GATEWAY] Cannot bind {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "[GATEWAY] RakshaVaani v{} running on http://{}",
        rakshavaani_core::version(),
        config.bind_addr
    );
    tracing::info!(
        "[GATEWAY] Try: curl -X POST http://{}/api/voice-detection -H 'x-api-key: ...' ...",
        config.bind_addr
    );

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!("[GATEWAY] Server error: {}", e);
        std::process::exit(1);
    }
}
