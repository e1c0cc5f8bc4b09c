//! scout HTTP Server
//!
//! Axum-based server providing the chat REST API and WebSocket streaming
//! for the scout search assistant, backed by Groq's hosted models and the
//! Wikipedia/arXiv/DuckDuckGo lookup tools.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scout_core::{LlmProvider, MemorySessionStore, ToolRegistry};
use scout_runtime::GroqProvider;
use scout_tools::{
    source::{ArxivApi, DuckDuckGoApi, WikipediaApi},
    tools::{PaperSearchTool, WebSearchTool, WikiSummaryTool},
};

use crate::handlers::{
    chat_handler, chat_stream_handler, get_session, health_check, list_models, reset_session,
};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Lookup sources shared across tools
    let wikipedia = Arc::new(WikipediaApi::new());
    let arxiv = Arc::new(ArxivApi::new());
    let duckduckgo = Arc::new(DuckDuckGoApi::new());

    let mut tools = ToolRegistry::new();
    tools.register(WikiSummaryTool::new(wikipedia));
    tools.register(PaperSearchTool::new(arxiv));
    tools.register(WebSearchTool::new(duckduckgo));

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    // The credential travels with each chat request, so providers are
    // built per request; GROQ_API_KEY is only a server-side fallback
    let default_api_key = std::env::var("GROQ_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());

    if default_api_key.is_some() {
        tracing::info!("✓ Fallback Groq key configured");
    } else {
        tracing::info!("No fallback key - callers must supply their own");
    }

    let state = AppState {
        tools: Arc::new(tools),
        sessions: Arc::new(MemorySessionStore::new()),
        make_provider: Arc::new(|key: &str| {
            Arc::new(GroqProvider::new(key)) as Arc<dyn LlmProvider>
        }),
        default_api_key,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))

        // Chat API
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/stream", get(chat_stream_handler))
        .route("/api/session/{id}", get(get_session))
        .route("/api/session/{id}/reset", post(reset_session))

        // Static files (WASM frontend)
        .nest_service("/", tower_http::services::ServeDir::new("static"))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 scout server running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                 - Health check");
    tracing::info!("  GET  /api/models             - List available models");
    tracing::info!("  POST /api/chat               - Send message");
    tracing::info!("  GET  /api/chat/stream        - WebSocket streaming");
    tracing::info!("  GET  /api/session/:id        - Fetch transcript");
    tracing::info!("  POST /api/session/:id/reset  - Reset to greeting");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
