//! HTTP/WebSocket Handlers

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::{HeaderMap, StatusCode},
    response::Response,
    Json,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};

use scout_core::{
    message::Message as ChatMessage,
    provider::GenerationOptions,
    reasoning::{Agent, AgentConfig},
    AgentError, Session, SessionId, SessionStore,
};
use scout_tools::SEARCH_AGENT_PROMPT;

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub tools: usize,
    pub default_key_configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub session_id: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// One transcript entry as shown in the browser
#[derive(Debug, Serialize)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub messages: Vec<TranscriptEntry>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

/// Message shown when neither the request nor the environment carries a key
const MISSING_KEY_MESSAGE: &str = "Please enter your API key to proceed";

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        tools: state.tools.len(),
        default_key_configured: state.default_api_key.is_some(),
    })
}

/// List models visible to the caller's credential
pub async fn list_models(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<scout_core::provider::ModelInfo>>, ApiError> {
    let supplied = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    let key = state.resolve_api_key(supplied).ok_or_else(|| {
        api_error(StatusCode::UNAUTHORIZED, "MISSING_API_KEY", MISSING_KEY_MESSAGE)
    })?;

    let provider = (state.make_provider)(&key);
    let models = provider
        .list_models()
        .await
        .map_err(|e| agent_error_response(&e))?;

    Ok(Json(models))
}

/// Main chat endpoint (non-streaming)
///
/// Appends the user turn, runs the agent on a working copy of the history,
/// and appends exactly one assistant message on success. On failure the
/// session keeps the user turn only and the error is returned inline.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    // Credential gate: without a key there is no model or tool traffic at all
    let key = state
        .resolve_api_key(payload.api_key.as_deref())
        .ok_or_else(|| {
            api_error(StatusCode::UNAUTHORIZED, "MISSING_API_KEY", MISSING_KEY_MESSAGE)
        })?;

    let text = payload.message.trim();
    if text.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "EMPTY_MESSAGE",
            "Message must not be empty",
        ));
    }

    // Load or create the session (seeded with the greeting)
    let session_id = payload
        .session_id
        .map(SessionId::from_string)
        .unwrap_or_default();
    let mut session = state
        .sessions
        .load(&session_id)
        .map_err(|e| agent_error_response(&e))?
        .unwrap_or_else(|| Session::with_id(session_id.clone()));

    session.conversation.push(ChatMessage::user(text));

    let model = payload
        .model
        .unwrap_or_else(|| scout_core::provider::DEFAULT_MODEL.into());

    let config = AgentConfig {
        system_prompt: SEARCH_AGENT_PROMPT.into(),
        generation: GenerationOptions {
            model: model.clone(),
            ..Default::default()
        },
        ..Default::default()
    };

    let provider = (state.make_provider)(&key);
    let agent = Agent::new(provider, state.tools.clone(), config);

    // The reasoning loop accumulates tool traffic; run it on a working copy
    // so the stored transcript stays user/assistant only
    let mut working = session.conversation.clone();
    let outcome = agent.run(&mut working).await;

    session.touch();

    match outcome {
        Ok(answer) => {
            session.conversation.push(ChatMessage::assistant(&answer));
            state
                .sessions
                .save(&session)
                .map_err(|e| agent_error_response(&e))?;

            Ok(Json(ChatResponse {
                message: answer,
                session_id: session_id.to_string(),
                model,
            }))
        }
        Err(e) => {
            // Keep the user turn; the transcript grows by exactly one
            state
                .sessions
                .save(&session)
                .map_err(|e| agent_error_response(&e))?;

            tracing::error!(session = %session_id, error = %e, "agent turn failed");
            Err(agent_error_response(&e))
        }
    }
}

/// Fetch the visible transcript for a session
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = SessionId::from_string(id);
    let session = state
        .sessions
        .load(&session_id)
        .map_err(|e| agent_error_response(&e))?
        .ok_or_else(|| {
            api_error(StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", "Unknown session")
        })?;

    Ok(Json(transcript(&session)))
}

/// Reset a session back to the seed greeting
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = SessionId::from_string(id);
    let mut session = state
        .sessions
        .load(&session_id)
        .map_err(|e| agent_error_response(&e))?
        .unwrap_or_else(|| Session::with_id(session_id.clone()));

    session.reset();
    state
        .sessions
        .save(&session)
        .map_err(|e| agent_error_response(&e))?;

    Ok(Json(transcript(&session)))
}

fn transcript(session: &Session) -> SessionResponse {
    SessionResponse {
        session_id: session.id.to_string(),
        messages: session
            .conversation
            .visible_messages()
            .map(|m| TranscriptEntry {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect(),
    }
}

fn agent_error_response(error: &AgentError) -> ApiError {
    let status = match error {
        AgentError::Auth(_) => StatusCode::UNAUTHORIZED,
        AgentError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        AgentError::ProviderUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, "AGENT_ERROR", error.user_message())
}

// ============================================================================
// Streaming
// ============================================================================

/// WebSocket streaming chat (model stream passthrough, no tool loop)
pub async fn chat_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_stream(socket, state))
}

async fn handle_stream(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                break;
            }
            _ => continue,
        };

        let request: ChatRequest = match serde_json::from_str(&msg) {
            Ok(r) => r,
            Err(e) => {
                let error = serde_json::json!({"type": "error", "error": e.to_string()});
                let _ = sender.send(Message::Text(error.to_string().into())).await;
                continue;
            }
        };

        let Some(key) = state.resolve_api_key(request.api_key.as_deref()) else {
            let error = serde_json::json!({"type": "error", "error": MISSING_KEY_MESSAGE});
            let _ = sender.send(Message::Text(error.to_string().into())).await;
            continue;
        };

        let model = request
            .model
            .unwrap_or_else(|| scout_core::provider::DEFAULT_MODEL.into());
        let messages = vec![
            ChatMessage::system(SEARCH_AGENT_PROMPT),
            ChatMessage::user(request.message),
        ];

        let options = GenerationOptions {
            model,
            ..Default::default()
        };

        let provider = (state.make_provider)(&key);
        match provider.complete_stream(&messages, &options).await {
            Ok(mut stream) => {
                while let Some(result) = stream.next().await {
                    match result {
                        Ok(chunk) => {
                            let response = serde_json::json!({
                                "type": "chunk",
                                "content": chunk.delta,
                                "done": chunk.done,
                            });
                            if sender
                                .send(Message::Text(response.to_string().into()))
                                .await
                                .is_err()
                            {
                                break;
                            }
                        }
                        Err(e) => {
                            let error =
                                serde_json::json!({"type": "error", "error": e.user_message()});
                            let _ = sender.send(Message::Text(error.to_string().into())).await;
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                let error = serde_json::json!({"type": "error", "error": e.user_message()});
                let _ = sender.send(Message::Text(error.to_string().into())).await;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scout_core::provider::{
        Completion, CompletionStream, FinishReason, LlmProvider, ModelInfo, ProviderInfo,
    };
    use scout_core::{MemorySessionStore, Result as CoreResult, ToolRegistry};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Provider that always answers with a fixed string, or always fails
    struct CannedProvider {
        answer: Option<String>,
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        async fn info(&self) -> CoreResult<ProviderInfo> {
            Ok(ProviderInfo {
                name: "canned".into(),
                models: Vec::new(),
                supports_streaming: false,
            })
        }

        async fn health_check(&self) -> CoreResult<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[scout_core::Message],
            options: &GenerationOptions,
        ) -> CoreResult<Completion> {
            match &self.answer {
                Some(answer) => Ok(Completion {
                    content: answer.clone(),
                    model: options.model.clone(),
                    usage: None,
                    finish_reason: Some(FinishReason::Stop),
                }),
                None => Err(AgentError::ProviderUnavailable("canned outage".into())),
            }
        }

        async fn complete_stream(
            &self,
            _messages: &[scout_core::Message],
            _options: &GenerationOptions,
        ) -> CoreResult<CompletionStream> {
            Err(AgentError::Provider("not streamed".into()))
        }

        async fn list_models(&self) -> CoreResult<Vec<ModelInfo>> {
            Ok(Vec::new())
        }
    }

    /// State whose factory counts how often a provider was built
    fn test_state(answer: Option<&str>) -> (AppState, Arc<AtomicUsize>) {
        let factory_calls = Arc::new(AtomicUsize::new(0));
        let calls = factory_calls.clone();
        let answer = answer.map(String::from);

        let state = AppState {
            tools: Arc::new(ToolRegistry::new()),
            sessions: Arc::new(MemorySessionStore::new()),
            make_provider: Arc::new(move |_key| {
                calls.fetch_add(1, Ordering::SeqCst);
                Arc::new(CannedProvider {
                    answer: answer.clone(),
                })
            }),
            default_api_key: None,
        };

        (state, factory_calls)
    }

    fn chat_request(message: &str, api_key: Option<&str>, session_id: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: message.into(),
            api_key: api_key.map(String::from),
            session_id: session_id.map(String::from),
            model: None,
        }
    }

    #[tokio::test]
    async fn test_missing_key_means_no_network_and_no_session() {
        let (state, factory_calls) = test_state(Some("unused"));

        let result = chat_handler(
            State(state.clone()),
            Json(chat_request("hello", None, Some("s1"))),
        )
        .await;

        let (status, body) = result.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.code, "MISSING_API_KEY");

        // The provider factory never ran and nothing was stored
        assert_eq!(factory_calls.load(Ordering::SeqCst), 0);
        assert!(state
            .sessions
            .load(&SessionId::from_string("s1"))
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_turn_appends_user_assistant_pair() {
        let (state, _) = test_state(Some("Generative AI creates new content."));

        let response = chat_handler(
            State(state.clone()),
            Json(chat_request("What is Generative AI?", Some("gsk_x"), Some("s1"))),
        )
        .await
        .unwrap();

        assert_eq!(response.0.message, "Generative AI creates new content.");

        // greeting + user + assistant
        let session = state
            .sessions
            .load(&SessionId::from_string("s1"))
            .unwrap()
            .unwrap();
        assert_eq!(session.conversation.visible_len(), 3);
        assert_eq!(
            session.conversation.last().unwrap().role,
            scout_core::Role::Assistant
        );
    }

    #[tokio::test]
    async fn test_transcript_length_is_one_plus_two_n() {
        let (state, _) = test_state(Some("ok"));

        for i in 0..3 {
            chat_handler(
                State(state.clone()),
                Json(chat_request(&format!("question {i}"), Some("gsk_x"), Some("s1"))),
            )
            .await
            .unwrap();
        }

        let session = state
            .sessions
            .load(&SessionId::from_string("s1"))
            .unwrap()
            .unwrap();
        assert_eq!(session.conversation.visible_len(), 1 + 2 * 3);
    }

    #[tokio::test]
    async fn test_agent_failure_keeps_user_turn_only() {
        let (state, _) = test_state(None);

        let result = chat_handler(
            State(state.clone()),
            Json(chat_request("hello", Some("gsk_x"), Some("s1"))),
        )
        .await;

        let (status, body) = result.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.code, "AGENT_ERROR");

        // greeting + user, no assistant entry for the failed turn
        let session = state
            .sessions
            .load(&SessionId::from_string("s1"))
            .unwrap()
            .unwrap();
        assert_eq!(session.conversation.visible_len(), 2);
        assert_eq!(
            session.conversation.last().unwrap().role,
            scout_core::Role::User
        );
    }

    #[tokio::test]
    async fn test_empty_message_is_rejected() {
        let (state, factory_calls) = test_state(Some("ok"));

        let result = chat_handler(
            State(state),
            Json(chat_request("   ", Some("gsk_x"), None)),
        )
        .await;

        let (status, body) = result.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "EMPTY_MESSAGE");
        assert_eq!(factory_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_session_returns_transcript() {
        let (state, _) = test_state(Some("fine"));

        chat_handler(
            State(state.clone()),
            Json(chat_request("hi", Some("gsk_x"), Some("s1"))),
        )
        .await
        .unwrap();

        let response = get_session(State(state), Path("s1".into())).await.unwrap();
        let messages = &response.0.messages;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "assistant"); // greeting
        assert_eq!(messages[1].role, "user");
    }

    #[tokio::test]
    async fn test_reset_returns_to_greeting() {
        let (state, _) = test_state(Some("fine"));

        chat_handler(
            State(state.clone()),
            Json(chat_request("hi", Some("gsk_x"), Some("s1"))),
        )
        .await
        .unwrap();

        let response = reset_session(State(state), Path("s1".into())).await.unwrap();
        assert_eq!(response.0.messages.len(), 1);
        assert_eq!(response.0.messages[0].role, "assistant");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (state, _) = test_state(Some("fine"));

        let result = get_session(State(state), Path("nope".into())).await;
        let (status, _) = result.unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
