//! API Client

use serde::{Deserialize, Serialize};

/// Chat message for display
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Reply from the chat endpoint: the answer plus the session it belongs to
pub struct ChatReply {
    pub message: String,
    pub session_id: String,
}

/// Send a chat message to the backend
pub async fn send_chat(
    message: &str,
    api_key: &str,
    session_id: Option<&str>,
) -> Result<ChatReply, String> {
    let client = reqwest::Client::new();

    let mut body = serde_json::json!({
        "message": message,
        "api_key": api_key,
    });

    if let Some(id) = session_id {
        body["session_id"] = serde_json::json!(id);
    }

    let response = client
        .post("/api/chat")
        .json(&body)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        let data: serde_json::Value = response.json().await.map_err(|e| e.to_string())?;
        Ok(ChatReply {
            message: data["message"].as_str().unwrap_or("No response").to_string(),
            session_id: data["session_id"].as_str().unwrap_or_default().to_string(),
        })
    } else {
        let data: serde_json::Value = response.json().await.unwrap_or_default();
        Err(data["error"].as_str().unwrap_or("Request failed").to_string())
    }
}
