use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use menovibe_core::KnowledgeBase;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagesRequest {
    #[serde(default)]
    pub messages: Option<Vec<IncomingMessage>>,
}

#[derive(Clone)]
pub struct KnowledgeController {
    knowledge_base: Arc<dyn KnowledgeBase>,
}

impl KnowledgeController {
    pub fn new(knowledge_base: Arc<dyn KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }
}

fn rejection(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

/// POST /messages/ - knowledge-base lookup for the first text message
pub async fn search_messages(
    State(controller): State<KnowledgeController>,
    payload: Result<Json<MessagesRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(e) => return rejection(StatusCode::BAD_REQUEST, e.body_text()),
    };

    let Some(first) = request.messages.as_ref().and_then(|m| m.first()) else {
        return rejection(StatusCode::BAD_REQUEST, "Missing 'messages' field in JSON body");
    };
    if first.kind != "text" {
        return rejection(StatusCode::BAD_REQUEST, "Only 'text' message type is supported");
    }
    let query = first.text.as_deref().unwrap_or_default();

    match controller.knowledge_base.search(query).await {
        Ok(results) => {
            tracing::info!(query, hits = results.len(), "knowledge base queried");
            (StatusCode::OK, Json(json!({ "results": results })))
        }
        Err(e) => {
            tracing::error!(query, error = %e, "knowledge base query failed");
            rejection(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
