use crate::ServerConfig;
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use futures::StreamExt;
use menovibe_core::{MenovibeError, Result, Session};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// `{"response": ..}` on success, `{"error": ..}` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryResponse {
    Response(String),
    Error(String),
}

#[derive(Clone)]
pub struct QueryController {
    config: ServerConfig,
}

impl QueryController {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Runs the local generator to completion for a one-shot anonymous caller.
    async fn answer(&self, text: &str) -> Result<String> {
        let owner_id = uuid::Uuid::new_v4().to_string();
        let store = &self.config.session_store;
        let session = store.get_or_create(&owner_id).await?;
        let outcome = self.collect(&session, text).await;
        store.remove(&owner_id).await?;
        outcome
    }

    async fn collect(&self, session: &Session, text: &str) -> Result<String> {
        let mut chunks = self.config.generator.generate(session, text).await?;
        let mut response = String::new();
        while let Some(chunk) = chunks.next().await {
            response.push_str(&chunk?);
        }
        Ok(response)
    }
}

/// POST /v1/query
pub async fn query(
    State(controller): State<QueryController>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> (StatusCode, Json<QueryResponse>) {
    let text = payload.ok().and_then(|Json(req)| req.text).filter(|t| !t.is_empty());
    let Some(text) = text else {
        tracing::warn!("query received without text");
        return (
            StatusCode::BAD_REQUEST,
            Json(QueryResponse::Error("Input 'text' is missing from the query.".to_string())),
        );
    };

    match controller.answer(&text).await {
        Ok(response) => (StatusCode::OK, Json(QueryResponse::Response(response))),
        Err(e) => {
            tracing::error!(error = %e, "query failed");
            let message = match (&e, controller.config.security.expose_error_details) {
                (_, true) => format!("An error occurred during agent execution: {}", e),
                (MenovibeError::InvalidRequest(detail), false) => detail.clone(),
                (_, false) => "An error occurred during agent execution.".to_string(),
            };
            (StatusCode::OK, Json(QueryResponse::Error(message)))
        }
    }
}
