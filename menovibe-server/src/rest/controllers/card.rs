use crate::ServerConfig;
use crate::a2a::AgentCard;
use axum::{extract::State, response::Json};
use serde_json::{Value, json};

#[derive(Clone)]
pub struct CardController {
    agent_card: AgentCard,
}

impl CardController {
    pub fn new(config: &ServerConfig) -> Self {
        Self { agent_card: config.agent_card.clone() }
    }
}

/// GET /agent-card
pub async fn get_agent_card(State(controller): State<CardController>) -> Json<AgentCard> {
    Json(controller.agent_card)
}

/// GET /
pub async fn root_status(State(controller): State<CardController>) -> Json<Value> {
    Json(json!({ "status": format!("{} is running", controller.agent_card.name) }))
}
