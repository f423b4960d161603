use crate::a2a::AgentCard;
use menovibe_core::{MenovibeError, Result};
use std::time::Duration;

pub const AGENT_CARD_PATH: &str = "/agent-card";

/// Fetches a specialist's card from `{address}/agent-card`.
pub async fn resolve_agent_card(
    http_client: &reqwest::Client,
    address: &str,
    timeout: Duration,
) -> Result<AgentCard> {
    let url = format!("{}{}", address.trim_end_matches('/'), AGENT_CARD_PATH);

    let response = http_client
        .get(&url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| MenovibeError::Config(format!("Failed to fetch agent card from {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(MenovibeError::Config(format!(
            "Failed to fetch agent card from {}: HTTP {}",
            url,
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| MenovibeError::Config(format!("Failed to parse agent card from {}: {}", url, e)))
}
