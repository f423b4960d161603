use menovibe_server::AgentCard;
use reqwest::Url;

/// A specialist's base address plus the metadata the routing layer sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAgentDescriptor {
    pub base_url: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl RemoteAgentDescriptor {
    /// Describes a specialist without asking it anything.
    pub fn from_address(address: &str) -> Self {
        let name = name_from_address(address);
        Self {
            base_url: address.to_string(),
            description: format!("Remote specialist agent at {}", address),
            name,
            tags: Vec::new(),
        }
    }

    pub fn from_card(address: &str, card: &AgentCard) -> Self {
        let name = snake_case(&card.name);
        let name = if name.is_empty() { name_from_address(address) } else { name };
        let description = if card.description.trim().is_empty() {
            format!("Remote specialist agent at {}", address)
        } else {
            card.description.clone()
        };
        Self { base_url: address.to_string(), name, description, tags: card.tags() }
    }
}

/// `"Nutrition Expert"` and `"NutritionExpert"` both become `nutrition_expert`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        }
    }
    out.trim_end_matches('_').to_string()
}

/// `http://nutrition:8001` → `agent_nutrition_8001`
fn name_from_address(address: &str) -> String {
    let Ok(url) = Url::parse(address) else {
        return format!("agent_{}", snake_case(address));
    };
    let host = url.host_str().unwrap_or("remote");
    match url.port_or_known_default() {
        Some(port) => format!("agent_{}_{}", snake_case(host), port),
        None => format!("agent_{}", snake_case(host)),
    }
}
