use menovibe_core::{MenovibeError, Result};
use menovibe_server::ClientConfig;
use std::time::Duration;

pub const REMOTE_AGENT_ADDRESSES_ENV: &str = "REMOTE_AGENT_ADDRESSES";

/// Which specialists the orchestrator talks to, and how.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Base addresses, trimmed and without trailing `/`. Never empty.
    pub addresses: Vec<String>,
    pub client: ClientConfig,
    /// Bound on each agent-card fetch during discovery.
    pub card_timeout: Duration,
}

impl DispatchConfig {
    pub fn new<I, S>(addresses: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses: Vec<String> = addresses
            .into_iter()
            .map(|a| normalize(a.as_ref()))
            .filter(|a| !a.is_empty())
            .collect();
        if addresses.is_empty() {
            return Err(MenovibeError::Config(format!(
                "{} must list at least one specialist address",
                REMOTE_AGENT_ADDRESSES_ENV
            )));
        }
        Ok(Self { addresses, client: ClientConfig::default(), card_timeout: Duration::from_secs(5) })
    }

    /// Reads the comma-separated `REMOTE_AGENT_ADDRESSES`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = lookup(REMOTE_AGENT_ADDRESSES_ENV).unwrap_or_default();
        Self::new(parse_addresses(&raw))
    }

    pub fn with_client_config(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    pub fn with_card_timeout(mut self, timeout: Duration) -> Self {
        self.card_timeout = timeout;
        self
    }
}

/// Splits a comma-separated list, dropping blank entries.
pub fn parse_addresses(raw: &str) -> Vec<String> {
    raw.split(',').map(normalize).filter(|a| !a.is_empty()).collect()
}

fn normalize(address: &str) -> String {
    address.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addresses() {
        let parsed = parse_addresses(" http://a:8001/ ,, http://b:8002,  ,http://c:8003//");
        assert_eq!(parsed, vec!["http://a:8001", "http://b:8002", "http://c:8003"]);
    }

    #[test]
    fn test_from_lookup() {
        let config = DispatchConfig::from_lookup(|key| {
            (key == REMOTE_AGENT_ADDRESSES_ENV).then(|| "http://a:8001/,http://b:8002".to_string())
        })
        .unwrap();
        assert_eq!(config.addresses, vec!["http://a:8001", "http://b:8002"]);
        assert_eq!(config.card_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_list_fails_fast() {
        assert!(matches!(DispatchConfig::from_lookup(|_| None), Err(MenovibeError::Config(_))));
        assert!(matches!(
            DispatchConfig::from_lookup(|_| Some(" , ,".to_string())),
            Err(MenovibeError::Config(_))
        ));
        assert!(DispatchConfig::new(Vec::<String>::new()).is_err());
    }
}
