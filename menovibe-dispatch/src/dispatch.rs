use crate::{DispatchConfig, RelayGenerator, RemoteAgentDescriptor, RemoteAgentTool};
use futures::future::join_all;
use menovibe_core::{AggregatedResult, MenovibeError, Result, Tool};
use menovibe_server::{ClientConfig, resolve_agent_card};
use std::sync::Arc;

/// Registry of the configured specialists, in configuration order.
pub struct Dispatch {
    tools: Vec<Arc<RemoteAgentTool>>,
    client_config: ClientConfig,
}

impl Dispatch {
    /// Names each specialist after its address. No network traffic.
    pub fn new(config: &DispatchConfig) -> Result<Self> {
        let descriptors =
            config.addresses.iter().map(|a| RemoteAgentDescriptor::from_address(a)).collect();
        Self::from_descriptors(descriptors, config.client.clone())
    }

    /// Fetches every specialist's agent card concurrently. Unreachable cards fall back
    /// to address-derived names.
    pub async fn discover(config: &DispatchConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(config.client.connect_timeout)
            .build()
            .map_err(|e| MenovibeError::Config(format!("failed to build HTTP client: {}", e)))?;

        let lookups = config.addresses.iter().map(|address| {
            let http_client = &http_client;
            async move {
                match resolve_agent_card(http_client, address, config.card_timeout).await {
                    Ok(card) => RemoteAgentDescriptor::from_card(address, &card),
                    Err(e) => {
                        tracing::warn!(%address, error = %e, "agent card unavailable, naming specialist from its address");
                        RemoteAgentDescriptor::from_address(address)
                    }
                }
            }
        });
        let descriptors = join_all(lookups).await;
        Self::from_descriptors(descriptors, config.client.clone())
    }

    /// Duplicate names get a numeric suffix so every tool stays addressable.
    pub fn from_descriptors(
        descriptors: Vec<RemoteAgentDescriptor>,
        client_config: ClientConfig,
    ) -> Result<Self> {
        let mut tools: Vec<Arc<RemoteAgentTool>> = Vec::with_capacity(descriptors.len());
        for mut descriptor in descriptors {
            let base = descriptor.name.clone();
            let mut n = 2;
            while tools.iter().any(|t| t.name() == descriptor.name) {
                descriptor.name = format!("{}_{}", base, n);
                n += 1;
            }
            tracing::info!(name = %descriptor.name, address = %descriptor.base_url, "specialist registered");
            tools.push(Arc::new(RemoteAgentTool::new(descriptor, client_config.clone())?));
        }
        Ok(Self { tools, client_config })
    }

    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.iter().map(|t| t.clone() as Arc<dyn Tool>).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RemoteAgentTool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &RemoteAgentDescriptor> {
        self.tools.iter().map(|t| t.descriptor())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn call(&self, name: &str, text: &str) -> AggregatedResult {
        match self.get(name) {
            Some(tool) => tool.call(text).await,
            None => {
                tracing::warn!(name, "call to unknown specialist");
                AggregatedResult::Error(format!("Unknown specialist agent '{}'", name))
            }
        }
    }

    /// A generator streaming through to the named specialist.
    pub fn relay(&self, name: &str) -> Result<RelayGenerator> {
        let tool = self.get(name).ok_or_else(|| {
            MenovibeError::Config(format!("Unknown specialist agent '{}'", name))
        })?;
        RelayGenerator::new(tool.descriptor(), self.client_config.clone())
    }
}
