use crate::a2a::TaskChannel;
use futures::StreamExt;
use menovibe_core::{AggregatedResult, ErrorEventPolicy, EventAggregator, Result};
use std::time::Duration;
use tracing::Instrument;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bound on the task-creation round trip.
    pub creation_timeout: Duration,
    /// Bound on the whole update stream. `None` leaves generation latency unbounded.
    pub stream_timeout: Option<Duration>,
    pub connect_timeout: Duration,
    pub error_policy: ErrorEventPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            creation_timeout: Duration::from_secs(10),
            stream_timeout: None,
            connect_timeout: Duration::from_secs(10),
            error_policy: ErrorEventPolicy::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_creation_timeout(mut self, timeout: Duration) -> Self {
        self.creation_timeout = timeout;
        self
    }

    pub fn with_stream_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stream_timeout = timeout;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorEventPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}

/// Performs one-shot round trips against a single remote agent.
///
/// Every call mints a fresh owner id, so no session is shared between calls.
pub struct RemoteAgentClient {
    channel: TaskChannel,
}

impl RemoteAgentClient {
    pub fn new(address: &str) -> Result<Self> {
        Self::with_config(address, ClientConfig::default())
    }

    pub fn with_config(address: &str, config: ClientConfig) -> Result<Self> {
        Ok(Self { channel: TaskChannel::new(address, config)? })
    }

    pub fn from_channel(channel: TaskChannel) -> Self {
        Self { channel }
    }

    pub fn address(&self) -> &str {
        self.channel.address()
    }

    /// Sends `text` and aggregates the reply. Never fails: transport and protocol
    /// failures come back as [`AggregatedResult::Error`] naming the remote address.
    pub async fn invoke(&self, text: &str) -> AggregatedResult {
        let span = menovibe_telemetry::remote_call_span(self.address());
        match self.round_trip(text).instrument(span).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(address = self.address(), error = %e, "remote agent call failed");
                AggregatedResult::Error(format!("Remote agent at {} failed: {}", self.address(), e))
            }
        }
    }

    async fn round_trip(&self, text: &str) -> Result<AggregatedResult> {
        let owner_id = uuid::Uuid::new_v4().to_string();
        let task_id = self.channel.create_task(&owner_id).await?;
        let mut events = self.channel.open_updates(&task_id, text).await?;

        let mut aggregator = EventAggregator::new(self.channel.config().error_policy);
        while let Some(event) = events.next().await {
            if aggregator.push(&event?).is_break() {
                break;
            }
        }
        tracing::debug!(%task_id, "remote task finished");
        Ok(aggregator.finish())
    }
}

/// Convenience for a single call with default settings.
pub async fn invoke(address: &str, text: &str) -> AggregatedResult {
    match RemoteAgentClient::new(address) {
        Ok(client) => client.invoke(text).await,
        Err(e) => AggregatedResult::Error(format!("Remote agent at {} failed: {}", address, e)),
    }
}
