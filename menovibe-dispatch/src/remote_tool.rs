use crate::RemoteAgentDescriptor;
use async_trait::async_trait;
use menovibe_core::{AggregatedResult, MenovibeError, Result, Tool};
use menovibe_server::{ClientConfig, RemoteAgentClient};
use serde_json::{Value, json};
use tracing::Instrument;

/// One specialist, callable by the routing layer as `{"request": ..}`.
///
/// Remote failures are data: the tool answers `{"error": ..}` instead of failing.
pub struct RemoteAgentTool {
    descriptor: RemoteAgentDescriptor,
    client: RemoteAgentClient,
}

impl RemoteAgentTool {
    pub fn new(descriptor: RemoteAgentDescriptor, config: ClientConfig) -> Result<Self> {
        let client = RemoteAgentClient::with_config(&descriptor.base_url, config)?;
        Ok(Self { descriptor, client })
    }

    pub fn descriptor(&self) -> &RemoteAgentDescriptor {
        &self.descriptor
    }

    pub async fn call(&self, text: &str) -> AggregatedResult {
        self.client.invoke(text).await
    }

    fn extract_request(args: &Value) -> Option<String> {
        match args {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get("request").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }
}

#[async_trait]
impl Tool for RemoteAgentTool {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn description(&self) -> &str {
        &self.descriptor.description
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "request": {
                    "type": "string",
                    "description": format!("The question to send to the {} agent", self.descriptor.name)
                }
            },
            "required": ["request"]
        }))
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let span = menovibe_telemetry::tool_execute_span(&self.descriptor.name);
        let Some(request) = Self::extract_request(&args) else {
            return Err(MenovibeError::Tool(format!(
                "{} expects a string 'request' argument",
                self.descriptor.name
            )));
        };

        let result = self.call(&request).instrument(span).await;
        if let AggregatedResult::Error(message) = &result {
            tracing::warn!(tool = %self.descriptor.name, error = %message, "specialist returned an error");
        }
        Ok(serde_json::to_value(result)?)
    }
}
