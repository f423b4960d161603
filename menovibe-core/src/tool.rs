use crate::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A callable unit exposed to the routing layer's tool-call mechanism.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    fn parameters_schema(&self) -> Option<Value> {
        None
    }

    async fn execute(&self, args: Value) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "echoes its arguments"
        }

        async fn execute(&self, args: Value) -> Result<Value> {
            Ok(args)
        }
    }

    #[tokio::test]
    async fn test_tool_execute() {
        let tool = EchoTool;
        assert_eq!(tool.name(), "echo");
        assert!(tool.parameters_schema().is_none());
        let out = tool.execute(serde_json::json!({"request": "hi"})).await.unwrap();
        assert_eq!(out["request"], "hi");
    }
}
