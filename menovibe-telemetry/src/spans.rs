//! Span helpers for the protocol boundaries

use tracing::Span;

/// Span around one task's event stream on the serving side.
///
/// # Example
/// ```
/// use menovibe_telemetry::task_stream_span;
/// let span = task_stream_span("nutrition_expert", "u1");
/// let _enter = span.enter();
/// ```
pub fn task_stream_span(agent_name: &str, task_id: &str) -> Span {
    tracing::info_span!("task.stream", agent.name = agent_name, task.id = task_id)
}

/// Span around one outbound round trip to a remote agent.
pub fn remote_call_span(address: &str) -> Span {
    tracing::info_span!("remote.call", remote.address = address, otel.kind = "client")
}

pub fn tool_execute_span(tool_name: &str) -> Span {
    tracing::info_span!("tool.execute", tool.name = tool_name)
}
