//! # menovibe-server
//!
//! Both ends of the specialist task protocol.
//!
//! - Receiving side: [`create_app`] builds the axum router a specialist serves
//!   (`POST /v1/tasks`, `GET /v1/tasks/{task_id}/updates`, `GET /agent-card`).
//! - Calling side: [`a2a::TaskChannel`] and [`a2a::RemoteAgentClient`] create a task on a
//!   remote specialist, read its `text/event-stream` reply and aggregate the text.

pub mod a2a;
pub mod config;
pub mod rest;

pub use a2a::{
    AgentCard, AgentSkill, ClientConfig, RemoteAgentClient, TaskChannel, resolve_agent_card,
};
pub use config::{DEFAULT_UPDATE_MESSAGE, ListenConfig, SecurityConfig, ServerConfig};
pub use rest::{TaskRegistry, create_app, create_app_with_registry};
