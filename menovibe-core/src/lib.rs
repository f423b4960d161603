//! # menovibe-core
//!
//! Shared types for the Menovibe specialist agents and the orchestrator that calls them.
//!
//! - [`Event`] - one increment of streamed output (`text`, `error`, `end_of_stream`)
//! - [`Task`] / [`TaskStatus`] - lifecycle of a single exchange
//! - [`EventAggregator`] / [`AggregatedResult`] - folding a stream into a caller-facing value
//! - [`Generator`] - the specialist's run loop, an external collaborator
//! - [`SessionStore`] - per-owner sessions reused across tasks
//! - [`Tool`] - callable unit handed to the routing layer
//! - [`MenovibeError`] / [`Result`] - unified error handling

pub mod aggregate;
pub mod error;
pub mod event;
pub mod generator;
pub mod retrieval;
pub mod session;
pub mod task;
pub mod tool;

pub use aggregate::{AggregatedResult, ErrorEventPolicy, EventAggregator, aggregate};
pub use error::{MenovibeError, Result};
pub use event::{Event, EventStream};
pub use generator::{Generator, TextStream};
pub use retrieval::{KnowledgeBase, Snippet};
pub use session::{InMemorySessionStore, Session, SessionStore};
pub use task::{Task, TaskStatus};
pub use tool::Tool;
