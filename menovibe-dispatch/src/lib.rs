//! # menovibe-dispatch
//!
//! The Maestro side of the protocol: one [`RemoteAgentTool`] per configured specialist,
//! collected in a [`Dispatch`] registry and handed to the routing layer.
//!
//! ```rust,no_run
//! use menovibe_dispatch::{Dispatch, DispatchConfig};
//!
//! # async fn run() -> menovibe_core::Result<()> {
//! let config = DispatchConfig::from_env()?;
//! let dispatch = Dispatch::discover(&config).await?;
//! let answer = dispatch.call("nutrition_expert", "What helps with hot flashes?").await;
//! println!("{:?}", answer);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod descriptor;
pub mod dispatch;
pub mod relay;
pub mod remote_tool;

pub use config::{DispatchConfig, REMOTE_AGENT_ADDRESSES_ENV};
pub use descriptor::{RemoteAgentDescriptor, snake_case};
pub use dispatch::Dispatch;
pub use relay::RelayGenerator;
pub use remote_tool::RemoteAgentTool;
