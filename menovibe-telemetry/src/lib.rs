//! # Menovibe Telemetry
//!
//! Structured logging for the orchestrator and specialist processes.
//!
//! ```rust
//! use menovibe_telemetry::{init_telemetry, info};
//!
//! init_telemetry("nutrition-expert").expect("telemetry");
//! info!("ready");
//! ```

pub mod init;
pub mod spans;

pub use tracing::{Span, debug, error, info, instrument, trace, warn};

pub use init::{LogFormat, init_telemetry, init_with_format};
pub use spans::*;
