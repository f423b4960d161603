pub mod agent_card;
pub mod channel;
pub mod client;
pub mod sse;
pub mod types;

pub use agent_card::{AGENT_CARD_PATH, resolve_agent_card};
pub use channel::TaskChannel;
pub use client::{ClientConfig, RemoteAgentClient, invoke};
pub use sse::{FrameDecoder, decode_line, decode_lines, encode_frame};
pub use types::*;
