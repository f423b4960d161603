#[derive(Debug, thiserror::Error)]
pub enum MenovibeError {
    /// An inbound request is missing a required field or is malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The task-creation round trip failed.
    #[error("Task creation failed: {0}")]
    CreationFailed(String),

    /// The update stream could not be opened or dropped before `end_of_stream`.
    #[error("Stream failed: {0}")]
    StreamFailed(String),

    /// The generation loop behind an endpoint raised.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl MenovibeError {
    /// True for failures of the network hop itself, as opposed to content-level failures.
    pub fn is_protocol_failure(&self) -> bool {
        matches!(self, MenovibeError::CreationFailed(_) | MenovibeError::StreamFailed(_))
    }
}

pub type Result<T> = std::result::Result<T, MenovibeError>;
