use crate::a2a::AgentCard;
use menovibe_core::{Generator, InMemorySessionStore, KnowledgeBase, MenovibeError, Result, SessionStore};
use std::{sync::Arc, time::Duration};

pub const DEFAULT_UPDATE_MESSAGE: &str = "User is seeking advice.";

/// Security configuration for the task endpoint.
#[derive(Clone, Debug)]
pub struct SecurityConfig {
    /// Allowed origins for CORS (empty = allow all)
    pub allowed_origins: Vec<String>,
    /// Maximum request body size in bytes (default: 1MB)
    pub max_body_size: usize,
    /// Time allowed to produce response headers. Streams are not cut off by it.
    pub request_timeout: Duration,
    /// Whether generation errors are reported verbatim in error events
    pub expose_error_details: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_body_size: 1024 * 1024,
            request_timeout: Duration::from_secs(30),
            expose_error_details: false,
        }
    }
}

impl SecurityConfig {
    /// Permissive CORS, detailed errors
    pub fn development() -> Self {
        Self { request_timeout: Duration::from_secs(60), expose_error_details: true, ..Self::default() }
    }

    pub fn production(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins, ..Self::default() }
    }
}

/// Everything a specialist's task endpoint needs, built once at startup.
#[derive(Clone)]
pub struct ServerConfig {
    pub generator: Arc<dyn Generator>,
    pub session_store: Arc<dyn SessionStore>,
    pub agent_card: AgentCard,
    pub knowledge_base: Option<Arc<dyn KnowledgeBase>>,
    /// Used when an update request carries no `message` parameter.
    pub default_message: String,
    pub keep_alive_interval: Duration,
    /// Events buffered between the generation loop and the response writer.
    pub channel_capacity: usize,
    pub security: SecurityConfig,
}

impl ServerConfig {
    pub fn new(generator: Arc<dyn Generator>, agent_card: AgentCard) -> Self {
        Self {
            generator,
            session_store: Arc::new(InMemorySessionStore::new()),
            agent_card,
            knowledge_base: None,
            default_message: DEFAULT_UPDATE_MESSAGE.to_string(),
            keep_alive_interval: Duration::from_secs(15),
            channel_capacity: 32,
            security: SecurityConfig::default(),
        }
    }

    pub fn with_session_store(mut self, session_store: Arc<dyn SessionStore>) -> Self {
        self.session_store = session_store;
        self
    }

    pub fn with_knowledge_base(mut self, knowledge_base: Arc<dyn KnowledgeBase>) -> Self {
        self.knowledge_base = Some(knowledge_base);
        self
    }

    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = message.into();
        self
    }

    pub fn with_keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.security.allowed_origins = origins;
        self
    }

    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.security.expose_error_details = expose;
        self
    }
}

/// Where a specialist process listens and how it advertises itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
    pub public_url: String,
}

impl ListenConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let host = host.into();
        let public_url = format!("http://{}:{}", host, port);
        Self { host, port, public_url }
    }

    /// Reads `A2A_HOST`, `PORT` and `PUBLIC_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("A2A_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| MenovibeError::Config(format!("invalid PORT '{}': {}", raw, e)))?,
            None => 8080,
        };
        let mut config = Self::new(host, port);
        if let Some(public_url) = lookup("PUBLIC_URL").filter(|u| !u.trim().is_empty()) {
            config.public_url = public_url.trim().trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
