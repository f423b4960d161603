use crate::{MenovibeError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Conversation handle a generator runs against; reused across tasks from the same owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4().to_string(), owner_id: owner_id.into(), created_at: Utc::now() }
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_or_create(&self, owner_id: &str) -> Result<Session>;
    async fn get(&self, owner_id: &str) -> Result<Option<Session>>;
    async fn remove(&self, owner_id: &str) -> Result<Option<Session>>;
}

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 1024;

struct Entry {
    session: Session,
    last_used: Instant,
}

/// Process-local session table.
///
/// Sessions idle for longer than the TTL are dropped, and when the table is full the
/// least recently used session makes room. Expiry is applied on `get_or_create`.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Entry>>>,
    idle_ttl: Option<Duration>,
    max_sessions: usize,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl: Some(DEFAULT_IDLE_TTL),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` keeps idle sessions until capacity forces them out.
    pub fn with_idle_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.idle_ttl = ttl;
        self
    }

    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max.max(1);
        self
    }

    /// Number of stored sessions, expired ones included until the next eviction.
    /// A poisoned lock still reports the table as it was left.
    pub fn len(&self) -> usize {
        match self.sessions.read() {
            Ok(sessions) => sessions.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict(&self, sessions: &mut HashMap<String, Entry>) {
        if let Some(ttl) = self.idle_ttl {
            let before = sessions.len();
            sessions.retain(|_, entry| entry.last_used.elapsed() <= ttl);
            let expired = before - sessions.len();
            if expired > 0 {
                tracing::debug!(expired, "evicted idle sessions");
            }
        }
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(owner_id, _)| owner_id.clone());
            match oldest {
                Some(owner_id) => {
                    sessions.remove(&owner_id);
                    tracing::debug!(%owner_id, "evicted least recently used session");
                }
                None => break,
            }
        }
    }
}

fn poisoned<E>(_: E) -> MenovibeError {
    MenovibeError::Session("session table lock poisoned".to_string())
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, owner_id: &str) -> Result<Session> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        if let Some(entry) = sessions.get_mut(owner_id) {
            let fresh = self.idle_ttl.is_none_or(|ttl| entry.last_used.elapsed() <= ttl);
            if fresh {
                entry.last_used = Instant::now();
                tracing::debug!(owner_id, session_id = %entry.session.id, "reusing session");
                return Ok(entry.session.clone());
            }
        }
        sessions.remove(owner_id);
        self.evict(&mut sessions);

        let session = Session::new(owner_id);
        tracing::debug!(owner_id, session_id = %session.id, "created session");
        sessions.insert(
            owner_id.to_string(),
            Entry { session: session.clone(), last_used: Instant::now() },
        );
        Ok(session)
    }

    async fn get(&self, owner_id: &str) -> Result<Option<Session>> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions
            .get(owner_id)
            .filter(|entry| self.idle_ttl.is_none_or(|ttl| entry.last_used.elapsed() <= ttl))
            .map(|entry| entry.session.clone()))
    }

    async fn remove(&self, owner_id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.write().map_err(poisoned)?.remove(owner_id).map(|entry| entry.session))
    }
}
