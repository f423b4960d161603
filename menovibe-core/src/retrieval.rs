use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One ranked search hit returned by the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub link: String,
    pub content: String,
}

/// Retrieval backend behind the specialists' search tool.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Snippet>>;
}
