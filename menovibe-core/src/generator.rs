use crate::{Result, session::Session};
use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

/// Incremental text produced by a generation loop. An `Err` item ends the run.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// The specialist's own LLM-driven run loop, as seen by a task endpoint.
#[async_trait]
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;

    /// Shown to callers while a task is being prepared.
    fn processing_message(&self) -> &str {
        "Preparing a response..."
    }

    async fn generate(&self, session: &Session, message: &str) -> Result<TextStream>;
}
