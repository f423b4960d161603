use crate::RemoteAgentDescriptor;
use async_trait::async_trait;
use futures::StreamExt;
use menovibe_core::{Event, Generator, MenovibeError, Result, Session, TextStream};
use menovibe_server::{ClientConfig, TaskChannel};

/// Serves a local task endpoint by forwarding each task to one remote specialist.
///
/// The local owner id is reused remotely, so the specialist keeps one session per caller.
pub struct RelayGenerator {
    name: String,
    channel: TaskChannel,
}

impl RelayGenerator {
    pub fn new(descriptor: &RemoteAgentDescriptor, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            name: descriptor.name.clone(),
            channel: TaskChannel::new(&descriptor.base_url, config)?,
        })
    }
}

#[async_trait]
impl Generator for RelayGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, session: &Session, message: &str) -> Result<TextStream> {
        let task_id = self.channel.create_task(&session.owner_id).await?;
        let mut events = self.channel.open_updates(&task_id, message).await?;
        tracing::debug!(target_agent = %self.name, %task_id, "relaying task");

        Ok(Box::pin(async_stream::stream! {
            while let Some(event) = events.next().await {
                match event {
                    Ok(Event::Text { text }) => yield Ok(text),
                    Ok(Event::Error { text }) => {
                        yield Err(MenovibeError::GenerationFailed(text));
                        return;
                    }
                    Ok(Event::EndOfStream) => return,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }))
    }
}
