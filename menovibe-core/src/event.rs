use crate::Result;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// One increment of specialist output as carried in a `data:` frame.
///
/// Serialized with a `type` tag, so the three variants appear on the wire as
/// `{"type":"text","text":..}`, `{"type":"error","text":..}` and `{"type":"end_of_stream"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Text { text: String },
    Error { text: String },
    EndOfStream,
}

impl Event {
    pub fn text(text: impl Into<String>) -> Self {
        Event::Text { text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Event::Error { text: text.into() }
    }

    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Event::EndOfStream)
    }

    /// Text or error payload; `None` for the sentinel.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Event::Text { text } | Event::Error { text } => Some(text),
            Event::EndOfStream => None,
        }
    }
}

pub type EventStream = Pin<Box<dyn Stream<Item = Result<Event>> + Send>>;
