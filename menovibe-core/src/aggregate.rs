//! Folding an ordered event sequence into the value handed back to a caller.

use crate::event::Event;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// Final outcome of one remote call. Serializes as `{"text": ..}` or `{"error": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatedResult {
    Text(String),
    Error(String),
}

impl AggregatedResult {
    pub fn is_error(&self) -> bool {
        matches!(self, AggregatedResult::Error(_))
    }

    pub fn into_result(self) -> std::result::Result<String, String> {
        match self {
            AggregatedResult::Text(text) => Ok(text),
            AggregatedResult::Error(error) => Err(error),
        }
    }
}

/// What to do with content-level `error` events when aggregating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorEventPolicy {
    /// Report the first error event when no text fragment was collected.
    #[default]
    SurfaceWhenEmpty,
    /// Ignore error events; an error-only stream aggregates to empty text.
    Tolerate,
}

#[derive(Debug, Default)]
pub struct EventAggregator {
    policy: ErrorEventPolicy,
    text: String,
    fragments: usize,
    first_error: Option<String>,
    finished: bool,
}

impl EventAggregator {
    pub fn new(policy: ErrorEventPolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    /// Folds one event. Returns `Break` once `end_of_stream` has been seen; later events are ignored.
    pub fn push(&mut self, event: &Event) -> ControlFlow<()> {
        if self.finished {
            return ControlFlow::Break(());
        }
        match event {
            Event::Text { text } => {
                self.text.push_str(text);
                self.fragments += 1;
            }
            Event::Error { text } => {
                tracing::debug!(error = %text, "error event in stream");
                if self.first_error.is_none() {
                    self.first_error = Some(text.clone());
                }
            }
            Event::EndOfStream => {
                self.finished = true;
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    pub fn saw_end_of_stream(&self) -> bool {
        self.finished
    }

    pub fn finish(self) -> AggregatedResult {
        match (self.policy, self.fragments, self.first_error) {
            (ErrorEventPolicy::SurfaceWhenEmpty, 0, Some(error)) => AggregatedResult::Error(error),
            _ => AggregatedResult::Text(self.text),
        }
    }
}

/// Aggregates a complete, in-order slice of events.
pub fn aggregate<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    policy: ErrorEventPolicy,
) -> AggregatedResult {
    let mut aggregator = EventAggregator::new(policy);
    for event in events {
        if aggregator.push(event).is_break() {
            break;
        }
    }
    aggregator.finish()
}
