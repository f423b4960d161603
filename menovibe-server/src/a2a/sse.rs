//! Server-sent-event framing: `data: <json>\n\n` lines carrying [`Event`] records.

use menovibe_core::{Event, Result};

pub const DATA_PREFIX: &str = "data:";

/// Decodes a single line. Anything that is not a well-formed `data:` frame yields `None`.
pub fn decode_line(line: &str) -> Option<Event> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() {
        return None;
    }
    match serde_json::from_str::<Event>(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!(error = %e, frame = payload, "discarding malformed frame");
            None
        }
    }
}

/// Lazily decodes a line sequence. The sentinel is yielded and nothing after it is read.
pub fn decode_lines<I, S>(lines: I) -> impl Iterator<Item = Event>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut done = false;
    lines
        .into_iter()
        .map_while(move |line| {
            if done {
                return None;
            }
            let event = decode_line(line.as_ref());
            done = event.as_ref().is_some_and(Event::is_end_of_stream);
            Some(event)
        })
        .flatten()
}

pub fn encode_frame(event: &Event) -> Result<String> {
    Ok(format!("{} {}\n\n", DATA_PREFIX, serde_json::to_string(event)?))
}

/// Incremental decoder for a chunked byte stream.
///
/// Bytes are buffered until a full line is available, so frames and multi-byte
/// characters may be split across network reads.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    finished: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the `end_of_stream` sentinel has been decoded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Event> {
        if self.finished {
            return Vec::new();
        }
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if self.accept(&line, &mut events) {
                self.buffer.clear();
                break;
            }
        }
        events
    }

    /// Decodes whatever is left once the source has ended without a trailing newline.
    pub fn finish(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.finished && !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.accept(&line, &mut events);
        }
        events
    }

    fn accept(&mut self, line: &[u8], events: &mut Vec<Event>) -> bool {
        let line = String::from_utf8_lossy(line);
        if let Some(event) = decode_line(line.trim_end_matches(['\r', '\n'])) {
            self.finished = event.is_end_of_stream();
            events.push(event);
        }
        self.finished
    }
}
