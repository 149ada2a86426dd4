//! Streaming response decoder — chunked bytes in, typed events out.
//!
//! DESIGN
//! ======
//! The chat endpoint answers with an unbounded sequence of event frames
//! (`"data: " + JSON + "\n\n"`). Transport reads can split a frame at any
//! byte, including inside a multi-byte UTF-8 sequence, so the decoder
//! buffers raw bytes and only parses complete frames. It is pull-based:
//! `extend` buffers a chunk, `next_event` pops the next decoded event, so
//! callers consume events as they arrive instead of after full buffering.
//!
//! A malformed complete frame is fatal for the turn. A trailing partial
//! frame at end of stream is noise, not an error: the caller just stops
//! calling `next_event` and drops the decoder.

use crate::protocol::{EVENT_DELIMITER, EVENT_PREFIX, StreamEvent};

/// Error produced while decoding an event frame.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// A complete frame was not valid UTF-8.
    #[error("event frame is not valid UTF-8")]
    InvalidUtf8,

    /// A complete `data: ` frame did not carry parseable event JSON.
    #[error("malformed event frame: {0}")]
    MalformedFrame(String),
}

/// Incremental frame decoder over a chunked byte stream.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer another chunk of transport bytes.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Pop the next decoded event, skipping frames without the `data: `
    /// marker. Returns `Ok(None)` when the buffer holds no complete frame;
    /// feed more bytes with [`FrameDecoder::extend`] and call again.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when a complete frame is malformed. The
    /// turn is unrecoverable at that point; callers abort the stream read.
    pub fn next_event(&mut self) -> Result<Option<StreamEvent>, DecodeError> {
        while let Some(end) = find_delimiter(&self.buffer) {
            let frame: Vec<u8> = self.buffer.drain(..end + EVENT_DELIMITER.len()).collect();
            if let Some(event) = parse_frame(&frame[..end])? {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    /// Bytes of the trailing partial frame still buffered. A non-empty
    /// value at end of stream is discarded silently by dropping the decoder.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Byte offset of the next blank-line frame delimiter, if any.
fn find_delimiter(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(EVENT_DELIMITER.len())
        .position(|window| window == EVENT_DELIMITER.as_bytes())
}

/// Parse one complete frame. Frames without the event marker are noise
/// (`None`); marked frames must carry valid event JSON.
fn parse_frame(frame: &[u8]) -> Result<Option<StreamEvent>, DecodeError> {
    let text = std::str::from_utf8(frame).map_err(|_| DecodeError::InvalidUtf8)?;
    let Some(payload) = text.strip_prefix(EVENT_PREFIX) else {
        return Ok(None);
    };
    serde_json::from_str(payload)
        .map(Some)
        .map_err(|e| DecodeError::MalformedFrame(e.to_string()))
}

#[cfg(test)]
#[path = "stream_test.rs"]
mod tests;
