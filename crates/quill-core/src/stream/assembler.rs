//! Stream assembly: chunked bytes in, growing response buffer out.
//!
//! One `StreamAssembler` lives per exchange. It decodes each raw chunk,
//! deframes it into payload records, appends them to the response buffer,
//! and pushes a full-buffer snapshot to the consumer after every append.
//! `finish` and `fail` are the only terminal transitions; after either,
//! the buffer never changes again.

use serde::{Deserialize, Serialize};

use super::decode::Utf8Decoder;
use super::deframe::deframe;
use crate::core::events::{BufferUpdate, UpdateSender};

/// Lifecycle of one exchange's response stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamState {
    /// Chunks are still arriving; renders must stay math-safe.
    Streaming,
    /// Stream ended normally.
    Complete,
    /// Transport failed; the buffer holds the error message.
    Failed,
}

impl StreamState {
    /// Terminal states render verbatim and accept no further mutation.
    pub fn is_terminal(self) -> bool {
        !matches!(self, StreamState::Streaming)
    }
}

/// Reassembles one exchange's chunked response body.
pub struct StreamAssembler {
    decoder: Utf8Decoder,
    buffer: String,
    state: StreamState,
    updates: UpdateSender,
}

impl StreamAssembler {
    pub fn new(updates: UpdateSender) -> Self {
        Self {
            decoder: Utf8Decoder::new(),
            buffer: String::new(),
            state: StreamState::Streaming,
            updates,
        }
    }

    /// The response buffer as assembled so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Decodes and deframes one raw chunk, appending each record in order.
    ///
    /// Pushes one snapshot per non-empty record appended. Ignored once
    /// terminal.
    pub async fn push_chunk(&mut self, raw: &[u8]) {
        if self.state.is_terminal() {
            return;
        }

        let text = self.decoder.decode(raw);
        for record in deframe(&text) {
            if record.is_empty() {
                continue;
            }
            self.buffer.push_str(record);
            self.notify().await;
        }
    }

    /// Ends the stream normally.
    ///
    /// A dangling partial UTF-8 sequence flushes as U+FFFD before the
    /// state flips, so the final snapshot carries everything that arrived.
    pub async fn finish(&mut self) {
        if self.state.is_terminal() {
            return;
        }

        if let Some(replacement) = self.decoder.finish() {
            self.buffer.push(replacement);
        }
        self.state = StreamState::Complete;
        self.notify().await;
    }

    /// Ends the stream on a transport error.
    ///
    /// The buffer is replaced wholesale: the error message is the
    /// exchange's displayed content from here on.
    pub async fn fail(&mut self, message: &str) {
        if self.state.is_terminal() {
            return;
        }

        self.buffer = format!("Error: {message}");
        self.state = StreamState::Failed;
        self.notify().await;
    }

    async fn notify(&self) {
        self.updates
            .send(BufferUpdate {
                buffer: self.buffer.clone(),
                state: self.state,
            })
            .await;
    }
}
