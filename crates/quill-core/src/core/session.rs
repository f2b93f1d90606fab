//! In-memory session history.
//!
//! A session owns the ordered, append-only log of exchanges for one
//! process run. The log is an explicit object with no globals; nothing is
//! ever removed, and state resets with the process (no persistence layer).

use serde::{Deserialize, Serialize};

use crate::stream::StreamState;

/// One prompt submission and its response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub prompt: String,
    /// Response buffer; grows during streaming, immutable once settled.
    pub response: String,
    pub state: StreamState,
}

impl Exchange {
    pub fn is_settled(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Append-only log of exchanges.
#[derive(Debug, Default)]
pub struct Session {
    exchanges: Vec<Exchange>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the latest exchange has not reached a terminal state.
    ///
    /// Callers use this as the busy flag: one exchange in flight at a time.
    pub fn is_busy(&self) -> bool {
        self.exchanges.last().is_some_and(|e| !e.is_settled())
    }

    /// Opens a new exchange for a submitted prompt.
    ///
    /// # Errors
    /// Fails while a prior exchange is still streaming.
    pub fn begin(&mut self, prompt: &str) -> anyhow::Result<()> {
        if self.is_busy() {
            anyhow::bail!("an exchange is already in flight");
        }

        self.exchanges.push(Exchange {
            prompt: prompt.to_string(),
            response: String::new(),
            state: StreamState::Streaming,
        });
        Ok(())
    }

    /// Records the outcome of the in-flight exchange.
    pub fn settle(&mut self, response: String, state: StreamState) {
        debug_assert!(state.is_terminal());
        if let Some(last) = self.exchanges.last_mut()
            && !last.is_settled()
        {
            last.response = response;
            last.state = state;
        }
    }

    /// Exchanges in submission order.
    pub fn exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}
