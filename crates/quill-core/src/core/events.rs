//! Exchange event plumbing.
//!
//! The assembler is the producer and the render side the consumer, one
//! pair per exchange, synchronized by a bounded channel. Every buffer
//! append pushes a full snapshot; the consumer recomputes its view from
//! scratch each time, so the contract is simply "you see every snapshot,
//! in order, ending with a terminal one".
//!
//! Events are serializable for future JSON output mode support.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::stream::StreamState;

/// Full-buffer snapshot pushed after every append and terminal transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferUpdate {
    /// The entire response buffer so far (the error message once Failed).
    pub buffer: String,
    pub state: StreamState,
}

impl BufferUpdate {
    /// True when this is the last snapshot the exchange will push.
    pub fn is_final(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Channel capacity for update streams.
///
/// Snapshots are small and the consumer keeps up chunk-by-chunk; the bound
/// exists to surface a wedged consumer instead of growing without limit.
pub const UPDATE_CHANNEL_CAPACITY: usize = 128;

/// Receiver half handed to the render side.
pub type UpdateReceiver = mpsc::Receiver<BufferUpdate>;

/// Sender half handed to the assembler.
///
/// Sends are reliable (awaited): the push model requires the consumer to
/// see every snapshot, so deltas are never dropped best-effort.
#[derive(Debug, Clone)]
pub struct UpdateSender {
    tx: mpsc::Sender<BufferUpdate>,
}

impl UpdateSender {
    /// Delivers one snapshot, waiting for channel capacity if needed.
    /// A closed channel (consumer gone) is not an error for the producer.
    pub async fn send(&self, update: BufferUpdate) {
        let _ = self.tx.send(update).await;
    }
}

/// Creates a bounded update channel with the default capacity.
pub fn create_update_channel() -> (UpdateSender, UpdateReceiver) {
    let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
    (UpdateSender { tx }, rx)
}
