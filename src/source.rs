//! Chunk transport: accumulating a streamed text.
//!
//! How chunks are produced is outside the engine's scope; [`TextFeed`] is
//! the thin convenience that turns a channel of chunks into the full-text
//! snapshots the engine consumes. Producer threads send partial text; the
//! consumer pumps the feed on its own loop and hands the accumulated
//! snapshot to the preview.

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

/// Accumulates text chunks from a channel into a full snapshot.
#[derive(Debug)]
pub struct TextFeed {
    rx: Receiver<String>,
    text: String,
    closed: bool,
}

impl TextFeed {
    /// Create a feed reading from an existing receiver.
    pub const fn new(rx: Receiver<String>) -> Self {
        Self {
            rx,
            text: String::new(),
            closed: false,
        }
    }

    /// Create a connected `(sender, feed)` pair.
    pub fn channel() -> (Sender<String>, Self) {
        let (tx, rx) = unbounded();
        (tx, Self::new(rx))
    }

    /// Drain all pending chunks. Returns `true` if the snapshot changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(chunk) => {
                    self.text.push_str(&chunk);
                    changed = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }
        changed
    }

    /// The accumulated snapshot.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether all senders have hung up.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Discard the snapshot (new document on the same channel).
    pub fn clear(&mut self) {
        self.text.clear();
    }
}
