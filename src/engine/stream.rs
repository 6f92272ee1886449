//! Streaming classifier: is the content still growing, or has it settled?
//!
//! A document is [`Streaming`](StreamPhase::Streaming) while revisions keep
//! arriving and becomes [`Finalized`](StreamPhase::Finalized) after a quiet
//! period with no revision. There is deliberately no maximum streaming
//! duration: a stream that never goes quiet never finalizes.

use crate::timer::OneShot;
use std::time::{Duration, Instant};

/// Whether the content stream is still growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    /// Content is still being appended or replaced.
    Streaming,
    /// No revision for the debounce interval; treated as complete.
    Finalized,
}

/// Watches content revisions and debounces the settled state.
///
/// Exactly one finalize deadline is pending at any time: every revision
/// cancels and rearms it, so a finalize can never fire stale against a
/// superseded revision.
#[derive(Debug)]
pub struct StreamClassifier {
    phase: StreamPhase,
    finalize: OneShot,
    debounce: Duration,
}

impl StreamClassifier {
    /// Create a classifier in the `Streaming` phase with no deadline armed
    /// (the first revision arms it).
    pub const fn new(debounce: Duration) -> Self {
        Self {
            phase: StreamPhase::Streaming,
            finalize: OneShot::idle(),
            debounce,
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Whether the stream is still growing.
    pub const fn is_streaming(&self) -> bool {
        matches!(self.phase, StreamPhase::Streaming)
    }

    /// A content revision arrived: rearm the finalize deadline and, if the
    /// stream had settled, flip straight back to `Streaming`.
    pub fn on_revision(&mut self, now: Instant) {
        if self.phase == StreamPhase::Finalized {
            log::debug!("stream resumed after finalize");
        }
        self.phase = StreamPhase::Streaming;
        self.finalize.arm(now + self.debounce);
    }

    /// Fire the finalize deadline if due. Returns `true` on the transition
    /// to `Finalized`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.finalize.fire(now) {
            self.phase = StreamPhase::Finalized;
            log::debug!("stream finalized");
            true
        } else {
            false
        }
    }

    /// Reset for a new document: back to `Streaming`, deadline cancelled.
    pub fn reset(&mut self) {
        self.phase = StreamPhase::Streaming;
        self.finalize.cancel();
    }

    /// The pending finalize deadline, if armed.
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.finalize.deadline()
    }
}
