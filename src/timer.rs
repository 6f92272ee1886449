//! One-shot deadline timers for the cooperative event loop.
//!
//! The engine never spawns timer threads. Every debounce and settle window
//! is a [`OneShot`]: an optional deadline that the host polls with the
//! current time. Rearming replaces the previous deadline, so at most one
//! pending instance of each timer exists.

use std::time::Instant;

/// A single rearmable deadline.
///
/// `fire` returns `true` exactly once per armed deadline, the first time it
/// is polled at or after the deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneShot {
    deadline: Option<Instant>,
}

impl OneShot {
    /// Create an idle timer with no pending deadline.
    pub const fn idle() -> Self {
        Self { deadline: None }
    }

    /// Arm (or rearm) the timer to fire at `at`.
    ///
    /// Any previously pending deadline is discarded.
    pub const fn arm(&mut self, at: Instant) {
        self.deadline = Some(at);
    }

    /// Cancel the pending deadline, if any.
    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if any.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Poll the timer. Returns `true` if the deadline was due and has now
    /// been consumed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// The earlier of two optional deadlines.
pub fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, b) => b,
    }
}
