//! Position synchronizer: the bridge between page index and scroll offset.
//!
//! Two directions need reconciling. Page changes issue a programmatic
//! scroll; user scrolls (in paged mode, once settled) derive a page. The
//! crux is loop prevention: a programmatic scroll observed back as a scroll
//! event must not recompute a conflicting page, which would re-issue a
//! scroll, and so on. The guard here is an explicit two-state machine
//! ([`ScrollGuard`]) with a single timer-driven release.

use crate::timer::{earliest, OneShot};
use std::time::{Duration, Instant};

/// State of the programmatic-scroll guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollGuard {
    /// No programmatic scroll pending; observed scrolls are user scrolls.
    Idle,
    /// A programmatic scroll was issued; observed scrolls are suppressed
    /// until the settle deadline passes or the host reports settled.
    InFlight,
}

/// Synchronizes scroll offset and page index without feedback loops.
#[derive(Debug)]
pub struct ScrollSync {
    settle: OneShot,
    debounce: OneShot,
    pending_offset: f64,
    follow_tail: bool,
    settle_delay: Duration,
    scroll_debounce: Duration,
    threshold: f64,
}

impl ScrollSync {
    /// Create a synchronizer. `threshold` is the page-turn bias as a
    /// fraction of the viewport extent.
    pub const fn new(settle_delay: Duration, scroll_debounce: Duration, threshold: f64) -> Self {
        Self {
            settle: OneShot::idle(),
            debounce: OneShot::idle(),
            pending_offset: 0.0,
            follow_tail: true,
            settle_delay,
            scroll_debounce,
            threshold,
        }
    }

    /// Guard state.
    pub const fn guard(&self) -> ScrollGuard {
        if self.settle.is_armed() {
            ScrollGuard::InFlight
        } else {
            ScrollGuard::Idle
        }
    }

    /// Whether a programmatic scroll is in flight.
    pub const fn in_flight(&self) -> bool {
        matches!(self.guard(), ScrollGuard::InFlight)
    }

    /// A navigation issued (or would have issued) a programmatic scroll.
    /// Raises the guard for the settle window and drops any pending
    /// scroll-derived page update, which is now superseded.
    pub fn begin_programmatic(&mut self, now: Instant) {
        self.settle.arm(now + self.settle_delay);
        self.debounce.cancel();
    }

    /// The host reports the programmatic scroll has settled; release the
    /// guard early.
    pub fn scroll_settled(&mut self) {
        self.settle.cancel();
    }

    /// An observed scroll event. Returns `true` if it was accepted as a
    /// user scroll (guard idle) and the derivation debounce was armed.
    pub fn observe_scroll(&mut self, offset: f64, now: Instant) -> bool {
        if self.in_flight() {
            return false;
        }
        self.pending_offset = offset;
        self.debounce.arm(now + self.scroll_debounce);
        true
    }

    /// Fire due timers. Returns the debounced offset when a scroll-derived
    /// page update should be attempted.
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        self.settle.fire(now);
        if self.debounce.fire(now) {
            Some(self.pending_offset)
        } else {
            None
        }
    }

    /// The page implied by a scroll offset, biased so a reader slightly
    /// past a boundary counts as having turned the page.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn candidate_page(&self, offset: f64, viewport_extent: f64) -> usize {
        if viewport_extent <= 0.0 {
            return 0;
        }
        let page = ((offset + self.threshold * viewport_extent) / viewport_extent).round();
        if page.is_sign_negative() {
            0
        } else {
            page as usize
        }
    }

    /// Whether the continuous-mode view should follow the trailing edge.
    pub const fn follows_tail(&self) -> bool {
        self.follow_tail
    }

    /// The user scrolled away from the tail: stop following.
    pub fn suspend_follow(&mut self) {
        if self.follow_tail {
            log::trace!("tail follow suspended by user scroll");
        }
        self.follow_tail = false;
    }

    /// The user returned to the tail (or a new document started): resume.
    pub const fn resume_follow(&mut self) {
        self.follow_tail = true;
    }

    /// Reset for a new document: guard down, timers cancelled, following.
    pub fn reset(&mut self) {
        self.settle.cancel();
        self.debounce.cancel();
        self.follow_tail = true;
    }

    /// Earliest pending deadline across the settle and debounce timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest(self.settle.deadline(), self.debounce.deadline())
    }
}
