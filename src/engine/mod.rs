//! The streaming pagination engine.
//!
//! [`PreviewEngine`] is a single-threaded state machine driven by
//! timestamped events: text revisions, geometry changes, observed user
//! scrolls, navigation calls, and [`PreviewEngine::poll`], which fires due
//! debounce deadlines. It owns all derived state (page count, current page,
//! stream phase, scroll position) and communicates outward only through
//! drained [`Effect`]s and read-only accessors.
//!
//! The engine measures nothing itself. The host renders the text, measures
//! the result's extent, and feeds it back via
//! [`PreviewEngine::set_content_extent`]; extents and offsets are abstract
//! layout units (the terminal widget uses one unit per row).

mod navigation;
mod pagination;
mod stream;
mod sync;

pub use navigation::{NavCommand, NavState};
pub use pagination::PageLayout;
pub use stream::{StreamClassifier, StreamPhase};
pub use sync::{ScrollGuard, ScrollSync};

use crate::config::{FinalizePolicy, PagingMode, PreviewConfig};
use crate::input::KeyCode;
use crate::timer::earliest;
use std::time::Instant;

/// Offsets closer than this are the same position.
const OFFSET_EPS: f64 = 1e-6;

/// How close to the trailing edge still counts as "at the tail" when
/// deciding whether a user scroll detaches tail-following.
const TAIL_SLACK: f64 = 0.5;

/// Side effects for the host to apply, drained after each event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Move the viewing surface to `offset`, animating if requested.
    ScrollTo {
        /// Target scroll offset in layout units.
        offset: f64,
        /// Whether to animate rather than jump.
        animate: bool,
    },
    /// The settled page position or page count changed. Raised at most
    /// once per change, never per intermediate recomputation.
    PageChanged {
        /// Current page index.
        page: usize,
        /// Total page count.
        total: usize,
    },
}

/// The streaming pagination and position-synchronization engine.
#[derive(Debug)]
pub struct PreviewEngine {
    config: PreviewConfig,
    raw: String,
    content_extent: f64,
    viewport_extent: f64,
    scroll_offset: f64,
    pages: PageLayout,
    stream: StreamClassifier,
    sync: ScrollSync,
    effects: Vec<Effect>,
    last_report: (usize, usize),
}

impl PreviewEngine {
    /// Create an engine with the given configuration and no content.
    pub fn new(config: PreviewConfig) -> Self {
        let stream = StreamClassifier::new(config.finalize_debounce);
        let sync = ScrollSync::new(
            config.settle_delay,
            config.scroll_debounce,
            config.page_turn_threshold,
        );
        Self {
            config,
            raw: String::new(),
            content_extent: 0.0,
            viewport_extent: 0.0,
            scroll_offset: 0.0,
            pages: PageLayout::new(),
            stream,
            sync,
            effects: Vec::new(),
            last_report: (0, 1),
        }
    }

    // --- Event inputs ---------------------------------------------------

    /// Supply the latest full text snapshot.
    ///
    /// The engine diffs against the previous snapshot: an identical text is
    /// a no-op, an extension is a streaming revision, and anything else is
    /// a wholesale replacement that resets the document (back to
    /// `Streaming`, page 0, tail-following re-enabled, in-flight timers for
    /// the superseded document cancelled).
    pub fn set_text(&mut self, text: &str, now: Instant) {
        if text == self.raw {
            return;
        }
        let replaced = !self.raw.is_empty() && !text.starts_with(self.raw.as_str());
        if replaced {
            self.reset_document(now);
        }
        self.raw.clear();
        self.raw.push_str(text);
        self.stream.on_revision(now);
    }

    /// The rendered content's measured extent changed (new revision laid
    /// out, or reflow at a new width).
    pub fn set_content_extent(&mut self, extent: f64, now: Instant) {
        self.content_extent = extent.max(0.0);
        self.geometry_changed(now);
    }

    /// The viewport's extent along the paging axis changed.
    pub fn set_viewport_extent(&mut self, extent: f64, now: Instant) {
        self.viewport_extent = extent.max(0.0);
        self.geometry_changed(now);
    }

    /// Switch the presentation mode, forcing a pagination recompute.
    ///
    /// Entering `Paged` derives the landing page from the current scroll
    /// offset so the reader stays where they were; entering `Continuous`
    /// keeps the offset and, mid-stream, resumes tail-following.
    pub fn set_mode(&mut self, mode: PagingMode, now: Instant) {
        if mode == self.config.mode {
            return;
        }
        self.config.mode = mode;
        self.pages.recompute(self.content_extent, self.viewport_extent);
        match mode {
            PagingMode::Paged => {
                if self.stream.is_streaming() {
                    self.pages.pin_to_last();
                } else {
                    let landing = self
                        .sync
                        .candidate_page(self.scroll_offset, self.viewport_extent)
                        .min(self.pages.count() - 1);
                    self.pages.go_to(landing);
                }
                self.align_to_page(now);
            }
            PagingMode::Continuous => {
                if self.stream.is_streaming() {
                    self.sync.resume_follow();
                    self.emit_scroll(self.tail_offset());
                }
            }
        }
        self.report_pages();
    }

    /// An observed user scroll moved the surface to `offset`.
    ///
    /// Programmatic scrolls must not be reported here (they are suppressed
    /// by the guard while it is up, but reporting them at all is the
    /// host's mistake); the host acknowledges those via
    /// [`PreviewEngine::notify_scroll_settled`] instead.
    pub fn on_scroll(&mut self, offset: f64, now: Instant) {
        let offset = offset.clamp(0.0, self.max_scroll_offset());
        self.scroll_offset = offset;
        if self.sync.in_flight() {
            return;
        }
        match self.config.mode {
            PagingMode::Continuous => {
                if self.stream.is_streaming() {
                    if offset + TAIL_SLACK < self.tail_offset() {
                        self.sync.suspend_follow();
                    } else {
                        self.sync.resume_follow();
                    }
                }
            }
            PagingMode::Paged => {
                if !self.stream.is_streaming() {
                    self.sync.observe_scroll(offset, now);
                }
            }
        }
    }

    /// The host finished applying a programmatic scroll; the guard can come
    /// down before the settle delay expires.
    pub fn notify_scroll_settled(&mut self) {
        self.sync.scroll_settled();
    }

    /// Go back one page (clamped at the first).
    pub fn previous(&mut self, now: Instant) {
        self.apply_nav(NavCommand::Previous, now);
    }

    /// Go forward one page (clamped at the last).
    pub fn next(&mut self, now: Instant) {
        self.apply_nav(NavCommand::Next, now);
    }

    /// Go to page `n` (clamped into bounds).
    pub fn go_to(&mut self, n: usize, now: Instant) {
        self.apply_nav(NavCommand::GoTo(n), now);
    }

    /// Apply a navigation command. Clamped, never fails; even a clamped
    /// no-op raises the programmatic-scroll guard (navigation intent).
    pub fn apply_nav(&mut self, command: NavCommand, now: Instant) {
        match command {
            NavCommand::Previous => self.pages.previous(),
            NavCommand::Next => self.pages.next(),
            NavCommand::First => self.pages.go_to(0),
            NavCommand::Last => self.pages.go_to(self.pages.count() - 1),
            NavCommand::GoTo(n) => self.pages.go_to(n),
        };
        self.sync.begin_programmatic(now);
        self.emit_scroll(self.pages.page_offset(self.viewport_extent));
        self.report_pages();
    }

    /// Handle a key press from a focused viewing surface.
    ///
    /// Bindings are active only in `Paged` mode and only once the stream
    /// has settled; returns whether the key was consumed.
    pub fn handle_key(&mut self, code: KeyCode, now: Instant) -> bool {
        if self.config.mode != PagingMode::Paged {
            return false;
        }
        let Some(command) = NavCommand::from_key(code) else {
            return false;
        };
        if self.stream.is_streaming() {
            return false;
        }
        self.apply_nav(command, now);
        true
    }

    /// Fire any due deadlines (finalize debounce, scroll debounce, settle
    /// delay). Call whenever [`PreviewEngine::next_deadline`] passes.
    pub fn poll(&mut self, now: Instant) {
        if self.stream.poll(now) && self.config.mode == PagingMode::Paged {
            match self.config.finalize_policy {
                FinalizePolicy::ResetToTop => {
                    self.pages.go_to(0);
                    self.align_to_page(now);
                }
                FinalizePolicy::KeepPosition => self.align_to_page(now),
            }
        }
        if let Some(offset) = self.sync.poll(now) {
            if self.config.mode == PagingMode::Paged && !self.stream.is_streaming() {
                let candidate = self
                    .sync
                    .candidate_page(offset, self.viewport_extent)
                    .min(self.pages.count() - 1);
                // The offset already matches where the reader is: update
                // the page without re-issuing a scroll.
                self.pages.go_to(candidate);
            }
        }
        self.report_pages();
    }

    /// Earliest pending deadline, for hosts that sleep between events.
    pub fn next_deadline(&self) -> Option<Instant> {
        earliest(self.stream.next_deadline(), self.sync.next_deadline())
    }

    /// Drain queued side effects.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // --- Accessors ------------------------------------------------------

    /// The latest text snapshot.
    pub fn text(&self) -> &str {
        &self.raw
    }

    /// Engine configuration.
    pub const fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Current presentation mode.
    pub const fn mode(&self) -> PagingMode {
        self.config.mode
    }

    /// Current stream phase.
    pub const fn phase(&self) -> StreamPhase {
        self.stream.phase()
    }

    /// Whether content is still growing.
    pub const fn is_streaming(&self) -> bool {
        self.stream.is_streaming()
    }

    /// Current page index.
    pub const fn current_page(&self) -> usize {
        self.pages.current()
    }

    /// Total page count.
    pub const fn page_count(&self) -> usize {
        self.pages.count()
    }

    /// Current scroll offset in layout units.
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Measured content extent in layout units.
    pub const fn content_extent(&self) -> f64 {
        self.content_extent
    }

    /// Viewport extent in layout units.
    pub const fn viewport_extent(&self) -> f64 {
        self.viewport_extent
    }

    /// Availability of the previous/next controls.
    pub const fn nav_state(&self) -> NavState {
        NavState::compute(
            self.pages.current(),
            self.pages.count(),
            self.stream.is_streaming(),
        )
    }

    /// Whether the continuous-mode view is following the trailing edge.
    pub const fn follows_tail(&self) -> bool {
        self.sync.follows_tail()
    }

    /// State of the programmatic-scroll guard.
    pub const fn scroll_guard(&self) -> ScrollGuard {
        self.sync.guard()
    }

    // --- Internals ------------------------------------------------------

    /// Recompute pagination after a content or viewport extent change, then
    /// reposition per mode and stream phase.
    fn geometry_changed(&mut self, now: Instant) {
        if self.viewport_extent <= 0.0 {
            // Hidden or zero-size surface: keep the stale page count and
            // position rather than degrading to zero or infinite pages.
            return;
        }
        self.pages.recompute(self.content_extent, self.viewport_extent);
        match self.config.mode {
            PagingMode::Paged => {
                if self.stream.is_streaming() {
                    // A reader watching a live stream in page mode always
                    // sees the newest page, mirroring scroll-to-bottom.
                    self.pages.pin_to_last();
                }
                self.align_to_page(now);
            }
            PagingMode::Continuous => {
                if self.stream.is_streaming() && self.sync.follows_tail() {
                    self.emit_scroll(self.tail_offset());
                } else if self.scroll_offset > self.max_scroll_offset() {
                    self.emit_scroll(self.max_scroll_offset());
                }
            }
        }
        self.report_pages();
    }

    /// Issue a guarded programmatic scroll to the current page's top edge,
    /// if the surface is not already there.
    fn align_to_page(&mut self, now: Instant) {
        let target = self.pages.page_offset(self.viewport_extent);
        if (target - self.scroll_offset).abs() > OFFSET_EPS {
            self.sync.begin_programmatic(now);
            self.emit_scroll(target);
        }
    }

    /// Queue a scroll effect and adopt the target as the engine's offset.
    /// Tail-follow scrolls in continuous mode go through here unguarded:
    /// no page derivation runs in that mode, so there is no loop to break.
    fn emit_scroll(&mut self, target: f64) {
        if (target - self.scroll_offset).abs() <= OFFSET_EPS {
            return;
        }
        self.scroll_offset = target;
        self.effects.push(Effect::ScrollTo {
            offset: target,
            animate: self.config.smooth_scroll,
        });
    }

    /// Offset that puts the trailing edge of the content at the bottom of
    /// the viewport.
    fn tail_offset(&self) -> f64 {
        (self.content_extent - self.viewport_extent).max(0.0)
    }

    /// Largest meaningful scroll offset for the current mode.
    fn max_scroll_offset(&self) -> f64 {
        // The last page's top edge can sit past the content's tail when
        // the final page is partial.
        let page_bound = self.pages.page_offset_bound(self.viewport_extent);
        match self.config.mode {
            PagingMode::Continuous => self.tail_offset(),
            PagingMode::Paged => self.tail_offset().max(page_bound),
        }
    }

    /// New document: reset derived state and cancel superseded timers.
    fn reset_document(&mut self, now: Instant) {
        log::debug!("document replaced; resetting pagination state");
        self.pages.reset();
        self.stream.reset();
        self.sync.reset();
        self.content_extent = 0.0;
        self.sync.begin_programmatic(now);
        self.emit_scroll(0.0);
        self.report_pages();
    }

    /// Raise `PageChanged` if the settled (page, total) pair moved.
    fn report_pages(&mut self) {
        let state = (self.pages.current(), self.pages.count());
        if state != self.last_report {
            self.last_report = state;
            self.effects.push(Effect::PageChanged {
                page: state.0,
                total: state.1,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const FINALIZE: Duration = Duration::from_millis(500);
    const SETTLE: Duration = Duration::from_millis(300);

    fn paged_engine() -> PreviewEngine {
        PreviewEngine::new(PreviewConfig::paged())
    }

    fn settle(engine: &mut PreviewEngine, base: Instant) -> Instant {
        // Let the finalize debounce elapse and drain the transition effects
        let now = base + FINALIZE + Duration::from_millis(1);
        engine.poll(now);
        let after_guard = now + SETTLE + Duration::from_millis(1);
        engine.poll(after_guard);
        engine.drain_effects();
        after_guard
    }

    fn scroll_effects(effects: &[Effect]) -> Vec<f64> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::ScrollTo { offset, .. } => Some(*offset),
                Effect::PageChanged { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_page_count_scenario() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_content_extent(2500.0, base);
        assert_eq!(engine.page_count(), 3);
    }

    #[test]
    fn test_goto_clamps_scenario() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("doc", base);
        engine.set_content_extent(5000.0, base);
        let now = settle(&mut engine, base);

        engine.go_to(2, now);
        engine.go_to(10, now);
        assert_eq!(engine.current_page(), 4);
    }

    #[test]
    fn test_streaming_pins_to_last_page() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);

        let mut now = base;
        for extent in [1500.0, 2400.0, 3700.0] {
            now += Duration::from_millis(100);
            engine.set_text(&"x".repeat(extent as usize), now);
            engine.set_content_extent(extent, now);
            assert_eq!(engine.current_page(), engine.page_count() - 1);
        }
        assert!(engine.is_streaming());
    }

    #[test]
    fn test_finalize_resets_to_top_in_paged_mode() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("hello", base);
        engine.set_content_extent(3000.0, base);
        assert_eq!(engine.current_page(), 2);
        engine.drain_effects();

        engine.poll(base + FINALIZE);
        assert_eq!(engine.phase(), StreamPhase::Finalized);
        assert_eq!(engine.current_page(), 0);
        let effects = engine.drain_effects();
        assert_eq!(scroll_effects(&effects), vec![0.0]);
    }

    #[test]
    fn test_finalize_keep_position_policy() {
        let base = Instant::now();
        let mut config = PreviewConfig::paged();
        config.finalize_policy = FinalizePolicy::KeepPosition;
        let mut engine = PreviewEngine::new(config);

        engine.set_viewport_extent(1000.0, base);
        engine.set_text("hello", base);
        engine.set_content_extent(3000.0, base);
        engine.poll(base + FINALIZE);
        assert_eq!(engine.current_page(), 2);
    }

    #[test]
    fn test_finalize_timing_is_exact() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_text("hello", base);

        engine.poll(base + FINALIZE - Duration::from_millis(1));
        assert!(engine.is_streaming());
        engine.poll(base + FINALIZE);
        assert!(!engine.is_streaming());
    }

    #[test]
    fn test_navigation_boundaries() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("doc", base);
        engine.set_content_extent(3000.0, base);
        let now = settle(&mut engine, base);

        engine.previous(now);
        assert_eq!(engine.current_page(), 0);
        assert!(!engine.nav_state().can_previous);
        assert!(engine.nav_state().can_next);

        engine.go_to(2, now);
        engine.next(now);
        assert_eq!(engine.current_page(), 2);
        assert!(!engine.nav_state().can_next);
    }

    #[test]
    fn test_nav_disabled_while_streaming() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("hello", base);
        engine.set_content_extent(3000.0, base);

        let state = engine.nav_state();
        assert!(!state.can_previous);
        assert!(!state.can_next);
        assert!(!engine.handle_key(KeyCode::Left, base));
    }

    #[test]
    fn test_clamped_nav_still_raises_guard() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("doc", base);
        engine.set_content_extent(3000.0, base);
        let now = settle(&mut engine, base);

        // previous() at page 0 is a bounds no-op but still an intent
        engine.previous(now);
        assert_eq!(engine.scroll_guard(), ScrollGuard::InFlight);
    }

    #[test]
    fn test_programmatic_scroll_does_not_feed_back() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("doc", base);
        engine.set_content_extent(3000.0, base);
        let now = settle(&mut engine, base);

        engine.next(now);
        assert_eq!(engine.current_page(), 1);
        engine.drain_effects();

        // The surface echoes the programmatic scroll within the window
        engine.on_scroll(1000.0, now + Duration::from_millis(50));
        engine.poll(now + Duration::from_secs(2));

        assert_eq!(engine.current_page(), 1);
        assert!(engine.drain_effects().is_empty());
    }

    #[test]
    fn test_user_scroll_derives_page_with_threshold() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("doc", base);
        engine.set_content_extent(5000.0, base);
        let now = settle(&mut engine, base);

        engine.on_scroll(1150.0, now);
        engine.poll(now + Duration::from_millis(300));

        // round((1150 + 200) / 1000) == 1, not 2
        assert_eq!(engine.current_page(), 1);
        // Page derived from the scroll: no scroll re-issued
        let effects = engine.drain_effects();
        assert!(scroll_effects(&effects).is_empty());
        assert!(effects.contains(&Effect::PageChanged { page: 1, total: 5 }));
    }

    #[test]
    fn test_continuous_streaming_follows_tail() {
        let base = Instant::now();
        let mut engine = PreviewEngine::new(PreviewConfig::default());
        engine.set_viewport_extent(1000.0, base);

        engine.set_text("a", base);
        engine.set_content_extent(1500.0, base);
        assert!((engine.scroll_offset() - 500.0).abs() < OFFSET_EPS);

        let later = base + Duration::from_millis(100);
        engine.set_text("ab", later);
        engine.set_content_extent(2500.0, later);
        assert!((engine.scroll_offset() - 1500.0).abs() < OFFSET_EPS);
    }

    #[test]
    fn test_manual_scroll_detaches_tail_follow() {
        let base = Instant::now();
        let mut engine = PreviewEngine::new(PreviewConfig::default());
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("a", base);
        engine.set_content_extent(2000.0, base);

        engine.on_scroll(200.0, base + Duration::from_millis(10));
        assert!(!engine.follows_tail());

        // Further growth no longer moves the offset
        let later = base + Duration::from_millis(100);
        engine.set_text("ab", later);
        engine.set_content_extent(3000.0, later);
        assert!((engine.scroll_offset() - 200.0).abs() < OFFSET_EPS);
    }

    #[test]
    fn test_scrolling_back_to_tail_reattaches() {
        let base = Instant::now();
        let mut engine = PreviewEngine::new(PreviewConfig::default());
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("a", base);
        engine.set_content_extent(2000.0, base);

        engine.on_scroll(200.0, base);
        assert!(!engine.follows_tail());
        engine.on_scroll(1000.0, base + Duration::from_millis(50));
        assert!(engine.follows_tail());
    }

    #[test]
    fn test_zero_viewport_keeps_page_count() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_content_extent(2500.0, base);
        assert_eq!(engine.page_count(), 3);

        engine.set_viewport_extent(0.0, base);
        assert_eq!(engine.page_count(), 3);
    }

    #[test]
    fn test_text_replacement_resets_document() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("first document", base);
        engine.set_content_extent(4000.0, base);
        let now = settle(&mut engine, base);
        engine.go_to(3, now);
        assert_eq!(engine.current_page(), 3);

        engine.set_text("second document", now);
        assert!(engine.is_streaming());
        assert_eq!(engine.current_page(), 0);
        assert!((engine.scroll_offset()).abs() < OFFSET_EPS);
    }

    #[test]
    fn test_page_change_notified_once() {
        let base = Instant::now();
        let mut engine = paged_engine();
        engine.set_viewport_extent(1000.0, base);
        engine.set_content_extent(2500.0, base);
        engine.drain_effects();

        // Identical recompute inputs: no further notification
        engine.set_content_extent(2500.0, base);
        engine.set_viewport_extent(1000.0, base);
        assert!(engine.drain_effects().is_empty());
    }

    #[test]
    fn test_mode_switch_lands_on_nearest_page() {
        let base = Instant::now();
        let mut engine = PreviewEngine::new(PreviewConfig::default());
        engine.set_viewport_extent(1000.0, base);
        engine.set_text("doc", base);
        engine.set_content_extent(5000.0, base);
        let now = settle(&mut engine, base);

        engine.on_scroll(2100.0, now);
        engine.set_mode(PagingMode::Paged, now);
        assert_eq!(engine.current_page(), 2);
    }

    #[test]
    fn test_invariants_hold_across_events() {
        let base = Instant::now();
        let mut engine = paged_engine();
        let mut now = base;
        let steps: &[(f64, f64)] = &[
            (0.0, 1000.0),
            (500.0, 1000.0),
            (10_000.0, 1000.0),
            (10_000.0, 0.0),
            (10_000.0, 3000.0),
            (100.0, 3000.0),
        ];
        for &(content, viewport) in steps {
            now += Duration::from_millis(50);
            engine.set_viewport_extent(viewport, now);
            engine.set_content_extent(content, now);
            engine.poll(now);
            assert!(engine.page_count() >= 1);
            assert!(engine.current_page() < engine.page_count());
        }
    }
}
