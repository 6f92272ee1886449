//! Configuration for the preview engine.

use std::time::Duration;

/// How the rendered document is presented to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingMode {
    /// One continuously scrolling surface.
    #[default]
    Continuous,
    /// Discrete, viewport-sized pages the viewer turns through.
    Paged,
}

/// What happens to the reading position when a stream settles.
///
/// While streaming in [`PagingMode::Paged`] the engine pins the view to the
/// newest page. Once the stream finalizes, either the reader is returned to
/// the first page or left where the pin ended up. Both are coherent reading
/// experiences; `ResetToTop` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalizePolicy {
    /// Jump to page 0 and scroll to the top when the stream settles.
    #[default]
    ResetToTop,
    /// Stay on whatever page the stream ended on.
    KeepPosition,
}

/// Configuration for a [`PreviewEngine`](crate::PreviewEngine).
///
/// The debounce intervals and the page-turn threshold are tunables, not
/// invariants; the defaults suit interactive token streams.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Presentation mode.
    pub mode: PagingMode,
    /// Display-only label shown in the widget chrome. Not consumed by the
    /// engine itself.
    pub title: Option<String>,
    /// Whether programmatic scrolls animate or jump.
    pub smooth_scroll: bool,
    /// Quiet period with no content revision before the stream is treated
    /// as complete.
    pub finalize_debounce: Duration,
    /// Debounce applied to user scrolls before deriving a page from the
    /// scroll offset.
    pub scroll_debounce: Duration,
    /// How long the programmatic-scroll guard stays up after a navigation,
    /// unless the host reports the scroll settled earlier.
    pub settle_delay: Duration,
    /// Fraction of the viewport a reader must scroll past a page boundary
    /// before they count as having turned the page. Avoids flicker at
    /// exact boundaries.
    pub page_turn_threshold: f64,
    /// Position policy applied when the stream settles.
    pub finalize_policy: FinalizePolicy,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            mode: PagingMode::Continuous,
            title: None,
            smooth_scroll: false,
            finalize_debounce: Duration::from_millis(500),
            scroll_debounce: Duration::from_millis(300),
            settle_delay: Duration::from_millis(300),
            page_turn_threshold: 0.2,
            finalize_policy: FinalizePolicy::ResetToTop,
        }
    }
}

impl PreviewConfig {
    /// Configuration preset for paged presentation.
    pub fn paged() -> Self {
        Self {
            mode: PagingMode::Paged,
            ..Self::default()
        }
    }
}
