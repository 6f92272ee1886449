//! Navigation surface: commands, key bindings, and control availability.
//!
//! All navigation clamps to valid pages and never fails; even a clamped
//! call counts as navigation intent and raises the programmatic-scroll
//! guard. Controls are reported disabled at a bound or while the stream is
//! still growing (the view is pinned to the newest page then, and a reader
//! should not page through content that is still moving underneath them).

use crate::input::KeyCode;

/// A page navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// One page back.
    Previous,
    /// One page forward.
    Next,
    /// Jump to the first page.
    First,
    /// Jump to the last page.
    Last,
    /// Jump to a specific page index (clamped).
    GoTo(usize),
}

impl NavCommand {
    /// Keyboard binding for paged mode: left/up page back, right/down page
    /// forward, home/end jump to the bounds.
    pub const fn from_key(code: KeyCode) -> Option<Self> {
        Some(match code {
            KeyCode::Left | KeyCode::Up | KeyCode::PageUp => Self::Previous,
            KeyCode::Right | KeyCode::Down | KeyCode::PageDown => Self::Next,
            KeyCode::Home => Self::First,
            KeyCode::End => Self::Last,
            _ => return None,
        })
    }
}

/// Availability of the previous/next controls, for the host to enable or
/// disable its chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavState {
    /// Whether `previous()` would move (not at the first page, stream
    /// settled).
    pub can_previous: bool,
    /// Whether `next()` would move (not at the last page, stream settled).
    pub can_next: bool,
}

impl NavState {
    /// Compute availability from the page position and stream state.
    pub const fn compute(current: usize, count: usize, streaming: bool) -> Self {
        if streaming {
            return Self {
                can_previous: false,
                can_next: false,
            };
        }
        Self {
            can_previous: current > 0,
            can_next: current + 1 < count,
        }
    }
}
