//! Preview widget: the terminal-facing viewing surface.
//!
//! Owns a [`PreviewEngine`] plus a renderer, and closes the measurement
//! loop the engine cannot close itself: render the text at the current
//! width, count the wrapped rows, feed the extent back. One terminal row
//! is one layout unit.
//!
//! The widget applies the engine's scroll effects (optionally animated),
//! reports user scrolls back, and draws the visible slice plus a footer
//! via crossterm.

use super::status_bar::StatusBar;
use crate::config::{PagingMode, PreviewConfig};
use crate::engine::{Effect, PreviewEngine};
use crate::input::{InputEvent, KeyCode};
use crate::layout::Rect;
use crate::render::{Line, Render, SpanStyle};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{cursor, queue};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Duration of an animated programmatic scroll. Shorter than the settle
/// delay, so the guard is always released by the animation finishing.
const SCROLL_ANIM: Duration = Duration::from_millis(150);

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: f64 = 3.0;

/// Host callback for settled page changes.
pub type PageChangeFn = Box<dyn FnMut(usize, usize)>;

/// In-flight smooth scroll.
#[derive(Debug, Clone, Copy)]
struct ScrollAnim {
    from: f64,
    to: f64,
    start: Instant,
}

/// A streaming text preview with continuous and paged presentation.
pub struct PreviewWidget<R: Render> {
    bounds: Rect,
    engine: PreviewEngine,
    renderer: R,
    lines: Vec<Line>,
    bar: StatusBar,
    focused: bool,
    dirty: bool,
    view_offset: f64,
    anim: Option<ScrollAnim>,
    on_page_change: Option<PageChangeFn>,
}

impl<R: Render> PreviewWidget<R> {
    /// Create a widget over the given screen region.
    pub fn new(bounds: Rect, config: PreviewConfig, renderer: R) -> Self {
        let mut engine = PreviewEngine::new(config);
        let content_rows = content_height(bounds);
        engine.set_viewport_extent(f64::from(content_rows), Instant::now());

        Self {
            bounds,
            engine,
            renderer,
            lines: Vec::new(),
            bar: StatusBar::new(),
            focused: true,
            dirty: true,
            view_offset: 0.0,
            anim: None,
            on_page_change: None,
        }
    }

    /// Register the settled page-change callback.
    pub fn on_page_change(&mut self, callback: PageChangeFn) {
        self.on_page_change = Some(callback);
    }

    /// Supply the latest full text snapshot and re-render it.
    pub fn set_text(&mut self, text: &str, now: Instant) {
        self.engine.set_text(text, now);
        self.rerender(now);
    }

    /// Move or resize the widget, reflowing the content.
    pub fn set_bounds(&mut self, bounds: Rect, now: Instant) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        self.engine
            .set_viewport_extent(f64::from(content_height(bounds)), now);
        self.rerender(now);
    }

    /// Handle an input event. Returns `true` if consumed.
    pub fn handle_input(&mut self, event: &InputEvent, now: Instant) -> bool {
        match *event {
            InputEvent::Key { code, .. } => {
                if !self.focused {
                    return false;
                }
                let consumed = match self.engine.mode() {
                    PagingMode::Paged => self.engine.handle_key(code, now),
                    PagingMode::Continuous => self.scroll_key(code, now),
                };
                self.dirty |= consumed;
                consumed
            }
            InputEvent::MouseScroll { delta } => {
                let target = self.view_offset - f64::from(delta) * WHEEL_STEP;
                self.user_scroll(target, now);
                true
            }
            InputEvent::Resize { width, height } => {
                self.set_bounds(Rect::from_size(width, height), now);
                true
            }
            InputEvent::FocusGained => {
                self.focused = true;
                true
            }
            InputEvent::FocusLost => {
                self.focused = false;
                true
            }
        }
    }

    /// Advance animations and fire due engine deadlines, then apply the
    /// resulting effects. Call once per frame.
    pub fn tick(&mut self, now: Instant) {
        if let Some(anim) = self.anim {
            let elapsed = now.saturating_duration_since(anim.start);
            if elapsed >= SCROLL_ANIM {
                self.view_offset = anim.to;
                self.anim = None;
                self.engine.notify_scroll_settled();
            } else {
                let t = elapsed.as_secs_f64() / SCROLL_ANIM.as_secs_f64();
                // Ease-out: fast start, gentle landing
                let eased = 1.0 - (1.0 - t) * (1.0 - t);
                self.view_offset = anim.from + (anim.to - anim.from) * eased;
            }
            self.dirty = true;
        }

        self.engine.poll(now);
        for effect in self.engine.drain_effects() {
            match effect {
                Effect::ScrollTo { offset, animate } => {
                    if animate {
                        self.anim = Some(ScrollAnim {
                            from: self.view_offset,
                            to: offset,
                            start: now,
                        });
                    } else {
                        self.view_offset = offset;
                        self.anim = None;
                        self.engine.notify_scroll_settled();
                    }
                    self.dirty = true;
                }
                Effect::PageChanged { page, total } => {
                    if let Some(callback) = self.on_page_change.as_mut() {
                        callback(page, total);
                    }
                    self.dirty = true;
                }
            }
        }
    }

    /// Draw the visible content slice and the footer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        let width = self.bounds.width as usize;
        let rows = content_height(self.bounds);
        let first = self.view_offset.max(0.0).floor() as usize;

        for row in 0..rows {
            let y = self.bounds.y + row;
            queue!(out, cursor::MoveTo(self.bounds.x, y))?;

            let mut used = 0usize;
            if let Some(line) = self.lines.get(first + row as usize) {
                for span in &line.spans {
                    queue_style(out, span.style)?;
                    queue!(out, Print(&span.text))?;
                    queue_style_reset(out, span.style)?;
                    used += span.width();
                }
            }
            if used < width {
                queue!(out, Print(" ".repeat(width - used)))?;
            }
        }

        self.compose_footer();
        self.bar
            .draw(out, self.bounds.x, self.bounds.y + rows, self.bounds.width)?;

        self.dirty = false;
        out.flush()
    }

    /// Whether the widget needs a redraw.
    pub const fn needs_redraw(&self) -> bool {
        self.dirty
    }

    /// Whether a smooth scroll is in progress (the host should keep
    /// ticking at frame rate).
    pub const fn is_animating(&self) -> bool {
        self.anim.is_some()
    }

    /// Earliest pending engine deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.engine.next_deadline()
    }

    /// The engine, for read-only state queries.
    pub const fn engine(&self) -> &PreviewEngine {
        &self.engine
    }

    /// Go back one page.
    pub fn previous(&mut self, now: Instant) {
        self.engine.previous(now);
        self.dirty = true;
    }

    /// Go forward one page.
    pub fn next(&mut self, now: Instant) {
        self.engine.next(now);
        self.dirty = true;
    }

    /// Jump to a page (clamped).
    pub fn go_to(&mut self, page: usize, now: Instant) {
        self.engine.go_to(page, now);
        self.dirty = true;
    }

    /// Switch presentation mode.
    pub fn set_mode(&mut self, mode: PagingMode, now: Instant) {
        self.engine.set_mode(mode, now);
        self.dirty = true;
    }

    /// Current scroll position actually displayed (mid-animation this lags
    /// the engine's target offset).
    pub const fn view_offset(&self) -> f64 {
        self.view_offset
    }

    // --- Internals ------------------------------------------------------

    /// Re-render the text at the current width and feed the measured
    /// extent back to the engine.
    #[allow(clippy::cast_precision_loss)]
    fn rerender(&mut self, now: Instant) {
        self.lines = self
            .renderer
            .render(self.engine.text(), self.bounds.width)
            .lines;
        self.engine.set_content_extent(self.lines.len() as f64, now);
        self.dirty = true;
    }

    /// Continuous-mode scrolling keys.
    fn scroll_key(&mut self, code: KeyCode, now: Instant) -> bool {
        let page = f64::from(content_height(self.bounds));
        let target = match code {
            KeyCode::Up => self.view_offset - 1.0,
            KeyCode::Down => self.view_offset + 1.0,
            KeyCode::PageUp => self.view_offset - page,
            KeyCode::PageDown => self.view_offset + page,
            KeyCode::Home => 0.0,
            KeyCode::End => f64::MAX,
            _ => return false,
        };
        self.user_scroll(target, now);
        true
    }

    /// Apply a user-initiated scroll and report it to the engine.
    fn user_scroll(&mut self, target: f64, now: Instant) {
        let target = target.clamp(0.0, self.max_view_offset());
        if (target - self.view_offset).abs() < f64::EPSILON {
            return;
        }
        self.view_offset = target;
        self.anim = None;
        self.engine.on_scroll(target, now);
        self.dirty = true;
    }

    /// Largest offset the view can sit at.
    #[allow(clippy::cast_precision_loss)]
    fn max_view_offset(&self) -> f64 {
        let tail = (self.lines.len() as f64 - f64::from(content_height(self.bounds))).max(0.0);
        match self.engine.mode() {
            PagingMode::Continuous => tail,
            PagingMode::Paged => tail.max(
                (self.engine.page_count() as f64 - 1.0) * self.engine.viewport_extent(),
            ),
        }
    }

    /// Fill the footer sections from the current state.
    fn compose_footer(&mut self) {
        let title = self
            .engine
            .config()
            .title
            .clone()
            .unwrap_or_else(|| "preview".to_owned());
        self.bar.set_left(title);

        match self.engine.mode() {
            PagingMode::Paged => {
                self.bar.set_center(format!(
                    "page {}/{}",
                    self.engine.current_page() + 1,
                    self.engine.page_count()
                ));
            }
            PagingMode::Continuous => {
                let total = self.lines.len();
                let rows = content_height(self.bounds) as usize;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let last = (self.view_offset.floor() as usize + rows).min(total);
                self.bar.set_center(format!("{last}/{total} lines"));
            }
        }

        let right = if self.engine.is_streaming() {
            "streaming…"
        } else {
            match self.engine.mode() {
                PagingMode::Paged => "done · ←/→ page",
                PagingMode::Continuous => "done",
            }
        };
        self.bar.set_right(right);
    }
}

/// Rows available for content (everything above the footer).
const fn content_height(bounds: Rect) -> u16 {
    bounds.height.saturating_sub(1)
}

/// Queue terminal attributes for a span style.
fn queue_style(out: &mut impl Write, style: SpanStyle) -> io::Result<()> {
    if style.contains(SpanStyle::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.contains(SpanStyle::ITALIC) {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if style.contains(SpanStyle::DIM) {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if style.contains(SpanStyle::HEADING) {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if style.contains(SpanStyle::CODE) {
        queue!(out, SetForegroundColor(Color::DarkYellow))?;
    }
    Ok(())
}

/// Undo the attributes queued for a span style.
fn queue_style_reset(out: &mut impl Write, style: SpanStyle) -> io::Result<()> {
    if !style.is_empty() {
        queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PlainRenderer;
    use std::time::Duration;

    fn widget() -> PreviewWidget<PlainRenderer> {
        // 10 columns, 5 content rows + footer
        PreviewWidget::new(Rect::from_size(10, 6), PreviewConfig::paged(), PlainRenderer)
    }

    fn lines(n: usize) -> String {
        (0..n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_rows_map_to_layout_units() {
        let base = Instant::now();
        let mut widget = widget();
        widget.set_text(&lines(12), base);

        assert!((widget.engine().viewport_extent() - 5.0).abs() < f64::EPSILON);
        assert!((widget.engine().content_extent() - 12.0).abs() < f64::EPSILON);
        assert_eq!(widget.engine().page_count(), 3);
    }

    #[test]
    fn test_streaming_pins_view_to_last_page() {
        let base = Instant::now();
        let mut widget = widget();
        widget.set_text(&lines(12), base);
        widget.tick(base);

        assert_eq!(widget.engine().current_page(), 2);
        assert!((widget.view_offset() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_finalize_returns_to_first_page() {
        let base = Instant::now();
        let mut widget = widget();
        widget.set_text(&lines(12), base);
        widget.tick(base);

        widget.tick(base + Duration::from_millis(500));
        assert!(!widget.engine().is_streaming());
        assert_eq!(widget.engine().current_page(), 0);
        assert!(widget.view_offset().abs() < f64::EPSILON);
    }

    #[test]
    fn test_reflow_remeasures_extent() {
        let base = Instant::now();
        let mut widget = widget();
        widget.set_text("alpha beta gamma", base);
        let narrow_extent = widget.engine().content_extent();

        widget.set_bounds(Rect::from_size(40, 6), base);
        assert!(widget.engine().content_extent() < narrow_extent);
    }

    #[test]
    fn test_wheel_scroll_reaches_engine() {
        let base = Instant::now();
        let mut widget = widget();
        widget.set_text(&lines(30), base);
        let now = base + Duration::from_millis(600);
        widget.tick(now);

        widget.handle_input(&InputEvent::MouseScroll { delta: -1 }, now);
        assert!((widget.view_offset() - 3.0).abs() < f64::EPSILON);
        assert!((widget.engine().scroll_offset() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unfocused_keys_ignored() {
        let base = Instant::now();
        let mut widget = widget();
        widget.set_text(&lines(12), base);
        widget.tick(base + Duration::from_millis(600));

        widget.handle_input(&InputEvent::FocusLost, base);
        let consumed = widget.handle_input(
            &InputEvent::Key {
                code: KeyCode::Right,
                modifiers: crate::input::KeyModifiers::NONE,
            },
            base + Duration::from_millis(700),
        );
        assert!(!consumed);
        assert_eq!(widget.engine().current_page(), 0);
    }

    #[test]
    fn test_smooth_scroll_animates_then_settles() {
        let base = Instant::now();
        let mut config = PreviewConfig::paged();
        config.smooth_scroll = true;
        let mut widget =
            PreviewWidget::new(Rect::from_size(10, 6), config, PlainRenderer);
        widget.set_text(&lines(12), base);
        let now = base + Duration::from_millis(600);
        widget.tick(now);
        widget.tick(now + Duration::from_millis(1));

        widget.next(now + Duration::from_millis(2));
        widget.tick(now + Duration::from_millis(3));
        assert!(widget.is_animating());

        widget.tick(now + Duration::from_millis(200));
        assert!(!widget.is_animating());
        assert!((widget.view_offset() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_draw_emits_output() {
        let base = Instant::now();
        let mut widget = widget();
        widget.set_text("hello", base);
        widget.tick(base);

        let mut out = Vec::new();
        widget.draw(&mut out).unwrap();
        assert!(!out.is_empty());
        assert!(!widget.needs_redraw());
    }

    #[test]
    fn test_page_change_callback_fires() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let base = Instant::now();
        let seen: Rc<RefCell<Vec<(usize, usize)>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut widget = widget();
        widget.on_page_change(Box::new(move |page, total| {
            sink.borrow_mut().push((page, total));
        }));
        widget.set_text(&lines(12), base);
        widget.tick(base);

        // Streaming pinned the view to the last page of three
        assert!(seen.borrow().contains(&(2, 3)));
    }
}
