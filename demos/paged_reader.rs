//! Paged Reader Demo: navigating a finalized document page by page.
//!
//! The whole document is supplied up front, so the preview finalizes after
//! the debounce and enables navigation. Arrow keys and PageUp/PageDown turn
//! pages, Home/End jump to the first and last, and the mouse wheel scrolls
//! freely (the page indicator follows your position).
//!
//! Press 'q' or Escape to quit.

use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use pageturn::input::{next_event, InputEvent, KeyCode};
use pageturn::{MarkdownRenderer, PreviewConfig, PreviewWidget, Rect};
use std::io::{self, Write};
use std::time::{Duration, Instant};

const DOCUMENT: &str = r#"# Field Guide to Debounced Timers

A debounced timer fires once, a fixed delay after the *last* event in a
burst. Streams of revisions, keystrokes, and resize events all produce
bursts, and in each case the interesting moment is the quiet after.

## Arming and re-arming

Every event arms the timer at `now + delay`, overwriting any deadline
already pending. A burst therefore keeps pushing the deadline ahead of
itself, and only the final event's deadline survives to fire.

## Polling

A single-threaded host checks the deadline on its own loop:

```
if timer.fire(now) {
    // the burst ended `delay` ago
}
```

Sleeping until the earliest pending deadline keeps the loop idle between
bursts without missing a fire.

## Cancellation

Anything that makes the pending fire meaningless — the document being
replaced, the surface disappearing — should cancel outright rather than
letting a stale deadline fire into the new state.
"#;

fn main() -> io::Result<()> {
    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, cursor::Hide)?;

    let result = run(&mut out);

    execute!(out, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(out: &mut impl Write) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let mut config = PreviewConfig::paged();
    config.title = Some("field guide".to_owned());

    let mut preview = PreviewWidget::new(Rect::from_size(width, height), config, MarkdownRenderer);
    preview.set_text(DOCUMENT, Instant::now());

    loop {
        let now = Instant::now();
        preview.tick(now);
        if preview.needs_redraw() {
            preview.draw(out)?;
        }

        let timeout = preview
            .next_deadline()
            .map_or(Duration::from_millis(250), |deadline| {
                deadline.saturating_duration_since(now)
            });

        if let Some(event) = next_event(timeout)? {
            if let InputEvent::Key { code, .. } = event {
                if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(());
                }
            }
            preview.handle_input(&event, Instant::now());
        }
    }
}
