//! Streaming Preview Demo: a live markdown document arriving chunk by chunk.
//!
//! A producer thread streams a sample report at roughly 80 tokens/s while
//! the preview follows the tail. Once the stream goes quiet the preview
//! finalizes and hands scrolling back to you.
//!
//! Press 'p' to toggle paged mode, 'q' or Escape to quit.

use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};
use pageturn::input::{next_event, InputEvent, KeyCode};
use pageturn::{MarkdownRenderer, PagingMode, PreviewConfig, PreviewWidget, Rect, TextFeed};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Sample document to stream (simulating an LLM response).
const SAMPLE_TEXT: &str = r#"# Quarterly Infrastructure Report

This report covers the state of the fleet and the migrations completed
during the quarter.

## Highlights

- Rolled out the new ingestion pipeline to **all** regions
- Cut p99 query latency from 480ms to *120ms*
- Retired the last `v1` storage nodes

## Ingestion Pipeline

The new pipeline batches writes per shard and applies backpressure at the
edge instead of the store. Under sustained load the write amplification
dropped by a factor of three, and the compaction backlog that used to
build up overnight is gone.

```
shard-07  in: 12.4k/s  out: 12.4k/s  lag: 0ms
shard-08  in: 11.9k/s  out: 11.9k/s  lag: 0ms
```

## Query Latency

Most of the win came from moving the hot index into memory and serving
range scans from the batch layer. The remaining tail is dominated by
cold-cache reads after deploys, which the pre-warming work planned for
next quarter should address.

## Next Quarter

- Pre-warm caches on deploy
- Finish the multi-tenant quota work
- Decommission the legacy gateway
"#;

/// Frame interval while a smooth scroll is animating.
const FRAME: Duration = Duration::from_millis(16);

fn main() -> io::Result<()> {
    let (tx, mut feed) = TextFeed::channel();

    // Producer: stream the sample text word by word
    std::thread::spawn(move || {
        for word in SAMPLE_TEXT.split_inclusive(' ') {
            if tx.send(word.to_owned()).is_err() {
                return;
            }
            std::thread::sleep(Duration::from_millis(12));
        }
    });

    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, cursor::Hide)?;

    let result = run(&mut out, &mut feed);

    execute!(out, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(out: &mut impl Write, feed: &mut TextFeed) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let mut config = PreviewConfig::default();
    config.title = Some("infrastructure report".to_owned());
    config.smooth_scroll = true;

    let mut preview = PreviewWidget::new(Rect::from_size(width, height), config, MarkdownRenderer);

    loop {
        let now = Instant::now();

        if feed.pump() {
            preview.set_text(feed.text(), now);
        }

        preview.tick(now);
        if preview.needs_redraw() {
            preview.draw(out)?;
        }

        // Sleep until the next engine deadline, input, or frame
        let timeout = if preview.is_animating() || !feed.is_closed() {
            FRAME
        } else {
            preview
                .next_deadline()
                .map_or(Duration::from_millis(250), |deadline| {
                    deadline.saturating_duration_since(now)
                })
        };

        if let Some(event) = next_event(timeout)? {
            let now = Instant::now();
            match event {
                InputEvent::Key { code, .. } => match code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('p') => {
                        let mode = match preview.engine().mode() {
                            PagingMode::Continuous => PagingMode::Paged,
                            PagingMode::Paged => PagingMode::Continuous,
                        };
                        preview.set_mode(mode, now);
                    }
                    _ => {
                        preview.handle_input(&event, now);
                    }
                },
                _ => {
                    preview.handle_input(&event, now);
                }
            }
        }
    }
}
