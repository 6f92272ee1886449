//! # Pageturn
//!
//! A streaming pagination engine for live-updating terminal previews.
//!
//! Pageturn keeps a growing document readable while it arrives: the view
//! follows the newest content during the stream, then hands control back
//! to the reader the moment the stream settles — with page geometry,
//! scroll position, and navigation state kept mutually consistent the
//! whole time.
//!
//! ## Core Concepts
//!
//! - **Stream classification**: content is `Streaming` while revisions
//!   keep arriving and `Finalized` after a quiet period, with no
//!   end-of-stream signal required
//! - **Two presentation modes**: `Continuous` scrolling with tail-follow,
//!   or `Paged` with discrete viewport-sized pages
//! - **Position synchronization**: user scrolls derive the current page;
//!   programmatic scrolls are guarded so they never echo back as user
//!   intent
//! - **Timestamped events**: every input carries an `Instant` and all
//!   debounces are polled deadlines, so hosts stay single-threaded and
//!   tests need no real clock
//!
//! ## Example
//!
//! ```rust,ignore
//! use pageturn::{PreviewConfig, PreviewEngine};
//! use std::time::Instant;
//!
//! let mut engine = PreviewEngine::new(PreviewConfig::paged());
//! engine.set_viewport_extent(40.0, Instant::now());
//!
//! // Feed snapshots as they stream in, then measure and report back
//! engine.set_text("# Report\n\nFirst chunk…", Instant::now());
//! engine.set_content_extent(3.0, Instant::now());
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod engine;
pub mod input;
pub mod layout;
pub mod render;
pub mod source;
pub mod timer;
pub mod widget;

// Re-exports for convenience
pub use config::{FinalizePolicy, PagingMode, PreviewConfig};
pub use engine::{Effect, NavCommand, NavState, PreviewEngine, StreamPhase};
pub use layout::Rect;
pub use render::{MarkdownRenderer, PlainRenderer, Render, Rendered};
pub use source::TextFeed;
pub use widget::{PreviewWidget, StatusBar};
