//! Terminal widgets: the viewing surfaces over the engine.
//!
//! [`PreviewWidget`] is the full preview (content slice plus footer);
//! [`StatusBar`] is the footer row on its own for hosts that compose
//! their own chrome.

mod preview;
mod status_bar;

pub use preview::{PageChangeFn, PreviewWidget};
pub use status_bar::StatusBar;
