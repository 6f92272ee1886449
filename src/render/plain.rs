//! Plain-text renderer: word wrapping, no markup.

use super::{wrap_spans, Line, Render, Rendered, Span};

/// Renders text verbatim, word-wrapped to the viewport width.
///
/// Useful as the minimal [`Render`] collaborator and in tests where the
/// extent must be easy to predict.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl Render for PlainRenderer {
    fn render(&self, text: &str, width: u16) -> Rendered {
        if text.is_empty() || width == 0 {
            return Rendered::empty();
        }

        let mut lines = Vec::new();
        for raw_line in text.split('\n') {
            if raw_line.is_empty() {
                lines.push(Line::empty());
            } else {
                lines.extend(wrap_spans(&[Span::plain(raw_line)], width as usize, 0));
            }
        }
        Rendered { lines }
    }
}
