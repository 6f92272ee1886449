//! Content rendering: the collaborator that turns raw text into
//! measurable, styled lines.
//!
//! The engine treats rendering as opaque. It consumes only the rendered
//! content's extent (the wrapped line count at the current width), never the
//! text itself, so any [`Render`] implementation can sit in front of it.
//!
//! Two implementations ship with the crate: [`MarkdownRenderer`] interprets
//! a small markdown-like dialect, [`PlainRenderer`] just word-wraps.

mod markdown;
mod plain;

pub use markdown::MarkdownRenderer;
pub use plain::PlainRenderer;

use bitflags::bitflags;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

bitflags! {
    /// Visual attributes of a rendered span.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SpanStyle: u8 {
        /// Bold text.
        const BOLD = 1 << 0;
        /// Italic text.
        const ITALIC = 1 << 1;
        /// Inline or fenced code.
        const CODE = 1 << 2;
        /// Heading line.
        const HEADING = 1 << 3;
        /// De-emphasized text.
        const DIM = 1 << 4;
    }
}

/// A run of text with a uniform style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// The text content.
    pub text: String,
    /// Visual attributes.
    pub style: SpanStyle,
}

impl Span {
    /// Create an unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SpanStyle::empty(),
        }
    }

    /// Create a styled span.
    pub fn styled(text: impl Into<String>, style: SpanStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Display width of the span in terminal columns.
    pub fn width(&self) -> usize {
        UnicodeWidthStr::width(self.text.as_str())
    }
}

/// One rendered, display-ready line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    /// Styled runs making up the line.
    pub spans: Vec<Span>,
}

impl Line {
    /// An empty line.
    pub const fn empty() -> Self {
        Self { spans: Vec::new() }
    }

    /// Build a line from spans.
    pub fn from_spans(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Display width of the whole line.
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// The line's text with styles stripped.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// The output of a renderer: styled lines wrapped to a width.
///
/// The extent consumed by the pagination engine is `lines.len()`, one
/// layout unit per row.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// The wrapped lines, top to bottom.
    pub lines: Vec<Line>,
}

impl Rendered {
    /// Rendered form of the empty document.
    pub const fn empty() -> Self {
        Self { lines: Vec::new() }
    }

    /// Content extent in layout units (rows).
    pub fn extent(&self) -> usize {
        self.lines.len()
    }
}

/// A content renderer.
///
/// Implementations must be pure with respect to `(text, width)`: rendering
/// the same input twice yields the same lines. The engine relies on this to
/// treat re-rendering as full recomputation, with memoization as an
/// optimization rather than a correctness requirement.
pub trait Render {
    /// Render `text` into lines wrapped to `width` columns.
    fn render(&self, text: &str, width: u16) -> Rendered;
}

/// Word-wrap styled spans to `width` columns.
///
/// Continuation lines are indented by `indent` spaces (hanging indent for
/// list items). Words wider than a full line are split at grapheme
/// boundaries.
pub(crate) fn wrap_spans(spans: &[Span], width: usize, indent: usize) -> Vec<Line> {
    if width == 0 {
        return Vec::new();
    }
    let indent = indent.min(width.saturating_sub(1));

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut current_width = 0usize;

    let flush = |current: &mut Vec<Span>, current_width: &mut usize, lines: &mut Vec<Line>| {
        // Trim trailing whitespace from the wrapped line
        while let Some(last) = current.last_mut() {
            let trimmed = last.text.trim_end().len();
            if trimmed == last.text.len() {
                break;
            }
            last.text.truncate(trimmed);
            if last.text.is_empty() {
                current.pop();
            }
        }
        lines.push(Line::from_spans(std::mem::take(current)));
        *current_width = 0;
    };

    let push_fragment = |text: &str, style: SpanStyle, current: &mut Vec<Span>, current_width: &mut usize| {
        *current_width += UnicodeWidthStr::width(text);
        match current.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => current.push(Span::styled(text, style)),
        }
    };

    for (text, style, is_space) in tokenize(spans) {
        let line_indent = if lines.is_empty() { 0 } else { indent };
        if is_space {
            // Leading whitespace on a wrapped line is dropped
            if current_width > line_indent || (current_width > 0 && lines.is_empty()) {
                push_fragment(&text, style, &mut current, &mut current_width);
            }
            continue;
        }

        let word_width = UnicodeWidthStr::width(text.as_str());
        if current_width + word_width > width && current_width > line_indent {
            flush(&mut current, &mut current_width, &mut lines);
            if indent > 0 {
                push_fragment(&" ".repeat(indent), SpanStyle::empty(), &mut current, &mut current_width);
            }
        }

        if current_width + word_width <= width {
            push_fragment(&text, style, &mut current, &mut current_width);
            continue;
        }

        // Word wider than a line: split at grapheme boundaries
        for grapheme in text.graphemes(true) {
            let gw = UnicodeWidthStr::width(grapheme);
            if current_width + gw > width {
                flush(&mut current, &mut current_width, &mut lines);
                if indent > 0 {
                    push_fragment(&" ".repeat(indent), SpanStyle::empty(), &mut current, &mut current_width);
                }
            }
            push_fragment(grapheme, style, &mut current, &mut current_width);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        flush(&mut current, &mut current_width, &mut lines);
    }
    lines
}

/// Split spans into alternating word/whitespace fragments, keeping style.
fn tokenize(spans: &[Span]) -> Vec<(String, SpanStyle, bool)> {
    let mut tokens = Vec::new();
    for span in spans {
        let mut fragment = String::new();
        let mut fragment_is_space = None;
        for ch in span.text.chars() {
            let is_space = ch.is_whitespace();
            if fragment_is_space != Some(is_space) && !fragment.is_empty() {
                tokens.push((std::mem::take(&mut fragment), span.style, fragment_is_space == Some(true)));
            }
            fragment_is_space = Some(is_space);
            fragment.push(ch);
        }
        if !fragment.is_empty() {
            tokens.push((fragment, span.style, fragment_is_space == Some(true)));
        }
    }
    tokens
}
