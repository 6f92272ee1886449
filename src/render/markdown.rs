//! Markdown-ish renderer: a small inline markup interpreter.
//!
//! Supports the subset a streaming preview needs: ATX headings, bullet
//! lists, fenced code blocks, and `code` / **bold** / *italic* inline
//! spans. Everything else renders as a plain paragraph. Unclosed markers
//! are rendered literally, which matters mid-stream: a chunk ending inside
//! `**` must not style the rest of the document.

use super::{wrap_spans, Line, Render, Rendered, Span, SpanStyle};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Renders a markdown-like dialect into styled, wrapped lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Render for MarkdownRenderer {
    fn render(&self, text: &str, width: u16) -> Rendered {
        let width = width as usize;
        if text.is_empty() || width == 0 {
            return Rendered::empty();
        }

        let mut lines = Vec::new();
        let mut in_fence = false;

        for raw in text.split('\n') {
            if raw.trim_start().starts_with("```") {
                // Fence markers toggle code mode and are not rendered.
                // An unclosed fence (mid-stream) keeps code mode to the end.
                in_fence = !in_fence;
                continue;
            }

            if in_fence {
                lines.extend(wrap_code(raw, width));
            } else if raw.trim().is_empty() {
                lines.push(Line::empty());
            } else if let Some(heading) = parse_heading(raw) {
                lines.extend(wrap_spans(&heading, width, 0));
            } else if let Some(item) = parse_bullet(raw) {
                lines.extend(wrap_spans(&item, width, 2));
            } else {
                lines.extend(wrap_spans(&parse_inline(raw), width, 0));
            }
        }

        Rendered { lines }
    }
}

/// `# Heading` through `###### Heading`.
fn parse_heading(raw: &str) -> Option<Vec<Span>> {
    let trimmed = raw.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = trimmed[level..].strip_prefix(' ')?;

    let mut spans = parse_inline(rest.trim_end());
    for span in &mut spans {
        span.style |= SpanStyle::HEADING | SpanStyle::BOLD;
    }
    Some(spans)
}

/// `- item` or `* item`, rendered with a bullet and hanging indent.
fn parse_bullet(raw: &str) -> Option<Vec<Span>> {
    let trimmed = raw.trim_start();
    let rest = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))?;

    let mut spans = vec![Span::plain("• ")];
    spans.extend(parse_inline(rest));
    Some(spans)
}

/// Hard-wrap a code line at grapheme boundaries, preserving indentation.
fn wrap_code(raw: &str, width: usize) -> Vec<Line> {
    if raw.is_empty() {
        return vec![Line::from_spans(vec![Span::styled("", SpanStyle::CODE)])];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;
    for grapheme in raw.graphemes(true) {
        let gw = UnicodeWidthStr::width(grapheme);
        if current_width + gw > width && !current.is_empty() {
            lines.push(Line::from_spans(vec![Span::styled(
                std::mem::take(&mut current),
                SpanStyle::CODE,
            )]));
            current_width = 0;
        }
        current.push_str(grapheme);
        current_width += gw;
    }
    lines.push(Line::from_spans(vec![Span::styled(current, SpanStyle::CODE)]));
    lines
}

/// Parse `code`, **bold**, and *italic* / _italic_ runs.
fn parse_inline(text: &str) -> Vec<Span> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans: Vec<Span> = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    let flush_plain = |plain: &mut String, spans: &mut Vec<Span>| {
        if !plain.is_empty() {
            spans.push(Span::plain(std::mem::take(plain)));
        }
    };

    while i < chars.len() {
        if chars[i] == '`' {
            if let Some(end) = find_marker(&chars, i + 1, &['`']) {
                flush_plain(&mut plain, &mut spans);
                spans.push(styled_run(&chars[i + 1..end], SpanStyle::CODE));
                i = end + 1;
                continue;
            }
        } else if matches_at(&chars, i, &['*', '*']) {
            if let Some(end) = find_marker(&chars, i + 2, &['*', '*']) {
                if end > i + 2 {
                    flush_plain(&mut plain, &mut spans);
                    spans.push(styled_run(&chars[i + 2..end], SpanStyle::BOLD));
                    i = end + 2;
                    continue;
                }
            }
        } else if chars[i] == '*' || chars[i] == '_' {
            let marker = chars[i];
            if let Some(end) = find_marker(&chars, i + 1, &[marker]) {
                if end > i + 1 {
                    flush_plain(&mut plain, &mut spans);
                    spans.push(styled_run(&chars[i + 1..end], SpanStyle::ITALIC));
                    i = end + 1;
                    continue;
                }
            }
        }
        plain.push(chars[i]);
        i += 1;
    }

    flush_plain(&mut plain, &mut spans);
    spans
}

fn styled_run(chars: &[char], style: SpanStyle) -> Span {
    Span::styled(chars.iter().collect::<String>(), style)
}

fn matches_at(chars: &[char], at: usize, marker: &[char]) -> bool {
    chars.len() >= at + marker.len() && chars[at..at + marker.len()] == *marker
}

/// First index at or after `from` where `marker` matches.
fn find_marker(chars: &[char], from: usize, marker: &[char]) -> Option<usize> {
    (from..=chars.len().saturating_sub(marker.len()))
        .find(|&i| chars[i..i + marker.len()] == *marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str, width: u16) -> Rendered {
        MarkdownRenderer.render(text, width)
    }

    #[test]
    fn test_heading_styled() {
        let rendered = render("# Title", 80);
        assert_eq!(rendered.extent(), 1);
        let span = &rendered.lines[0].spans[0];
        assert_eq!(span.text, "Title");
        assert!(span.style.contains(SpanStyle::HEADING | SpanStyle::BOLD));
    }

    #[test]
    fn test_not_a_heading_without_space() {
        let rendered = render("#tag", 80);
        assert_eq!(rendered.lines[0].text(), "#tag");
        assert_eq!(rendered.lines[0].spans[0].style, SpanStyle::empty());
    }

    #[test]
    fn test_bullet_gets_marker_and_indent() {
        let rendered = render("- alpha beta gamma delta", 12);
        assert_eq!(rendered.lines[0].text(), "• alpha beta");
        // Continuation lines carry the hanging indent
        assert!(rendered.lines[1].text().starts_with("  "));
    }

    #[test]
    fn test_inline_bold_and_code() {
        let rendered = render("a **b** `c`", 80);
        let line = &rendered.lines[0];
        assert_eq!(line.text(), "a b c");
        assert_eq!(line.spans[1].style, SpanStyle::BOLD);
        assert_eq!(line.spans[3].style, SpanStyle::CODE);
    }

    #[test]
    fn test_unclosed_marker_renders_literally() {
        let rendered = render("still **streaming", 80);
        assert_eq!(rendered.lines[0].text(), "still **streaming");
    }

    #[test]
    fn test_fenced_code_block() {
        let rendered = render("```\nlet x = 1;\n```\nafter", 80);
        assert_eq!(rendered.extent(), 2);
        assert_eq!(rendered.lines[0].spans[0].style, SpanStyle::CODE);
        assert_eq!(rendered.lines[0].text(), "let x = 1;");
        assert_eq!(rendered.lines[1].text(), "after");
    }

    #[test]
    fn test_unclosed_fence_streams_as_code() {
        let rendered = render("```\nstill code", 80);
        assert_eq!(rendered.extent(), 1);
        assert_eq!(rendered.lines[0].spans[0].style, SpanStyle::CODE);
    }

    #[test]
    fn test_blank_lines_kept() {
        let rendered = render("a\n\nb", 80);
        assert_eq!(rendered.extent(), 3);
    }

    #[test]
    fn test_italic_underscore() {
        let rendered = render("_em_", 80);
        assert_eq!(rendered.lines[0].spans[0].style, SpanStyle::ITALIC);
        assert_eq!(rendered.lines[0].text(), "em");
    }
}
