//! Status bar: the preview's one-row footer.
//!
//! Three sections — title on the left, page or line position in the
//! center, stream state and key hints on the right — composed into a
//! single reverse-video row.

use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, queue};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// A three-section footer row.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    left: String,
    center: String,
    right: String,
}

impl StatusBar {
    /// Create an empty status bar.
    pub const fn new() -> Self {
        Self {
            left: String::new(),
            center: String::new(),
            right: String::new(),
        }
    }

    /// Set the left section (title).
    pub fn set_left(&mut self, text: impl Into<String>) {
        self.left = text.into();
    }

    /// Set the center section (position indicator).
    pub fn set_center(&mut self, text: impl Into<String>) {
        self.center = text.into();
    }

    /// Set the right section (stream state / hints).
    pub fn set_right(&mut self, text: impl Into<String>) {
        self.right = text.into();
    }

    /// Compose the bar into a single row of exactly `width` columns.
    pub fn compose(&self, width: usize) -> String {
        let mut row = vec![' '; width];

        let place = |row: &mut Vec<char>, text: &str, start: usize| {
            let mut col = start;
            for ch in text.chars() {
                if col >= row.len() {
                    break;
                }
                row[col] = ch;
                col += 1;
            }
        };

        place(&mut row, &truncate(&self.left, width.saturating_sub(2)), 1);

        let right = truncate(&self.right, width.saturating_sub(2));
        let right_width = UnicodeWidthStr::width(right.as_str());
        place(&mut row, &right, width.saturating_sub(right_width + 1));

        let center_width = UnicodeWidthStr::width(self.center.as_str());
        if center_width + 2 < width {
            place(&mut row, &self.center, (width - center_width) / 2);
        }

        row.into_iter().collect()
    }

    /// Draw the bar at `(x, y)` in reverse video.
    pub fn draw(&self, out: &mut impl Write, x: u16, y: u16, width: u16) -> io::Result<()> {
        queue!(
            out,
            cursor::MoveTo(x, y),
            SetAttribute(Attribute::Reverse),
            Print(self.compose(width as usize)),
            SetAttribute(Attribute::Reset),
        )
    }
}

fn truncate(text: &str, max: usize) -> String {
    if UnicodeWidthStr::width(text) <= max {
        return text.to_owned();
    }
    let mut out = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let w = UnicodeWidthStr::width(ch.to_string().as_str());
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
