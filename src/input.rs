//! Terminal input events.
//!
//! A trimmed event vocabulary for the viewing surface: key presses, mouse
//! wheel scrolls, resizes, and focus changes. Events are read cooperatively
//! on the caller's thread via [`next_event`]; there is no input thread, so
//! dropping the widget detaches everything.

use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::time::Duration;

/// Key codes the preview surface reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Esc,
}

/// Key modifiers held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt/Option key held.
    pub alt: bool,
}

impl KeyModifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
    };

    /// Whether any modifier is active.
    pub const fn any(&self) -> bool {
        self.shift || self.control || self.alt
    }
}

/// Input events delivered to the viewing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed.
    Key {
        /// The key code.
        code: KeyCode,
        /// Modifiers held during the press.
        modifiers: KeyModifiers,
    },
    /// Mouse wheel scroll (positive = up, negative = down).
    MouseScroll {
        /// Scroll delta in rows.
        delta: i16,
    },
    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
    /// The viewing surface gained input focus.
    FocusGained,
    /// The viewing surface lost input focus.
    FocusLost,
}

/// Poll the terminal for the next input event, waiting up to `timeout`.
///
/// Returns `Ok(None)` when the timeout elapses with no event, or when an
/// event arrives that the preview vocabulary does not cover.
pub fn next_event(timeout: Duration) -> io::Result<Option<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(convert_event(event::read()?))
}

/// Convert a crossterm event to an [`InputEvent`].
fn convert_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) => {
            // Only key presses, not release or repeat
            if key.kind != KeyEventKind::Press {
                return None;
            }
            let code = convert_key_code(key.code)?;
            Some(InputEvent::Key {
                code,
                modifiers: convert_modifiers(key.modifiers),
            })
        }
        Event::Mouse(mouse) => match mouse.kind {
            event::MouseEventKind::ScrollUp => Some(InputEvent::MouseScroll { delta: 1 }),
            event::MouseEventKind::ScrollDown => Some(InputEvent::MouseScroll { delta: -1 }),
            _ => None,
        },
        Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        Event::FocusGained => Some(InputEvent::FocusGained),
        Event::FocusLost => Some(InputEvent::FocusLost),
        Event::Paste(_) => None,
    }
}

fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
    Some(match code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Esc => KeyCode::Esc,
        _ => return None,
    })
}

fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
    KeyModifiers {
        shift: mods.contains(event::KeyModifiers::SHIFT),
        control: mods.contains(event::KeyModifiers::CONTROL),
        alt: mods.contains(event::KeyModifiers::ALT),
    }
}
