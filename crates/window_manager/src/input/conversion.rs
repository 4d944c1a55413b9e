//! Input Conversion Utilities
//!
//! Converts native input kinds into window-manager event types, and maps
//! keys to and from the names used in keymap files.

use anchor::{EventKind, Key};

use crate::event::{EventType, EventValue};

// ============================================================================
// Extension Traits for Type Conversion
// ============================================================================

/// Extension trait for converting native input kinds into `(type, value)`.
///
/// Window-lifecycle kinds and input the window manager ignores yield `None`.
pub trait ToWmEvent {
    fn to_wm(&self) -> Option<(EventType, EventValue)>;
}

impl ToWmEvent for EventKind {
    fn to_wm(&self) -> Option<(EventType, EventValue)> {
        match self {
            EventKind::CursorMove { .. } => Some((EventType::MouseMove, EventValue::Nothing)),
            EventKind::ButtonDown(button) => Some((EventType::from_button(*button), EventValue::Press)),
            EventKind::ButtonUp(button) => Some((EventType::from_button(*button), EventValue::Release)),
            EventKind::Wheel { z } if *z > 0 => Some((EventType::WheelUp, EventValue::Press)),
            EventKind::Wheel { z } if *z < 0 => Some((EventType::WheelDown, EventValue::Press)),
            EventKind::KeyDown(data) if data.key != Key::Unknown => {
                Some((EventType::Key(data.key), EventValue::Press))
            }
            EventKind::KeyUp(data) if data.key != Key::Unknown => {
                Some((EventType::Key(data.key), EventValue::Release))
            }
            _ => None,
        }
    }
}

// ============================================================================
// Key Names
// ============================================================================

/// Keymap name of `key`, e.g. `"a"`, `"f11"`, `"pageup"`.
pub fn key_to_string(key: Key) -> Option<String> {
    let name = match key {
        Key::Letter(c) => return Some(c.to_string()),
        Key::Digit(d) => return Some(d.to_string()),
        Key::F(n) => return Some(format!("f{n}")),
        Key::Unknown => return None,
        Key::LeftShift => "leftshift",
        Key::RightShift => "rightshift",
        Key::LeftControl => "leftctrl",
        Key::RightControl => "rightctrl",
        Key::LeftAlt => "leftalt",
        Key::RightAlt => "rightalt",
        Key::Os => "oskey",
        Key::Space => "space",
        Key::Enter => "enter",
        Key::Tab => "tab",
        Key::Backspace => "backspace",
        Key::Escape => "escape",
        Key::Delete => "delete",
        Key::Insert => "insert",
        Key::Home => "home",
        Key::End => "end",
        Key::PageUp => "pageup",
        Key::PageDown => "pagedown",
        Key::Up => "up",
        Key::Down => "down",
        Key::Left => "left",
        Key::Right => "right",
        Key::Minus => "minus",
        Key::Equal => "equal",
        Key::LeftBracket => "leftbracket",
        Key::RightBracket => "rightbracket",
        Key::Backslash => "backslash",
        Key::Semicolon => "semicolon",
        Key::Quote => "quote",
        Key::Comma => "comma",
        Key::Period => "period",
        Key::Slash => "slash",
        Key::Grave => "grave",
    };
    Some(name.to_owned())
}

/// Inverse of [`key_to_string`]. Case-insensitive.
pub fn key_from_str(name: &str) -> Option<Key> {
    let name = name.to_ascii_lowercase();
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_lowercase() {
            return Some(Key::Letter(c));
        }
        if let Some(d) = c.to_digit(10) {
            return Some(Key::Digit(d as u8));
        }
    }
    if let Some(n) = name.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=24).contains(&n).then_some(Key::F(n));
    }

    Some(match name.as_str() {
        "leftshift" => Key::LeftShift,
        "rightshift" => Key::RightShift,
        "leftctrl" => Key::LeftControl,
        "rightctrl" => Key::RightControl,
        "leftalt" => Key::LeftAlt,
        "rightalt" => Key::RightAlt,
        "oskey" => Key::Os,
        "space" => Key::Space,
        "enter" | "return" => Key::Enter,
        "tab" => Key::Tab,
        "backspace" => Key::Backspace,
        "escape" | "esc" => Key::Escape,
        "delete" | "del" => Key::Delete,
        "insert" => Key::Insert,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "up" => Key::Up,
        "down" => Key::Down,
        "left" => Key::Left,
        "right" => Key::Right,
        "minus" => Key::Minus,
        "equal" => Key::Equal,
        "leftbracket" => Key::LeftBracket,
        "rightbracket" => Key::RightBracket,
        "backslash" => Key::Backslash,
        "semicolon" => Key::Semicolon,
        "quote" => Key::Quote,
        "comma" => Key::Comma,
        "period" => Key::Period,
        "slash" => Key::Slash,
        "grave" => Key::Grave,
        _ => return None,
    })
}
