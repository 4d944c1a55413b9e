//! Keymaps: bindings from input chords to operators.
//!
//! Chords are written the way users type them, `"ctrl+alt+w"` or `"f11"`,
//! and a keymap file is a list of items:
//!
//! ```toml
//! [[item]]
//! idname = "wm.quit"
//! chord = "ctrl+q"
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::{Event, EventType, EventValue, ModifierKind};
use crate::input::conversion::{key_from_str, key_to_string};
use crate::operator::Properties;

/// An event type plus the exact modifier groups that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyChord {
    pub ty: EventType,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub oskey: bool,
}

impl KeyChord {
    pub fn new(ty: EventType) -> Self {
        Self {
            ty,
            shift: false,
            ctrl: false,
            alt: false,
            oskey: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Whether `event` has this chord's type and exactly its modifiers.
    pub fn matches(&self, event: &Event) -> bool {
        let mods = &event.modifiers;
        event.ty == self.ty
            && mods.is_held(ModifierKind::Shift) == self.shift
            && mods.is_held(ModifierKind::Ctrl) == self.ctrl
            && mods.is_held(ModifierKind::Alt) == self.alt
            && mods.is_held(ModifierKind::Os) == self.oskey
    }
}

fn event_type_name(ty: EventType) -> Option<String> {
    Some(match ty {
        EventType::LeftMouse => "leftmouse".into(),
        EventType::MiddleMouse => "middlemouse".into(),
        EventType::RightMouse => "rightmouse".into(),
        EventType::Button4Mouse => "button4mouse".into(),
        EventType::Button5Mouse => "button5mouse".into(),
        EventType::WheelUp => "wheelup".into(),
        EventType::WheelDown => "wheeldown".into(),
        EventType::MouseMove => "mousemove".into(),
        EventType::Key(key) => return key_to_string(key),
        EventType::None | EventType::WindowDeactivate => return None,
    })
}

fn event_type_from_name(name: &str) -> Option<EventType> {
    Some(match name {
        "leftmouse" => EventType::LeftMouse,
        "middlemouse" => EventType::MiddleMouse,
        "rightmouse" => EventType::RightMouse,
        "button4mouse" => EventType::Button4Mouse,
        "button5mouse" => EventType::Button5Mouse,
        "wheelup" => EventType::WheelUp,
        "wheeldown" => EventType::WheelDown,
        "mousemove" => EventType::MouseMove,
        other => EventType::Key(key_from_str(other)?),
    })
}

impl TryFrom<String> for KeyChord {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        let text = text.to_ascii_lowercase();
        let mut parts: Vec<&str> = text.split('+').map(str::trim).collect();
        let last = parts.pop().filter(|p| !p.is_empty());
        let Some(ty) = last.and_then(event_type_from_name) else {
            return Err(format!("invalid key chord {text:?}"));
        };

        let mut chord = KeyChord::new(ty);
        for part in parts {
            match part {
                "shift" => chord.shift = true,
                "ctrl" | "control" => chord.ctrl = true,
                "alt" => chord.alt = true,
                "os" | "oskey" | "cmd" | "super" => chord.oskey = true,
                other => return Err(format!("unknown modifier {other:?} in {text:?}")),
            }
        }
        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (held, name) in [
            (self.ctrl, "ctrl+"),
            (self.alt, "alt+"),
            (self.shift, "shift+"),
            (self.oskey, "oskey+"),
        ] {
            if held {
                f.write_str(name)?;
            }
        }
        f.write_str(&event_type_name(self.ty).unwrap_or_else(|| "none".into()))
    }
}

impl From<KeyChord> for String {
    fn from(chord: KeyChord) -> Self {
        chord.to_string()
    }
}

fn default_value() -> EventValue {
    EventValue::Press
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeymapItem {
    pub idname: String,
    pub chord: KeyChord,
    #[serde(default = "default_value")]
    pub value: EventValue,
    #[serde(default, skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

impl KeymapItem {
    pub fn new(idname: &str, chord: KeyChord) -> Self {
        Self {
            idname: idname.to_owned(),
            chord,
            value: EventValue::Press,
            properties: Properties::new(),
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.value == event.val && !event.is_repeat && self.chord.matches(event)
    }
}

/// Ordered keymap; earlier items win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keymap {
    #[serde(default, rename = "item")]
    pub items: Vec<KeymapItem>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The window-level bindings every session starts with.
    pub fn default_window_keymap() -> Self {
        use crate::ops::window_ops;
        use anchor::Key;

        let key = |k| KeyChord::new(EventType::Key(k));
        Self {
            items: vec![
                KeymapItem::new(window_ops::QUIT, key(Key::Letter('q')).ctrl()),
                KeymapItem::new(window_ops::WINDOW_FULLSCREEN_TOGGLE, key(Key::F(11))),
                KeymapItem::new(window_ops::WINDOW_NEW, key(Key::Letter('w')).ctrl().alt()),
                KeymapItem::new(window_ops::WINDOW_CLOSE, key(Key::Letter('w')).ctrl()),
            ],
        }
    }

    pub fn push(&mut self, item: KeymapItem) {
        self.items.push(item);
    }

    /// Items bound to `event`, in keymap order.
    pub fn matching<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a KeymapItem> + 'a {
        self.items.iter().filter(move |item| item.matches(event))
    }

    /// Items of `other` replace same-chord items here; the rest are appended.
    pub fn merge(&mut self, other: Keymap) {
        for item in other.items {
            match self
                .items
                .iter_mut()
                .find(|i| i.chord == item.chord && i.value == item.value)
            {
                Some(existing) => *existing = item,
                None => self.items.push(item),
            }
        }
    }
}
