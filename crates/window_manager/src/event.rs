//! Window-manager events.
//!
//! Every native input event is translated into an [`Event`] and appended to
//! its window's [`EventQueue`]. Each window also keeps one `eventstate`
//! snapshot holding the last known cursor position, modifier counters and
//! click history; new events are filled from it so that a key press knows
//! which modifiers were down and a click knows whether it completes a
//! double-click.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use anchor::{Key, MouseButton};
use glam::IVec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventType {
    #[default]
    None,
    MouseMove,
    LeftMouse,
    MiddleMouse,
    RightMouse,
    Button4Mouse,
    Button5Mouse,
    WheelUp,
    WheelDown,
    Key(Key),
    WindowDeactivate,
}

impl EventType {
    pub fn from_button(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => EventType::LeftMouse,
            MouseButton::Middle => EventType::MiddleMouse,
            MouseButton::Right => EventType::RightMouse,
            MouseButton::Button4 => EventType::Button4Mouse,
            MouseButton::Button5 => EventType::Button5Mouse,
        }
    }

    pub fn is_mouse_button(self) -> bool {
        matches!(
            self,
            EventType::LeftMouse
                | EventType::MiddleMouse
                | EventType::RightMouse
                | EventType::Button4Mouse
                | EventType::Button5Mouse
        )
    }

    pub fn is_keyboard(self) -> bool {
        matches!(self, EventType::Key(_))
    }

    /// The modifier group this event's key belongs to, if it is a modifier key.
    pub fn modifier(self) -> Option<ModifierKind> {
        match self {
            EventType::Key(key) => ModifierKind::from_key(key),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventValue {
    #[default]
    Nothing,
    Press,
    Release,
    Click,
    DblClick,
}

/// The four modifier groups, each covering its left and right key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Shift,
    Ctrl,
    Alt,
    Os,
}

impl ModifierKind {
    /// Resync order used when a window regains focus.
    pub const ORDER: [ModifierKind; 4] = [
        ModifierKind::Shift,
        ModifierKind::Ctrl,
        ModifierKind::Alt,
        ModifierKind::Os,
    ];

    pub fn from_key(key: Key) -> Option<Self> {
        Some(match key {
            Key::LeftShift | Key::RightShift => ModifierKind::Shift,
            Key::LeftControl | Key::RightControl => ModifierKind::Ctrl,
            Key::LeftAlt | Key::RightAlt => ModifierKind::Alt,
            Key::Os => ModifierKind::Os,
            _ => return None,
        })
    }

    /// Key used for synthesized releases of this group.
    pub fn left_key(self) -> Key {
        match self {
            ModifierKind::Shift => Key::LeftShift,
            ModifierKind::Ctrl => Key::LeftControl,
            ModifierKind::Alt => Key::LeftAlt,
            ModifierKind::Os => Key::Os,
        }
    }
}

/// Held-key counters per modifier group. Left and right keys both count,
/// so releasing one side while the other is still down keeps the group held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierCounters {
    pub shift: u8,
    pub ctrl: u8,
    pub alt: u8,
    pub oskey: u8,
}

impl ModifierCounters {
    const MAX: u8 = 2;

    pub fn get(&self, kind: ModifierKind) -> u8 {
        match kind {
            ModifierKind::Shift => self.shift,
            ModifierKind::Ctrl => self.ctrl,
            ModifierKind::Alt => self.alt,
            ModifierKind::Os => self.oskey,
        }
    }

    fn slot(&mut self, kind: ModifierKind) -> &mut u8 {
        match kind {
            ModifierKind::Shift => &mut self.shift,
            ModifierKind::Ctrl => &mut self.ctrl,
            ModifierKind::Alt => &mut self.alt,
            ModifierKind::Os => &mut self.oskey,
        }
    }

    pub fn is_held(&self, kind: ModifierKind) -> bool {
        self.get(kind) > 0
    }

    pub fn press(&mut self, kind: ModifierKind) {
        let slot = self.slot(kind);
        *slot = (*slot + 1).min(Self::MAX);
    }

    pub fn release(&mut self, kind: ModifierKind) {
        let slot = self.slot(kind);
        *slot = slot.saturating_sub(1);
    }

    pub fn clear_kind(&mut self, kind: ModifierKind) {
        *self.slot(kind) = 0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.shift > 0 || self.ctrl > 0 || self.alt > 0 || self.oskey > 0
    }
}

/// Payload attached to an event by whoever queued it.
///
/// `Owned` data is released together with the event. `Shared` data is only
/// borrowed: dropping the event releases this reference and nothing else.
pub enum CustomData {
    Owned(Box<dyn Any>),
    Shared(Rc<dyn Any>),
}

impl CustomData {
    pub fn is_owned(&self) -> bool {
        matches!(self, CustomData::Owned(_))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            CustomData::Owned(data) => data.downcast_ref(),
            CustomData::Shared(data) => data.downcast_ref(),
        }
    }
}

impl fmt::Debug for CustomData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomData::Owned(_) => f.write_str("CustomData::Owned(..)"),
            CustomData::Shared(_) => f.write_str("CustomData::Shared(..)"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Event {
    pub ty: EventType,
    pub val: EventValue,
    pub is_repeat: bool,

    /// Cursor position in window-local pixels.
    pub xy: IVec2,
    /// Cursor position relative to the region under it, when known.
    pub mval: IVec2,

    pub utf8: String,
    pub ascii: u8,

    pub prev_ty: EventType,
    pub prev_val: EventValue,
    pub prev_xy: IVec2,
    /// Seconds; time of the last button press.
    pub prev_click_time: f64,
    pub prev_click_xy: IVec2,

    pub modifiers: ModifierCounters,
    /// First non-modifier key held while this event happened.
    pub keymodifier: Option<Key>,

    /// Seconds since the platform provider started.
    pub time: f64,

    pub custom_data: Option<CustomData>,
}

impl Event {
    pub fn new(ty: EventType, val: EventValue) -> Self {
        Self {
            ty,
            val,
            ..Self::default()
        }
    }

    /// Copies everything except the custom payload, which has a single owner.
    pub fn snapshot(&self) -> Self {
        Self {
            ty: self.ty,
            val: self.val,
            is_repeat: self.is_repeat,
            xy: self.xy,
            mval: self.mval,
            utf8: self.utf8.clone(),
            ascii: self.ascii,
            prev_ty: self.prev_ty,
            prev_val: self.prev_val,
            prev_xy: self.prev_xy,
            prev_click_time: self.prev_click_time,
            prev_click_xy: self.prev_click_xy,
            modifiers: self.modifiers,
            keymodifier: self.keymodifier,
            time: self.time,
            custom_data: None,
        }
    }

    pub fn with_custom_data(mut self, data: CustomData) -> Self {
        self.custom_data = Some(data);
        self
    }

    pub fn custom_data<T: Any>(&self) -> Option<&T> {
        self.custom_data.as_ref()?.downcast_ref()
    }
}

/// Pending events of one window, oldest first.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.back()
    }

    /// Drops every pending event, releasing owned payloads.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
