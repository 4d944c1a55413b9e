//! Native events as delivered by the platform pump.
//!
//! The provider produces one [`NativeEvent`] per OS notification. Pointer
//! positions are always in desktop space; converting them into a window's
//! local space is the consumer's job because only the consumer knows the
//! window's cached pixel scale.

use glam::IVec2;

use crate::types::{Key, MouseButton, NativeWindowHandle};

/// Payload of a key press or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyData {
    pub key: Key,
    /// ASCII value of the typed character, `0` when none.
    pub ascii: u8,
    /// UTF-8 text produced by the key, empty when none.
    pub utf8: String,
    pub is_repeat: bool,
}

impl KeyData {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ascii: 0,
            utf8: String::new(),
            is_repeat: false,
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.ascii = match text.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => 0,
        };
        self.utf8 = text.to_owned();
        self
    }

    pub fn repeated(mut self, is_repeat: bool) -> Self {
        self.is_repeat = is_repeat;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// The OS or the user asked the whole application to quit.
    QuitRequest,
    WindowActivate,
    WindowDeactivate,
    WindowClose,
    /// The window contents were exposed and must be redrawn.
    WindowUpdate,
    WindowSize { width: u32, height: u32 },
    WindowMove { x: i32, y: i32 },
    WindowDpiHintChanged,
    /// Cursor moved; position in desktop space.
    CursorMove { position: IVec2 },
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    /// Wheel motion in notches; positive is away from the user.
    Wheel { z: i32 },
    KeyDown(KeyData),
    KeyUp(KeyData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeEvent {
    /// Milliseconds since the provider started.
    pub time_ms: u64,
    /// Target window, `None` when the event is application wide or the
    /// backend could not attribute it.
    pub window: Option<NativeWindowHandle>,
    pub kind: EventKind,
}

impl NativeEvent {
    pub fn new(time_ms: u64, window: Option<NativeWindowHandle>, kind: EventKind) -> Self {
        Self { time_ms, window, kind }
    }
}

/// Receiver registered with the platform pump.
///
/// `process_event` is called once per native event. It must not panic and
/// never propagates errors across the platform boundary; the returned flag
/// only tells the backend whether the event was consumed.
pub trait EventConsumer {
    fn process_event(&mut self, event: NativeEvent) -> bool;
}
