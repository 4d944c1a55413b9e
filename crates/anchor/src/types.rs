//! Value types shared between the platform provider and its consumers.

use glam::{IVec2, UVec2};

/// Opaque handle to a realized native window.
///
/// Handles are allocated by the active [`PlatformSystem`](crate::PlatformSystem)
/// starting from 1 and are never reused during one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeWindowHandle(u64);

impl NativeWindowHandle {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// OS-level presentation state of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowState {
    #[default]
    Normal,
    Maximized,
    Minimized,
    FullScreen,
}

/// Stacking request for [`PlatformSystem::set_window_order`](crate::PlatformSystem::set_window_order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOrder {
    Top,
    Bottom,
}

/// Kind of rendering context bound to a native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingContextType {
    None,
    #[default]
    Vulkan,
}

/// Standard cursor shapes a window can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StandardCursor {
    #[default]
    Default,
    Text,
    Crosshair,
    Move,
    Wait,
    Pointer,
    NotAllowed,
    ResizeHorizontal,
    ResizeVertical,
}

/// A physical modifier key, left and right reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKey {
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    Os,
}

impl ModifierKey {
    pub const ALL: [ModifierKey; 7] = [
        ModifierKey::LeftShift,
        ModifierKey::RightShift,
        ModifierKey::LeftControl,
        ModifierKey::RightControl,
        ModifierKey::LeftAlt,
        ModifierKey::RightAlt,
        ModifierKey::Os,
    ];
}

/// Mouse buttons reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Button4,
    Button5,
}

/// Physical keys the provider reports. Keys the backend cannot map arrive as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Unknown,
    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    LeftAlt,
    RightAlt,
    Os,
    /// `'a'..='z'`
    Letter(char),
    /// `0..=9`
    Digit(u8),
    /// `1..=24`
    F(u8),
    Space,
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Minus,
    Equal,
    LeftBracket,
    RightBracket,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    Grave,
}

impl Key {
    /// The modifier this key acts as, if any.
    pub fn as_modifier(self) -> Option<ModifierKey> {
        Some(match self {
            Key::LeftShift => ModifierKey::LeftShift,
            Key::RightShift => ModifierKey::RightShift,
            Key::LeftControl => ModifierKey::LeftControl,
            Key::RightControl => ModifierKey::RightControl,
            Key::LeftAlt => ModifierKey::LeftAlt,
            Key::RightAlt => ModifierKey::RightAlt,
            Key::Os => ModifierKey::Os,
            _ => return None,
        })
    }
}

bitflags::bitflags! {
    /// Creation flags forwarded to the backend.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        /// Create the window hidden (server/background sessions).
        const HIDDEN = 1 << 0;
        /// Ask for a stereo-capable surface.
        const STEREO = 1 << 1;
    }
}

/// Everything the provider needs to create one native window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDescriptor {
    pub parent: Option<NativeWindowHandle>,
    pub title: String,
    pub icon: String,
    /// Desktop position in native pixels.
    pub position: IVec2,
    /// Size in native pixels.
    pub size: UVec2,
    pub state: WindowState,
    pub is_dialog: bool,
    pub context_type: DrawingContextType,
    pub flags: WindowFlags,
}
