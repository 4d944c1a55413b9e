//! Anchor: the platform window provider.
//!
//! The window manager never touches native windowing APIs directly. It owns
//! one [`PlatformSystem`] and drives it through a narrow interface:
//!
//! ```text
//! ┌──────────────────────┐  create / dispose / state / cursor / DPI
//! │    window manager    │ ───────────────────────────────────────────►┌────────────────┐
//! │   (EventConsumer)    │                                             │ PlatformSystem │
//! │                      │ ◄─────────────────────────────────────────── │  headless/winit│
//! └──────────────────────┘        NativeEvent, one at a time           └────────────────┘
//! ```
//!
//! Two backends ship with the crate: [`HeadlessSystem`] for background
//! sessions and tests, and a winit backend behind the `winit` feature.

pub mod backend;
pub mod event;
pub mod system;
pub mod types;

pub use backend::headless::{HeadlessSystem, HeadlessWindow};
#[cfg(all(
    feature = "winit",
    any(target_os = "windows", target_os = "macos", target_os = "linux")
))]
pub use backend::winit::WinitSystem;
pub use event::{EventConsumer, EventKind, KeyData, NativeEvent};
pub use system::{create_system, AnchorError, Backend, PlatformSystem};
pub use types::{
    DrawingContextType, Key, ModifierKey, MouseButton, NativeWindowHandle, StandardCursor,
    WindowDescriptor, WindowFlags, WindowOrder, WindowState,
};
