//! The platform system interface.

use glam::{IVec2, UVec2};
use raw_window_handle::RawWindowHandle;
use thiserror::Error;

use crate::event::{EventConsumer, NativeEvent};
use crate::types::{
    DrawingContextType, ModifierKey, NativeWindowHandle, StandardCursor, WindowDescriptor,
    WindowOrder, WindowState,
};

#[derive(Debug, Error)]
pub enum AnchorError {
    #[error("Native window creation failed: {0}")]
    WindowCreation(String),

    #[error("Unknown native window handle: {0:?}")]
    InvalidWindow(NativeWindowHandle),

    #[error("Platform backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Operation not supported by this backend: {0}")]
    Unsupported(&'static str),
}

/// Which backend [`create_system`] should bring up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// In-memory provider. Windows exist only as bookkeeping entries.
    Headless,
    /// Native windows through winit.
    #[cfg(all(
        feature = "winit",
        any(target_os = "windows", target_os = "macos", target_os = "linux")
    ))]
    Winit,
}

/// A native windowing provider.
///
/// One system exists per running session. The window manager owns it and
/// talks to it only through this trait, so backends are interchangeable.
pub trait PlatformSystem {
    fn create_window(&mut self, desc: &WindowDescriptor) -> Result<NativeWindowHandle, AnchorError>;

    fn dispose_window(&mut self, window: NativeWindowHandle) -> Result<(), AnchorError>;

    fn valid_window(&self, window: NativeWindowHandle) -> bool;

    /// Pumps the OS queue into the provider's pending list.
    ///
    /// Returns `true` when at least one event is waiting to be dispatched.
    /// When `wait` is set the call may block until something arrives.
    fn process_events(&mut self, wait: bool) -> bool;

    /// Takes every pending event, oldest first.
    fn take_events(&mut self) -> Vec<NativeEvent>;

    /// Delivers every pending event to `consumer`, one at a time.
    fn dispatch_events(&mut self, consumer: &mut dyn EventConsumer) {
        for event in self.take_events() {
            consumer.process_event(event);
        }
    }

    /// Whether the OS currently reports `key` as held.
    fn modifier_key_state(&self, key: ModifierKey) -> bool;

    /// Cursor position in desktop space.
    fn cursor_position(&self) -> IVec2;

    fn set_cursor_position(&mut self, position: IVec2) -> Result<(), AnchorError>;

    fn set_cursor_shape(&mut self, window: NativeWindowHandle, cursor: StandardCursor);

    /// Size of the main display in native pixels.
    fn main_display_dimensions(&self) -> UVec2;

    /// DPI the OS suggests for `window`.
    fn dpi_hint(&self, window: NativeWindowHandle) -> f32;

    /// Ratio between native pixels and the coordinates the OS reports.
    fn native_pixel_size(&self, window: NativeWindowHandle) -> f32;

    fn window_state(&self, window: NativeWindowHandle) -> WindowState;

    fn set_window_state(&mut self, window: NativeWindowHandle, state: WindowState) -> Result<(), AnchorError>;

    fn set_window_order(&mut self, window: NativeWindowHandle, order: WindowOrder) -> Result<(), AnchorError>;

    fn set_title(&mut self, window: NativeWindowHandle, title: &str);

    fn is_dialog_window(&self, window: NativeWindowHandle) -> bool;

    /// Binds the window's drawing context as the current one.
    fn activate_drawing_context(&mut self, window: NativeWindowHandle) -> Result<(), AnchorError>;

    fn swap_buffers(&mut self, window: NativeWindowHandle) -> Result<(), AnchorError>;

    fn drawing_context_type(&self, window: NativeWindowHandle) -> DrawingContextType;

    /// Raw OS handle for renderer consumers that build their own swap chain.
    fn raw_window_handle(&self, _window: NativeWindowHandle) -> Option<RawWindowHandle> {
        None
    }
}

/// Brings up the requested backend.
pub fn create_system(backend: Backend) -> Result<Box<dyn PlatformSystem>, AnchorError> {
    match backend {
        Backend::Headless => {
            tracing::debug!("Creating headless platform system");
            Ok(Box::new(crate::backend::headless::HeadlessSystem::new()))
        }
        #[cfg(all(
            feature = "winit",
            any(target_os = "windows", target_os = "macos", target_os = "linux")
        ))]
        Backend::Winit => {
            tracing::debug!("Creating winit platform system");
            Ok(Box::new(crate::backend::winit::WinitSystem::new()?))
        }
    }
}

/// Clamps a requested size to something every backend accepts.
pub(crate) fn sanitize_size(size: UVec2) -> UVec2 {
    size.max(UVec2::ONE)
}
