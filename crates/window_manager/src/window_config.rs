//! Window Configuration
//!
//! Centralizes the geometry and display defaults used when windows are
//! realized, opened or copied.

use anchor::{StandardCursor, WindowState};
use glam::{IVec2, Vec2};

use crate::geometry::Alignment;

/// Size of a window opened by `wm.window_new`, relative to its source window.
pub const NEW_WINDOW_SCALE: Vec2 = Vec2::new(0.95, 0.9);

/// Offset of a copied window from its source, in OS coordinates.
pub const COPY_OFFSET: IVec2 = IVec2::new(10, 0);

/// Editor shown in a new window when the source has no area to copy from.
pub const DEFAULT_SPACE_TYPE: &str = "view3d";

/// Defaults applied to a window whose geometry was never authored.
pub struct WindowConfig {
    pub title: String,
    pub pos: IVec2,
    pub size: IVec2,
    pub state: WindowState,
    pub cursor: StandardCursor,
    pub alignment: Alignment,
}

impl WindowConfig {
    /// Fallbacks for a fresh main window of `app_name`.
    pub fn fallback(app_name: &str) -> Self {
        Self {
            title: app_name.to_owned(),
            pos: IVec2::ZERO,
            size: IVec2::new(1920, 1080),
            state: WindowState::Maximized,
            cursor: StandardCursor::Default,
            alignment: Alignment::Absolute,
        }
    }

    /// Native-pixel size of a window opened from one of `source_pixels`.
    pub fn new_window_size(source_pixels: IVec2) -> IVec2 {
        (source_pixels.as_vec2() * NEW_WINDOW_SCALE).as_ivec2()
    }
}
