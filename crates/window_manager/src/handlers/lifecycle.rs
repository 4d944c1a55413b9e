//! Window lifecycle handlers
//!
//! ```text
//! Unrealized ──window_realize──► Realized ──make_drawable──► Drawable
//!      │                              │                          │
//!      └──────────── window_close / window_teardown ─────────────┴──► Closed
//! ```
//!
//! Opening and copying insert the window first and realize it second; a
//! window whose realization fails is torn down again before returning.

use std::time::Duration;

use anchor::{DrawingContextType, WindowDescriptor, WindowFlags, WindowState};
use engine_state::document::{ATTR_SPACE_TYPE, REL_AREAS, REL_SCREEN};
use engine_state::{AttrValue, DefaultLayout, PrimPath, WindowId};
use glam::IVec2;

use crate::error::WmError;
use crate::geometry::{self, Alignment, WindowDpi};
use crate::handlers::close::window_teardown;
use crate::notifier::{Notifier, NotifierAction, NotifierCategory};
use crate::session::Session;
use crate::window_config::{WindowConfig, COPY_OFFSET};

/// Idle sleep when the platform had nothing to deliver.
const IDLE_SLEEP: Duration = Duration::from_millis(5);

/// What to open with [`window_open`].
#[derive(Debug, Clone, PartialEq)]
pub struct OpenWindowParams {
    pub title: String,
    /// Offset from the source window's position, in native pixels.
    pub offset: IVec2,
    /// Requested size in native pixels.
    pub size: IVec2,
    pub alignment: Alignment,
    /// Editor of the new window's single area; `None` keeps the source screen.
    pub space_type: Option<String>,
    /// Open without a parent.
    pub toplevel: bool,
    pub dialog: bool,
}

impl OpenWindowParams {
    pub fn new(title: &str, size: IVec2) -> Self {
        Self {
            title: title.to_owned(),
            offset: IVec2::ZERO,
            size,
            alignment: Alignment::Absolute,
            space_type: None,
            toplevel: false,
            dialog: false,
        }
    }

    pub fn with_offset(mut self, offset: IVec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_space_type(mut self, space_type: &str) -> Self {
        self.space_type = Some(space_type.to_owned());
        self
    }

    pub fn dialog(mut self) -> Self {
        self.dialog = true;
        self
    }

    pub fn toplevel(mut self) -> Self {
        self.toplevel = true;
        self
    }
}

/// Add and realize the first main window showing `layout`.
pub fn add_main_window(session: &mut Session, layout: &DefaultLayout) -> Result<WindowId, WmError> {
    let id = session.wm.add_window(None, false);
    if let Some(win) = session.wm.window_mut(id) {
        win.scene = Some(layout.scene.clone());
        win.workspace = Some(layout.workspace.clone());
        win.screen = Some(layout.screen.clone());
    }

    if let Err(e) = window_realize(session, id) {
        window_teardown(session, id);
        return Err(e);
    }
    Ok(id)
}

/// Fill in geometry and display defaults a window never had authored.
fn apply_defaults(session: &mut Session, id: WindowId) {
    let config = WindowConfig::fallback(&session.prefs.app_name);
    let Some(win) = session.wm.window_mut(id) else {
        return;
    };

    if win.size.x <= 0 || win.size.y <= 0 {
        win.pos = config.pos;
        win.size = config.size;
        win.state = config.state;
        win.cursor = config.cursor;
        win.alignment = config.alignment;
    }
    if win.title.is_empty() {
        win.title = config.title;
    }
}

/// Ensure `id` has a native window.
///
/// Does nothing for a window that is already realized, so geometry and DPI
/// stay as they are. On failure the window stays unrealized; removing it is
/// up to the caller.
///
/// # Arguments
/// * `session` - The running session
/// * `id` - Window to realize
pub fn window_realize(session: &mut Session, id: WindowId) -> Result<(), WmError> {
    let Some(win) = session.wm.window(id) else {
        return Err(WmError::UnknownWindow(id));
    };
    if win.is_realized() {
        return Ok(());
    }

    apply_defaults(session, id);

    let Some(win) = session.wm.window(id) else {
        return Err(WmError::UnknownWindow(id));
    };
    let parent = win
        .parent
        .and_then(|p| session.wm.window(p))
        .and_then(|p| p.native_handle());
    let mut flags = WindowFlags::empty();
    if session.globals.background {
        flags |= WindowFlags::HIDDEN;
    }
    let descriptor = WindowDescriptor {
        parent,
        title: win.title.clone(),
        icon: win.icon.clone(),
        position: geometry::pixel_size(win.pos, win.native_pixel_size),
        size: geometry::pixel_size(win.size, win.native_pixel_size).max(IVec2::ONE).as_uvec2(),
        state: win.state,
        is_dialog: win.is_dialog,
        context_type: DrawingContextType::Vulkan,
        flags,
    };
    let cursor = win.cursor;

    let handle = session
        .system_mut()
        .create_window(&descriptor)
        .map_err(|source| WmError::Realize { window: id, source })?;

    session.wm.bind_native(id, handle);
    let native_pixel_size = session.system().native_pixel_size(handle);
    if let Some(win) = session.wm.window_mut(id) {
        win.native_pixel_size = native_pixel_size;
    }
    set_dpi(session, id);
    session.system_mut().set_cursor_shape(handle, cursor);

    tracing::debug!("Realized {id} as {:?}", handle);
    Ok(())
}

/// Realize every window that is still unrealized; the ones that fail are torn down.
pub fn check_windows(session: &mut Session) {
    let pending: Vec<WindowId> = session
        .wm
        .windows()
        .filter(|w| !w.is_realized())
        .map(|w| w.id)
        .collect();

    for id in pending {
        if let Err(e) = window_realize(session, id) {
            tracing::error!("{e}");
            window_teardown(session, id);
        }
    }
}

/// Recompute the UI scale factors of `id` from the platform and preferences.
pub fn set_dpi(session: &mut Session, id: WindowId) {
    let Some(win) = session.wm.window(id) else {
        return;
    };
    let dpi_hint = win
        .native_handle()
        .map_or(96.0, |handle| session.system().dpi_hint(handle));
    let dpi = WindowDpi::compute(
        dpi_hint,
        win.native_pixel_size,
        session.prefs.ui_scale,
        session.prefs.ui_line_width,
    );
    if let Some(win) = session.wm.window_mut(id) {
        win.dpi = dpi;
    }
}

/// Bind `id` as the one drawable window.
pub fn make_drawable(session: &mut Session, id: WindowId) {
    let Some(handle) = session.wm.window(id).and_then(|w| w.native_handle()) else {
        tracing::debug!("{id} has no native window to draw into");
        return;
    };
    if session.wm.drawable() == Some(id) {
        return;
    }

    session.wm.set_drawable(None);
    if let Err(e) = session.system_mut().activate_drawing_context(handle) {
        tracing::warn!("Failed to activate drawing context of {id}: {e}");
        return;
    }
    session.wm.set_drawable(Some(id));
    set_dpi(session, id);
}

/// Open a new window next to the context window.
///
/// The rectangle is placed relative to the source window according to the
/// requested alignment and then fitted on the main display. Returns `None`
/// when there is no source window or the native window cannot be created.
pub fn window_open(session: &mut Session, params: &OpenWindowParams) -> Option<WindowId> {
    let Some(source) = session.ctx_window() else {
        tracing::warn!("Cannot open \"{}\" without a source window", params.title);
        return None;
    };
    let source_id = source.id;
    let rect = geometry::placement_rect(
        source.pos,
        source.size,
        source.native_pixel_size,
        params.offset,
        params.size,
        params.alignment,
    );
    let (scene, workspace, source_screen) = (
        source.scene.clone(),
        source.workspace.clone(),
        source.screen.clone(),
    );
    let rect = geometry::fit_to_screen(rect, session.system().main_display_dimensions());

    let parent = (!params.toplevel).then_some(source_id);
    let id = session.wm.add_window(parent, params.dialog);

    let screen = match (&params.space_type, &workspace) {
        (Some(space_type), Some(workspace)) => new_screen(session, id, workspace, space_type),
        _ => source_screen,
    };

    if let Some(win) = session.wm.window_mut(id) {
        win.pos = rect.min;
        win.size = rect.size();
        win.state = WindowState::Normal;
        win.title = params.title.clone();
        win.alignment = params.alignment;
        win.scene = scene;
        win.workspace = workspace;
        win.screen = screen;
    }

    if let Err(e) = window_realize(session, id) {
        tracing::error!("{e}");
        window_teardown(session, id);
        return None;
    }

    session.wm.add_notifier(
        Notifier::new(NotifierCategory::Window)
            .with_window(id)
            .with_action(NotifierAction::Added),
    );
    Some(id)
}

/// Define a screen with one area of `space_type` for window `id` under `workspace`.
fn new_screen(session: &mut Session, id: WindowId, workspace: &PrimPath, space_type: &str) -> Option<PrimPath> {
    let screen = workspace.child(&format!("Screen_{}", id.0));
    let area = screen.child("Area_0");

    let stage = session.main.stage_mut();
    stage.define_prim(&screen, "Screen");
    stage.define_prim(&area, "Area");
    let linked = stage
        .set_attribute(&area, ATTR_SPACE_TYPE, AttrValue::Token(space_type.to_owned()))
        .and_then(|()| stage.add_relationship_target(&screen, REL_AREAS, area.clone()))
        .and_then(|()| stage.add_relationship_target(workspace, REL_SCREEN, screen.clone()));

    match linked {
        Ok(()) => Some(screen),
        Err(e) => {
            tracing::warn!("Failed to set up screen for {id}: {e}");
            None
        }
    }
}

/// Duplicate `source` as a new window sharing its scene, workspace and screen.
///
/// # Arguments
/// * `session` - The running session
/// * `source` - Window to copy
/// * `child` - Parent the copy to `source` instead of `source`'s parent
pub fn window_copy(session: &mut Session, source: WindowId, child: bool) -> Option<WindowId> {
    let Some(src) = session.wm.window(source) else {
        tracing::warn!("Cannot copy missing window {source}");
        return None;
    };
    let parent = if child { Some(source) } else { src.parent };
    let pos = src.pos + COPY_OFFSET;
    let size = src.size;
    let state = src.state;
    let title = src.title.clone();
    let icon = src.icon.clone();
    let cursor = src.cursor;
    let alignment = src.alignment;
    let scene = src.scene.clone();
    let workspace = src.workspace.clone();
    let screen = src.screen.clone();

    let id = session.wm.add_window(parent, false);
    if let Some(win) = session.wm.window_mut(id) {
        win.pos = pos;
        win.size = size;
        win.state = state;
        win.title = title;
        win.icon = icon;
        win.cursor = cursor;
        win.alignment = alignment;
        win.scene = scene;
        win.workspace = workspace;
        win.screen = screen;
    }

    if let Err(e) = window_realize(session, id) {
        tracing::error!("{e}");
        window_teardown(session, id);
        return None;
    }

    session.wm.add_notifier(
        Notifier::new(NotifierCategory::Window)
            .with_window(id)
            .with_action(NotifierAction::Added),
    );
    tracing::debug!("Copied {source} to {id}");
    Some(id)
}

/// The window, other than `from`, under a position local to `from`.
///
/// Returns the window and the position in its local space. Minimized and
/// unrealized windows are skipped.
pub fn find_window_under_cursor(session: &Session, from: WindowId, local: IVec2) -> Option<(WindowId, IVec2)> {
    let desktop = session.wm.window(from)?.local_to_desktop(local);

    session
        .wm
        .windows()
        .filter(|w| w.id != from && w.is_realized() && w.state != WindowState::Minimized)
        .find_map(|w| {
            let local = w.desktop_to_local(desktop);
            w.screen_rect().contains_inclusive(local).then_some((w.id, local))
        })
}

/// Pump the platform once and dispatch what arrived.
///
/// Sleeps briefly when nothing arrived so an idle loop does not spin.
pub fn process_events(session: &mut Session) {
    if !session.system_mut().process_events(false) {
        std::thread::sleep(IDLE_SLEEP);
        return;
    }

    let events = session.system_mut().take_events();
    for event in events {
        crate::handlers::events::dispatch_native_event(session, event);
    }
}
