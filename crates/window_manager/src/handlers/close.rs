//! Window close handling
//!
//! Closing a main window goes through the quit flow instead. Any other
//! window is torn down children first, so no window ever points at a parent
//! that has already left the table:
//!
//! 1. tear down every child, depth first
//! 2. remove the window from the table
//! 3. unload the stage prims of its screen
//! 4. drop it from the context
//! 5. release the native window

use engine_state::document::REL_AREAS;
use engine_state::WindowId;

use crate::handlers::quit::quit_with_optional_confirmation_prompt;
use crate::session::Session;
use crate::window::Window;

/// Handle a close request for `id`.
///
/// # Arguments
/// * `session` - The running session
/// * `id` - Window being closed
pub fn window_close(session: &mut Session, id: WindowId) {
    let Some(win) = session.wm.window(id) else {
        tracing::warn!("Close requested for unknown window {id}");
        return;
    };

    if win.is_main() {
        if let Err(e) = quit_with_optional_confirmation_prompt(session, Some(id)) {
            tracing::error!("Quit from {id} failed: {e}");
        }
        return;
    }

    if session.wm.other_main_window(id).is_none() {
        tracing::info!("No main window left, exiting");
        session.request_exit(0);
    }

    let removed = window_teardown(session, id);
    tracing::debug!("Closed {id} ({removed} windows removed)");
}

/// Remove `id` and all its descendants. Returns how many windows were removed.
pub(crate) fn window_teardown(session: &mut Session, id: WindowId) -> usize {
    let mut removed = 0;
    for child in session.wm.children_of(id) {
        removed += window_teardown(session, child);
    }

    let Some(win) = session.wm.remove_window(id) else {
        return removed;
    };

    unload_screen(session, &win);
    if session.ctx.forget_window(id) {
        tracing::debug!("Context window {id} closed");
    }
    if let Some(handle) = win.native_handle() {
        if let Err(e) = session.system_mut().dispose_window(handle) {
            tracing::warn!("Failed to release native window of {id}: {e}");
        }
    }

    removed + 1
}

/// Unload the screen of a closed window and its areas, unless another
/// window still shows the same screen.
fn unload_screen(session: &mut Session, win: &Window) {
    let Some(screen) = &win.screen else {
        return;
    };
    if session.wm.windows().any(|w| w.screen.as_ref() == Some(screen)) {
        return;
    }

    let stage = session.main.stage_mut();
    for area in stage.relationship_targets(screen, REL_AREAS) {
        stage.unload(&area);
    }
    stage.unload(screen);
}
