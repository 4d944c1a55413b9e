//! Notifier processing and redraw

use anchor::WindowState;
use engine_state::WindowId;

use crate::handlers::lifecycle::make_drawable;
use crate::notifier::NotifierCategory;
use crate::session::Session;

/// Drain the notifier queue in push order and flag windows for redraw.
pub fn do_notifiers(session: &mut Session) {
    for notifier in session.wm.notifiers.drain() {
        match notifier.category {
            NotifierCategory::Window | NotifierCategory::Wm => {
                for win in session.wm.windows_mut().filter(|w| notifier.targets(w.id)) {
                    win.needs_redraw = true;
                }
            }
            NotifierCategory::Scene => {
                for win in session.wm.windows_mut() {
                    let shows = match &notifier.reference {
                        Some(scene) => win.scene.as_ref() == Some(scene),
                        None => true,
                    };
                    if shows && notifier.targets(win.id) {
                        win.needs_redraw = true;
                    }
                }
            }
            NotifierCategory::Screen | NotifierCategory::Space => {
                for win in session.wm.windows_mut() {
                    let shows = match &notifier.reference {
                        Some(path) => win.screen.as_ref().is_some_and(|s| path.has_prefix(s)),
                        None => true,
                    };
                    if shows && notifier.targets(win.id) {
                        win.needs_redraw = true;
                    }
                }
            }
        }
    }
}

/// Swap every realized window that was flagged for redraw.
///
/// Nothing is drawn while a render job is running.
pub fn draw_update(session: &mut Session) {
    if session.globals.is_rendering {
        return;
    }

    let dirty: Vec<WindowId> = session
        .wm
        .windows()
        .filter(|w| w.needs_redraw && w.is_realized() && w.state != WindowState::Minimized)
        .map(|w| w.id)
        .collect();

    for id in dirty {
        make_drawable(session, id);
        let Some(handle) = session.wm.window(id).and_then(|w| w.native_handle()) else {
            continue;
        };
        if let Err(e) = session.system_mut().swap_buffers(handle) {
            tracing::warn!("Failed to swap buffers of {id}: {e}");
            continue;
        }
        if let Some(win) = session.wm.window_mut(id) {
            win.needs_redraw = false;
        }
    }
}
