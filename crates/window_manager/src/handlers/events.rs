//! Native event dispatcher
//!
//! The platform hands over one native event at a time. Lifecycle events are
//! handled here directly; everything else is translated and appended to the
//! target window's queue for the handler loop.
//!
//! Nothing escapes this boundary: failures are logged and the event is
//! reported as not handled.

use anchor::{EventConsumer, EventKind, NativeEvent};
use engine_state::WindowId;
use glam::IVec2;

use crate::event::{EventType, EventValue, ModifierKind};
use crate::handlers::close::window_close;
use crate::handlers::lifecycle::{make_drawable, set_dpi};
use crate::handlers::quit::quit_with_optional_confirmation_prompt;
use crate::input;
use crate::notifier::{Notifier, NotifierAction, NotifierCategory};
use crate::session::Session;

impl EventConsumer for Session {
    fn process_event(&mut self, event: NativeEvent) -> bool {
        dispatch_native_event(self, event)
    }
}

/// Route one native event.
///
/// # Arguments
/// * `session` - The running session
/// * `event` - Native event from the platform
///
/// # Returns
/// Whether the event was handled.
pub fn dispatch_native_event(session: &mut Session, event: NativeEvent) -> bool {
    let target = event.window.and_then(|handle| session.wm.window_by_native(handle));

    if event.kind == EventKind::QuitRequest {
        let host = target.or_else(|| session.wm.first_window());
        if let Err(e) = quit_with_optional_confirmation_prompt(session, host) {
            tracing::error!("Quit request failed: {e}");
        }
        return true;
    }

    let Some(id) = target else {
        tracing::warn!("Ignoring {:?} for unknown native window {:?}", event.kind, event.window);
        return false;
    };

    match &event.kind {
        EventKind::WindowDeactivate => handle_deactivate(session, id),
        EventKind::WindowActivate => handle_activate(session, id),
        EventKind::WindowClose => window_close(session, id),
        EventKind::WindowUpdate => {
            make_drawable(session, id);
            session
                .wm
                .add_notifier(Notifier::new(NotifierCategory::Window).with_window(id));
        }
        EventKind::WindowSize { .. } | EventKind::WindowMove { .. } | EventKind::WindowDpiHintChanged => {
            handle_geometry(session, id, &event.kind);
        }
        _ => {
            let double_click_time = session.double_click_time();
            let debug_events = session.globals.debug_events;
            let Some(win) = session.wm.window_mut(id) else {
                return false;
            };
            return input::add_native_event(win, &event, double_click_time, debug_events);
        }
    }
    true
}

fn handle_deactivate(session: &mut Session, id: WindowId) {
    let Some(win) = session.wm.window_mut(id) else {
        return;
    };
    win.eventstate.modifiers.clear();
    win.active = false;

    let mut event = win.eventstate.snapshot();
    event.prev_ty = win.eventstate.ty;
    event.prev_val = win.eventstate.val;
    event.ty = EventType::WindowDeactivate;
    event.val = EventValue::Nothing;
    win.event_queue.push(event);

    if session.wm.active() == Some(id) {
        session.wm.set_active(None);
    }
}

/// Focus gained: resync modifiers and cursor with the OS, then queue a
/// mouse-move so hover state catches up.
fn handle_activate(session: &mut Session, id: WindowId) {
    session.wm.set_active(Some(id));

    let held: Vec<ModifierKind> = ModifierKind::ORDER
        .into_iter()
        .filter(|kind| input::os_modifier_held(session.system(), *kind))
        .collect();
    let cursor = session.system().cursor_position();

    let Some(win) = session.wm.window_mut(id) else {
        return;
    };
    win.active = true;
    for release in input::handle_modifiers_changed(&mut win.eventstate, |kind| held.contains(&kind)) {
        win.event_queue.push(release);
    }
    win.eventstate.keymodifier = None;
    win.eventstate.xy = win.desktop_to_local(cursor);
    win.addmousemove = true;

    make_drawable(session, id);

    if let Some(win) = session.wm.window_mut(id) {
        input::add_mousemove(win);
    }
}

fn handle_geometry(session: &mut Session, id: WindowId, kind: &EventKind) {
    let Some(handle) = session.wm.window(id).and_then(|w| w.native_handle()) else {
        return;
    };
    let native_pixel_size = session.system().native_pixel_size(handle);
    let state = session.system().window_state(handle);

    let Some(win) = session.wm.window_mut(id) else {
        return;
    };
    let to_os = |v: IVec2| (v.as_vec2() / native_pixel_size.max(1.0)).as_ivec2();
    match *kind {
        EventKind::WindowSize { width, height } => {
            win.size = to_os(IVec2::new(width as i32, height as i32));
            win.state = state;
        }
        EventKind::WindowMove { x, y } => win.pos = to_os(IVec2::new(x, y)),
        _ => {}
    }
    win.native_pixel_size = native_pixel_size;

    set_dpi(session, id);
    session.wm.add_notifier(
        Notifier::new(NotifierCategory::Window)
            .with_window(id)
            .with_action(NotifierAction::Edited),
    );
}
