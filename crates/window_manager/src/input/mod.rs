//! Input handling module
//!
//! Translates native input into window-manager [`Event`]s. Every translated
//! event is filled from the window's event state (cursor, modifiers, click
//! history), the state is updated, and the event is appended to the
//! window's queue.

pub mod conversion;
pub mod keyboard;
pub mod modifiers;
pub mod mouse;

use anchor::{EventKind, NativeEvent};

use crate::event::{EventType, EventValue};
use crate::window::Window;

pub use conversion::{key_from_str, key_to_string, ToWmEvent};
pub use keyboard::handle_keyboard_input;
pub use modifiers::{handle_modifiers_changed, os_modifier_held};
pub use mouse::{handle_cursor_moved, handle_mouse_input};

/// Translate `native` and append it to `window`'s queue.
///
/// Returns `false` when the native kind carries no input.
///
/// # Arguments
/// * `window` - Target window
/// * `native` - Native event, pointer positions in desktop space
/// * `double_click_time` - Seconds
/// * `debug_events` - Trace every translated event
pub fn add_native_event(
    window: &mut Window,
    native: &NativeEvent,
    double_click_time: f64,
    debug_events: bool,
) -> bool {
    let Some((ty, val)) = native.kind.to_wm() else {
        return false;
    };

    let state = &mut window.eventstate;
    let mut event = state.snapshot();
    event.prev_ty = state.ty;
    event.prev_val = state.val;
    event.ty = ty;
    event.val = val;
    event.is_repeat = false;
    event.utf8.clear();
    event.ascii = 0;
    event.time = native.time_ms as f64 / 1000.0;

    match &native.kind {
        EventKind::CursorMove { position } => {
            let local = window.desktop_to_local(*position);
            handle_cursor_moved(&mut window.eventstate, &mut event, local);
        }
        EventKind::ButtonDown(_) | EventKind::ButtonUp(_) => {
            handle_mouse_input(&mut window.eventstate, &mut event, double_click_time);
        }
        EventKind::KeyDown(data) | EventKind::KeyUp(data) => {
            handle_keyboard_input(&mut window.eventstate, &mut event, data);
        }
        _ => {
            event.xy = window.eventstate.xy;
            event.prev_xy = window.eventstate.xy;
        }
    }

    let state = &mut window.eventstate;
    state.ty = event.ty;
    state.val = event.val;
    state.time = event.time;

    if debug_events {
        tracing::debug!(
            "{}: {:?} {:?} at {} (mods {:?})",
            window.id,
            event.ty,
            event.val,
            event.xy,
            event.modifiers
        );
    }

    window.event_queue.push(event);
    true
}

/// Queue a mouse-move at the cached cursor position whose previous position
/// equals its current one.
pub fn add_mousemove(window: &mut Window) {
    let state = &window.eventstate;
    let mut event = state.snapshot();
    event.prev_ty = state.ty;
    event.prev_val = state.val;
    event.ty = EventType::MouseMove;
    event.val = EventValue::Nothing;
    event.prev_xy = event.xy;
    event.is_repeat = false;
    event.utf8.clear();
    event.ascii = 0;
    window.event_queue.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor::{Key, KeyData, MouseButton};
    use engine_state::WindowId;
    use glam::IVec2;

    fn native(time_ms: u64, kind: EventKind) -> NativeEvent {
        NativeEvent::new(time_ms, None, kind)
    }

    #[test]
    fn test_cursor_converted_to_local() {
        let mut window = Window::new(WindowId(1), None);
        window.pos = IVec2::new(100, 50);
        let moved = native(0, EventKind::CursorMove { position: IVec2::new(130, 80) });
        assert!(add_native_event(&mut window, &moved, 0.35, false));
        assert_eq!(window.eventstate.xy, IVec2::new(30, 30));
        assert_eq!(window.event_queue.last().map(|e| e.xy), Some(IVec2::new(30, 30)));
    }

    #[test]
    fn test_lifecycle_kind_not_queued() {
        let mut window = Window::new(WindowId(1), None);
        assert!(!add_native_event(&mut window, &native(0, EventKind::WindowUpdate), 0.35, false));
        assert!(window.event_queue.is_empty());
    }

    #[test]
    fn test_double_click_through_native_events() {
        let mut window = Window::new(WindowId(1), None);
        for (t, kind) in [
            (1000, EventKind::ButtonDown(MouseButton::Left)),
            (1100, EventKind::ButtonUp(MouseButton::Left)),
            (1200, EventKind::ButtonDown(MouseButton::Left)),
        ] {
            add_native_event(&mut window, &native(t, kind), 0.35, false);
        }
        let vals: Vec<_> = window.event_queue.iter().map(|e| e.val).collect();
        assert_eq!(vals, vec![EventValue::Press, EventValue::Release, EventValue::DblClick]);
    }

    #[test]
    fn test_ctrl_held_on_following_key() {
        let mut window = Window::new(WindowId(1), None);
        add_native_event(
            &mut window,
            &native(0, EventKind::KeyDown(KeyData::new(Key::LeftControl))),
            0.35,
            false,
        );
        add_native_event(
            &mut window,
            &native(5, EventKind::KeyDown(KeyData::new(Key::Letter('q')))),
            0.35,
            false,
        );
        let last = window.event_queue.last().unwrap();
        assert_eq!(last.ty, EventType::Key(Key::Letter('q')));
        assert_eq!(last.prev_ty, EventType::Key(Key::LeftControl));
        assert_eq!(last.modifiers.ctrl, 1);
    }

    #[test]
    fn test_add_mousemove_has_no_motion() {
        let mut window = Window::new(WindowId(1), None);
        window.eventstate.xy = IVec2::new(12, 34);
        add_mousemove(&mut window);
        let event = window.event_queue.pop().unwrap();
        assert_eq!(event.ty, EventType::MouseMove);
        assert_eq!(event.xy, event.prev_xy);
        assert!(!event.is_repeat);
    }
}
