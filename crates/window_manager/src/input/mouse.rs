//! Mouse input handling
//!
//! Cursor tracking and click bookkeeping on a window's event state.

use glam::IVec2;

use crate::event::{Event, EventValue};

/// Record a cursor move at `local` on both the event and the event state.
pub fn handle_cursor_moved(state: &mut Event, event: &mut Event, local: IVec2) {
    event.prev_xy = state.xy;
    event.xy = local;
    state.prev_xy = state.xy;
    state.xy = local;
}

/// Fill in click history for a button event and detect double clicks.
///
/// A press becomes [`EventValue::DblClick`] when the previous event was a
/// release of the same button within `double_click_time` seconds of the last
/// press.
pub fn handle_mouse_input(state: &mut Event, event: &mut Event, double_click_time: f64) {
    event.xy = state.xy;
    event.prev_xy = state.xy;

    if event.val != EventValue::Press {
        return;
    }

    if is_double_click(state, event, double_click_time) {
        tracing::trace!("Double click on {:?}", event.ty);
        event.val = EventValue::DblClick;
    }

    state.prev_click_time = event.time;
    state.prev_click_xy = event.xy;
}

fn is_double_click(state: &Event, event: &Event, double_click_time: f64) -> bool {
    event.prev_ty == event.ty
        && event.prev_val == EventValue::Release
        && event.time - state.prev_click_time <= double_click_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;

    fn press(state: &Event, time: f64) -> Event {
        let mut event = state.snapshot();
        event.prev_ty = state.ty;
        event.prev_val = state.val;
        event.ty = EventType::LeftMouse;
        event.val = EventValue::Press;
        event.time = time;
        event
    }

    #[test]
    fn test_cursor_move_tracks_previous() {
        let mut state = Event::default();
        let mut event = Event::default();
        handle_cursor_moved(&mut state, &mut event, IVec2::new(4, 5));
        let mut next = Event::default();
        handle_cursor_moved(&mut state, &mut next, IVec2::new(6, 9));
        assert_eq!(next.prev_xy, IVec2::new(4, 5));
        assert_eq!(state.xy, IVec2::new(6, 9));
    }

    #[test]
    fn test_quick_second_press_is_double_click() {
        let mut state = Event::default();
        let mut first = press(&state, 1.0);
        handle_mouse_input(&mut state, &mut first, 0.35);
        assert_eq!(first.val, EventValue::Press);

        state.ty = EventType::LeftMouse;
        state.val = EventValue::Release;
        let mut second = press(&state, 1.2);
        handle_mouse_input(&mut state, &mut second, 0.35);
        assert_eq!(second.val, EventValue::DblClick);
    }

    #[test]
    fn test_slow_second_press_is_single_click() {
        let mut state = Event::default();
        let mut first = press(&state, 1.0);
        handle_mouse_input(&mut state, &mut first, 0.35);

        state.ty = EventType::LeftMouse;
        state.val = EventValue::Release;
        let mut second = press(&state, 2.0);
        handle_mouse_input(&mut state, &mut second, 0.35);
        assert_eq!(second.val, EventValue::Press);
        assert_eq!(state.prev_click_time, 2.0);
    }
}
