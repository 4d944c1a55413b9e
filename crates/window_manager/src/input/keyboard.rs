//! Keyboard input handling
//!
//! Keeps the modifier counters and the raw key modifier of a window's event
//! state in step with key presses and releases.

use anchor::KeyData;

use crate::event::{Event, EventType, EventValue, ModifierKind};

/// Apply one key event to the event state and fill in its modifiers.
///
/// Modifier keys move their group's counter; repeats never do. The first
/// non-modifier key pressed becomes the raw modifier of the events after it
/// and is cleared again when that key is released.
///
/// # Arguments
/// * `state` - The window's event state
/// * `event` - The event being built, already typed
/// * `data` - Native key payload
pub fn handle_keyboard_input(state: &mut Event, event: &mut Event, data: &KeyData) {
    let EventType::Key(key) = event.ty else {
        return;
    };

    event.is_repeat = data.is_repeat;
    event.xy = state.xy;
    event.prev_xy = state.xy;
    event.keymodifier = state.keymodifier;

    if event.val == EventValue::Press {
        event.utf8 = data.utf8.clone();
        event.ascii = data.ascii;
    }

    match ModifierKind::from_key(key) {
        Some(kind) if !data.is_repeat => match event.val {
            EventValue::Press => state.modifiers.press(kind),
            EventValue::Release => state.modifiers.release(kind),
            _ => {}
        },
        Some(_) => {}
        None => match event.val {
            EventValue::Press if state.keymodifier.is_none() && !data.is_repeat => {
                state.keymodifier = Some(key);
            }
            EventValue::Release if state.keymodifier == Some(key) => {
                state.keymodifier = None;
            }
            _ => {}
        },
    }

    event.modifiers = state.modifiers;
}
