mod common;

use anchor::{EventKind, Key, KeyData, ModifierKey, MouseButton, NativeWindowHandle};
use common::Harness;
use glam::IVec2;
use proptest::prelude::*;
use window_manager::handlers::process_events;
use window_manager::{Event, EventQueue, EventType, EventValue};

#[test]
fn test_activate_with_stale_shift() {
    let mut h = Harness::new();
    let main = h.main;
    {
        let win = h.session.wm.window_mut(main).unwrap();
        win.eventstate.modifiers.shift = 1;
        win.eventstate.keymodifier = Some(Key::Letter('e'));
    }
    h.system.set_modifier_held(ModifierKey::LeftShift, false);
    h.push(main, EventKind::WindowActivate);

    process_events(&mut h.session);

    let win = h.session.wm.window(main).unwrap();
    let queued: Vec<_> = win.event_queue.iter().map(|e| (e.ty, e.val)).collect();
    assert_eq!(
        queued,
        [
            (EventType::Key(Key::LeftShift), EventValue::Release),
            (EventType::MouseMove, EventValue::Nothing),
        ]
    );
    let moved = win.event_queue.last().unwrap();
    assert_eq!(moved.prev_xy, moved.xy);
    assert!(!moved.is_repeat);
    assert_eq!(win.eventstate.keymodifier, None);
    assert_eq!(win.eventstate.modifiers.shift, 0);
}

#[test]
fn test_native_input_keeps_arrival_order() {
    let mut h = Harness::new();
    let main = h.main;
    h.push(main, EventKind::CursorMove { position: IVec2::new(5, 6) });
    h.push(main, EventKind::ButtonDown(MouseButton::Left));
    h.push(main, EventKind::ButtonUp(MouseButton::Left));
    h.push(main, EventKind::KeyDown(KeyData::new(Key::Letter('k'))));
    h.push(main, EventKind::Wheel { z: -1 });

    process_events(&mut h.session);

    let win = h.session.wm.window(main).unwrap();
    let types: Vec<_> = win.event_queue.iter().map(|e| e.ty).collect();
    assert_eq!(
        types,
        [
            EventType::MouseMove,
            EventType::LeftMouse,
            EventType::LeftMouse,
            EventType::Key(Key::Letter('k')),
            EventType::WheelDown,
        ]
    );
    assert!(win.event_queue.iter().all(|e| e.xy == IVec2::new(5, 6)));
}

#[test]
fn test_events_for_unknown_handle_are_dropped() {
    let mut h = Harness::new();
    let unknown = NativeWindowHandle::from_raw(h.handle(h.main).as_raw() + 50);
    h.system.push_event(Some(unknown), EventKind::WindowUpdate);
    process_events(&mut h.session);
    assert!(h.session.wm.notifiers.is_empty());
}

#[test]
fn test_tick_drains_queues_and_redraws() {
    let mut h = Harness::new();
    let main = h.main;
    h.push(main, EventKind::KeyDown(KeyData::new(Key::Letter('z'))));
    h.push(main, EventKind::WindowUpdate);

    h.session.tick();

    let win = h.session.wm.window(main).unwrap();
    assert!(win.event_queue.is_empty());
    assert!(!win.needs_redraw);
    assert!(h.system.window(h.handle(main)).unwrap().swaps >= 1);
    assert_eq!(h.session.ctx.window(), Some(main));
}

fn event_type() -> impl Strategy<Value = EventType> {
    prop_oneof![
        Just(EventType::LeftMouse),
        Just(EventType::RightMouse),
        Just(EventType::MouseMove),
        Just(EventType::WheelUp),
        (b'a'..=b'z').prop_map(|c| EventType::Key(Key::Letter(c as char))),
        (1u8..=24).prop_map(|n| EventType::Key(Key::F(n))),
    ]
}

proptest! {
    #[test]
    fn prop_queue_is_fifo(types in prop::collection::vec(event_type(), 0..64)) {
        let mut queue = EventQueue::new();
        for (i, ty) in types.iter().enumerate() {
            let mut event = Event::new(*ty, EventValue::Press);
            event.time = i as f64;
            queue.push(event);
        }

        let mut drained = Vec::new();
        while let Some(event) = queue.pop() {
            drained.push((event.ty, event.time));
        }
        let expected: Vec<_> = types.iter().enumerate().map(|(i, ty)| (*ty, i as f64)).collect();
        prop_assert_eq!(drained, expected);
    }

    #[test]
    fn prop_pumped_keys_arrive_in_order(keys in prop::collection::vec(b'a'..=b'z', 0..32)) {
        let mut h = Harness::new();
        let main = h.main;
        for c in &keys {
            h.push(main, EventKind::KeyDown(KeyData::new(Key::Letter(*c as char))));
        }
        process_events(&mut h.session);

        let win = h.session.wm.window(main).unwrap();
        let seen: Vec<_> = win.event_queue.iter().map(|e| e.ty).collect();
        let expected: Vec<_> = keys.iter().map(|c| EventType::Key(Key::Letter(*c as char))).collect();
        prop_assert_eq!(seen, expected);
    }
}
