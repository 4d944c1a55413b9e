//! Handler loop
//!
//! Drains each window's queue in arrival order. Every event is offered to
//! the window's modal operators, newest first, and then to the keymap:
//!
//! ```text
//!  event ──► modal[n-1] ──PASS_THROUGH──► modal[n-2] ... ──► keymap items
//!                │                                            │
//!                └── anything else: consumed                  └── operator_invoke (poll gated)
//! ```

use std::mem;

use engine_state::WindowId;

use crate::error::OperatorError;
use crate::event::Event;
use crate::input;
use crate::operator::call::operator_modal;
use crate::operator::{operator_invoke, OperatorResult};
use crate::session::Session;

/// Run every window's queued events through its handlers.
///
/// The context window follows the window being processed and is restored
/// afterwards.
pub fn do_handlers(session: &mut Session) {
    let prev = session.ctx.window();

    for id in session.wm.window_ids() {
        while let Some(event) = session.wm.window_mut(id).and_then(|w| w.event_queue.pop()) {
            session.ctx_set_window(Some(id));
            handle_event(session, id, &event);
        }

        if let Some(win) = session.wm.window_mut(id) {
            if win.addmousemove {
                win.addmousemove = false;
                input::add_mousemove(win);
            }
        }
    }

    session.ctx_set_window(prev);
}

/// Offer one event to the handlers of window `id`.
pub fn handle_event(session: &mut Session, id: WindowId, event: &Event) -> OperatorResult {
    if handle_modal(session, id, event) {
        return OperatorResult::HANDLED;
    }
    handle_keymap(session, event)
}

/// Returns whether a modal operator consumed the event.
fn handle_modal(session: &mut Session, id: WindowId, event: &Event) -> bool {
    let Some(win) = session.wm.window_mut(id) else {
        return false;
    };
    let handlers = mem::take(&mut win.modal_handlers);
    if handlers.is_empty() {
        return false;
    }

    let mut consumed = false;
    let mut kept = Vec::with_capacity(handlers.len());
    for op in handlers.into_iter().rev() {
        if consumed {
            kept.push(op);
            continue;
        }
        let (op, result) = operator_modal(session, op, event);
        kept.extend(op);
        if !result.contains(OperatorResult::PASS_THROUGH) {
            consumed = true;
        }
    }
    kept.reverse();

    // Operators that went modal during this event were pushed meanwhile and stay on top.
    match session.wm.window_mut(id) {
        Some(win) => {
            let added = mem::replace(&mut win.modal_handlers, kept);
            win.modal_handlers.extend(added);
        }
        None => tracing::debug!("{id} closed while handling {:?}, dropping its modal operators", event.ty),
    }
    consumed
}

fn handle_keymap(session: &mut Session, event: &Event) -> OperatorResult {
    let items: Vec<_> = session.keymap.matching(event).cloned().collect();

    for item in items {
        match operator_invoke(session, &item.idname, item.properties, event) {
            Ok(result) if result.contains(OperatorResult::PASS_THROUGH) => continue,
            Ok(_) => return OperatorResult::HANDLED,
            Err(OperatorError::PollFailed(idname)) => {
                tracing::debug!("{idname} cannot run here, trying the next binding");
            }
            Err(e) => tracing::warn!("{e}"),
        }
    }
    OperatorResult::PASS_THROUGH
}
