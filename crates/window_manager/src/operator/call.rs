//! Running operators: the poll gate, undo grouping and result handling.
//!
//! Every entry point looks the type up, asks `poll`, and only then calls
//! `invoke`/`exec`. What happens to the instance afterwards depends on the
//! result:
//!
//! - `RUNNING_MODAL`: kept as a modal handler on the window it was called in,
//!   or dropped with [`OperatorError::NoWindow`] when there is none
//! - `FINISHED`: notice sent, undo step pushed, remembered for repeat-last
//! - `CANCELLED`: dropped
//! - running and done at once: rejected, dropped, nothing else touched

use engine_state::WindowId;

use crate::error::OperatorError;
use crate::event::Event;
use crate::operator::{OperatorFlags, OperatorInstance, OperatorResult, OperatorType, Properties};
use crate::session::Session;

/// Interactive call with the event that triggered it.
pub fn operator_invoke(
    session: &mut Session,
    idname: &str,
    properties: Properties,
    event: &Event,
) -> Result<OperatorResult, OperatorError> {
    operator_call(session, idname, properties, Some(event))
}

/// Non-interactive call (scripts, repeat-last).
pub fn operator_exec(
    session: &mut Session,
    idname: &str,
    properties: Properties,
) -> Result<OperatorResult, OperatorError> {
    operator_call(session, idname, properties, None)
}

/// Re-run the last finished `REGISTER` operator through `exec`.
pub fn repeat_last_operator(session: &mut Session) -> Result<OperatorResult, OperatorError> {
    let Some(last) = session.last_operator.clone() else {
        return Err(OperatorError::NotFound("<repeat last>".into()));
    };
    tracing::debug!("Repeating {}", last.idname);
    operator_exec(session, &last.idname, last.properties)
}

fn operator_call(
    session: &mut Session,
    idname: &str,
    properties: Properties,
    event: Option<&Event>,
) -> Result<OperatorResult, OperatorError> {
    let registry = session.registry();
    let Some(ot) = registry.find(idname) else {
        return Err(OperatorError::NotFound(idname.to_owned()));
    };

    if !ot.ops.poll(session) {
        tracing::debug!("Poll failed for {idname}");
        return Err(OperatorError::PollFailed(idname.to_owned()));
    }

    let mut op = OperatorInstance::new(idname, properties);
    op.window = session.ctx.window();

    let result = with_undo_group(session, ot, |session| match event {
        Some(event) => ot.ops.invoke(session, &mut op, event),
        None => ot.ops.exec(session, &mut op),
    });

    handle_result(session, ot, op, result)
}

/// Feed `event` to a running modal operator.
///
/// Returns the instance again while it keeps running. Instances whose type
/// has gone missing or that return an invalid result are dropped and the
/// event is passed through.
pub(crate) fn operator_modal(
    session: &mut Session,
    mut op: OperatorInstance,
    event: &Event,
) -> (Option<OperatorInstance>, OperatorResult) {
    let registry = session.registry();
    let Some(ot) = registry.find(&op.idname) else {
        tracing::warn!("Modal operator {} has no registered type", op.idname);
        return (None, OperatorResult::CANCELLED | OperatorResult::PASS_THROUGH);
    };

    let result = with_undo_group(session, ot, |session| ot.ops.modal(session, &mut op, event));

    if !result.is_valid() {
        tracing::error!("Modal operator {} returned invalid result {:?}", op.idname, result);
        return (None, OperatorResult::PASS_THROUGH);
    }
    if result.contains(OperatorResult::RUNNING_MODAL) {
        return (Some(op), result);
    }
    if result.contains(OperatorResult::FINISHED) {
        operator_finished(session, ot, op);
    }
    (None, result)
}

fn with_undo_group(
    session: &mut Session,
    ot: &OperatorType,
    f: impl FnOnce(&mut Session) -> OperatorResult,
) -> OperatorResult {
    let undo = ot.flag.contains(OperatorFlags::UNDO);
    if undo {
        session.wm.push_undo_depth();
    }
    let result = f(session);
    if undo {
        session.wm.pop_undo_depth();
    }
    result
}

fn handle_result(
    session: &mut Session,
    ot: &OperatorType,
    op: OperatorInstance,
    result: OperatorResult,
) -> Result<OperatorResult, OperatorError> {
    if !result.is_valid() {
        tracing::error!("Operator {} returned invalid result {:?}", ot.idname, result);
        return Err(OperatorError::InvalidResult {
            idname: ot.idname.clone(),
            result,
        });
    }

    if result.contains(OperatorResult::RUNNING_MODAL) {
        add_modal_handler(session, op.window, op)?;
    } else if result.contains(OperatorResult::FINISHED) {
        operator_finished(session, ot, op);
    }
    Ok(result)
}

fn add_modal_handler(
    session: &mut Session,
    window: Option<WindowId>,
    op: OperatorInstance,
) -> Result<(), OperatorError> {
    let Some(win) = window.and_then(|id| session.wm.window_mut(id)) else {
        tracing::warn!("{} went modal without a window, dropping it", op.idname);
        return Err(OperatorError::NoWindow(op.idname));
    };
    tracing::debug!("{} running modal in {}", op.idname, win.id);
    win.modal_handlers.push(op);
    Ok(())
}

fn operator_finished(session: &mut Session, ot: &OperatorType, op: OperatorInstance) {
    if let Err(e) = session.msgbus.send(&ot.idname) {
        tracing::debug!("No notice for {}: {e}", ot.idname);
    }
    if ot.flag.contains(OperatorFlags::UNDO) && session.wm.undo_depth() == 0 {
        session.main.undo_push(&ot.name);
    }
    if ot.flag.contains(OperatorFlags::REGISTER) {
        session.last_operator = Some(op);
    }
}
