//! Quit confirmation flow
//!
//! ```text
//!   quit requested
//!        │
//!   show_save_prompt && document dirty?
//!        │ yes                      │ no
//!        ▼                          ▼
//!   PromptIfDirty ──Save──► save ─► ExitImmediately
//!        │ ──Discard──────────────► ExitImmediately
//!        └─Cancel──► keep running
//! ```
//!
//! The flow can run straight from the platform callback, outside the handler
//! loop, so the whole context is saved, pointed at the prompt's host and
//! restored before returning on every path.

use anchor::WindowOrder;
use engine_state::WindowId;

use crate::error::WmError;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitFlow {
    /// A prompt is waiting for [`respond_to_quit_prompt`].
    PromptIfDirty,
    /// Exit has been scheduled.
    ExitImmediately,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitChoice {
    Save,
    Discard,
    Cancel,
}

/// A pending "save changes before quitting?" question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuitPrompt {
    /// Window the prompt is shown in.
    pub host: WindowId,
}

/// Quit, asking first when there are unsaved changes and the user wants to be asked.
///
/// # Arguments
/// * `session` - The running session
/// * `host` - Window to show the prompt in
pub fn quit_with_optional_confirmation_prompt(
    session: &mut Session,
    host: Option<WindowId>,
) -> Result<QuitFlow, WmError> {
    let prev = session.ctx.clone();
    session.ctx_set_window(host);

    let result = decide_quit(session, host);

    session.ctx = prev;
    result
}

fn decide_quit(session: &mut Session, host: Option<WindowId>) -> Result<QuitFlow, WmError> {
    if !(session.prefs.show_save_prompt && session.main.is_dirty()) {
        session.request_exit(0);
        return Ok(QuitFlow::ExitImmediately);
    }

    let Some(host) = host.filter(|id| session.wm.contains(*id)) else {
        return Err(WmError::NoPromptHost);
    };

    if let Some(handle) = session.wm.window(host).and_then(|w| w.native_handle()) {
        if let Err(e) = session.system_mut().set_window_order(handle, WindowOrder::Top) {
            tracing::warn!("Failed to raise {host} for the quit prompt: {e}");
        }
    }

    tracing::info!("Unsaved changes, asking before quitting");
    session.quit_prompt = Some(QuitPrompt { host });
    Ok(QuitFlow::PromptIfDirty)
}

/// Answer the pending quit prompt.
///
/// Returns whether an exit is now scheduled. A failed save keeps the session
/// running and the prompt is gone.
pub fn respond_to_quit_prompt(session: &mut Session, choice: QuitChoice) -> Result<bool, WmError> {
    let Some(prompt) = session.quit_prompt.take() else {
        return Err(WmError::NoQuitPrompt);
    };

    let prev = session.ctx.clone();
    session.ctx_set_window(Some(prompt.host));

    let result = match choice {
        QuitChoice::Save => session.main.save().map_err(WmError::from).map(|()| {
            session.request_exit(0);
            true
        }),
        QuitChoice::Discard => {
            session.request_exit(0);
            Ok(true)
        }
        QuitChoice::Cancel => {
            tracing::debug!("Quit cancelled");
            Ok(false)
        }
    };

    session.ctx = prev;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestSession;
    use engine_state::{AttrValue, PrimPath};

    fn dirty(t: &mut TestSession) {
        t.session
            .main
            .stage_mut()
            .set_attribute(&t.layout.scene, "frame", AttrValue::Int(2))
            .unwrap();
    }

    #[test]
    fn test_clean_document_exits_without_prompt() {
        let mut t = TestSession::with_main_window();
        let flow = quit_with_optional_confirmation_prompt(&mut t.session, Some(t.main)).unwrap();
        assert_eq!(flow, QuitFlow::ExitImmediately);
        assert!(t.session.quit_prompt().is_none());
        assert_eq!(t.session.exit_requested(), Some(0));
    }

    #[test]
    fn test_dirty_document_prompts_and_restores_context() {
        let mut t = TestSession::with_main_window();
        dirty(&mut t);
        t.session.ctx_set_window(None);

        let flow = quit_with_optional_confirmation_prompt(&mut t.session, Some(t.main)).unwrap();
        assert_eq!(flow, QuitFlow::PromptIfDirty);
        assert_eq!(t.session.quit_prompt(), Some(&QuitPrompt { host: t.main }));
        assert_eq!(t.session.ctx.window(), None);
        assert_eq!(t.session.exit_requested(), None);

        let handle = t.session.wm.window(t.main).unwrap().native_handle().unwrap();
        assert_eq!(t.system.window(handle).unwrap().raised, 1);
    }

    #[test]
    fn test_prompt_round_trip_keeps_area_and_region() {
        let mut t = TestSession::with_main_window();
        dirty(&mut t);
        t.session.ctx_set_window(Some(t.main));
        let area = t.layout.screen.child("Area_0");
        t.session.ctx.set_area(Some(area.clone()));
        t.session.ctx.set_region(Some(area.child("Region_0")));
        let before = t.session.ctx.clone();

        quit_with_optional_confirmation_prompt(&mut t.session, Some(t.main)).unwrap();
        assert_eq!(t.session.ctx, before);
        respond_to_quit_prompt(&mut t.session, QuitChoice::Cancel).unwrap();
        assert_eq!(t.session.ctx, before);
        assert_eq!(t.session.ctx.area(), Some(&area));
    }

    #[test]
    fn test_prompt_without_host_is_an_error() {
        let mut t = TestSession::new();
        dirty(&mut t);
        let err = quit_with_optional_confirmation_prompt(&mut t.session, None).unwrap_err();
        assert!(matches!(err, WmError::NoPromptHost));
        assert_eq!(t.session.exit_requested(), None);
    }

    #[test]
    fn test_cancel_keeps_running() {
        let mut t = TestSession::with_main_window();
        dirty(&mut t);
        quit_with_optional_confirmation_prompt(&mut t.session, Some(t.main)).unwrap();
        assert!(!respond_to_quit_prompt(&mut t.session, QuitChoice::Cancel).unwrap());
        assert!(t.session.quit_prompt().is_none());
        assert_eq!(t.session.exit_requested(), None);
        assert!(matches!(
            respond_to_quit_prompt(&mut t.session, QuitChoice::Discard),
            Err(WmError::NoQuitPrompt)
        ));
    }

    #[test]
    fn test_save_without_file_keeps_running() {
        let mut t = TestSession::with_main_window();
        dirty(&mut t);
        quit_with_optional_confirmation_prompt(&mut t.session, Some(t.main)).unwrap();
        let err = respond_to_quit_prompt(&mut t.session, QuitChoice::Save).unwrap_err();
        assert!(matches!(err, WmError::Stage(_)));
        assert_eq!(t.session.exit_requested(), None);
        assert!(t.session.main.stage().has_prim(&PrimPath::new("/Scenes/Scene")));
    }

    #[test]
    fn test_prompt_pref_off_exits_even_when_dirty() {
        let mut t = TestSession::with_main_window();
        dirty(&mut t);
        t.session.prefs.show_save_prompt = false;
        let flow = quit_with_optional_confirmation_prompt(&mut t.session, Some(t.main)).unwrap();
        assert_eq!(flow, QuitFlow::ExitImmediately);
    }
}
