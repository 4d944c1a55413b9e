mod common;

use anchor::{EventKind, Key, KeyData};
use common::Harness;
use engine_state::MemoryStage;
use window_manager::handlers::{
    process_events, quit_with_optional_confirmation_prompt, respond_to_quit_prompt,
};
use window_manager::{QuitChoice, QuitFlow, WmError};

#[test]
fn test_clean_document_quits_without_prompt() {
    let mut h = Harness::new();
    assert!(!h.session.main.is_dirty());

    let flow = quit_with_optional_confirmation_prompt(&mut h.session, Some(h.main)).unwrap();

    assert_eq!(flow, QuitFlow::ExitImmediately);
    assert!(h.session.quit_prompt().is_none());
    assert_eq!(h.session.exit_requested(), Some(0));
}

#[test]
fn test_prompt_disabled_in_preferences() {
    let mut h = Harness::new();
    h.make_dirty();
    h.session.prefs.show_save_prompt = false;

    let flow = quit_with_optional_confirmation_prompt(&mut h.session, Some(h.main)).unwrap();
    assert_eq!(flow, QuitFlow::ExitImmediately);
}

#[test]
fn test_native_quit_request_raises_prompt() {
    let mut h = Harness::new();
    h.make_dirty();
    h.system.push_event(None, EventKind::QuitRequest);

    process_events(&mut h.session);

    assert_eq!(h.session.quit_prompt().map(|p| p.host), Some(h.main));
    assert_eq!(h.session.exit_requested(), None);
    assert_eq!(h.system.window(h.handle(h.main)).unwrap().raised, 1);
    assert_eq!(h.session.ctx.window(), Some(h.main));
}

#[test]
fn test_dirty_without_host_fails() {
    let mut h = Harness::new();
    h.make_dirty();
    let err = quit_with_optional_confirmation_prompt(&mut h.session, None).unwrap_err();
    assert!(matches!(err, WmError::NoPromptHost));
    assert_eq!(h.session.exit_requested(), None);
}

#[test]
fn test_ctrl_q_goes_through_keymap() {
    let mut h = Harness::new();
    h.make_dirty();
    h.push(h.main, EventKind::KeyDown(KeyData::new(Key::LeftControl)));
    h.push(h.main, EventKind::KeyDown(KeyData::new(Key::Letter('q'))));

    h.session.tick();

    assert!(h.session.quit_prompt().is_some());
    assert_eq!(h.session.take_exit_request(), None);
}

#[test]
fn test_cancel_keeps_running() {
    let mut h = Harness::new();
    h.make_dirty();
    quit_with_optional_confirmation_prompt(&mut h.session, Some(h.main)).unwrap();

    assert!(!respond_to_quit_prompt(&mut h.session, QuitChoice::Cancel).unwrap());
    assert!(h.session.quit_prompt().is_none());
    assert_eq!(h.session.exit_requested(), None);
    assert!(h.session.main.is_dirty());

    let err = respond_to_quit_prompt(&mut h.session, QuitChoice::Cancel).unwrap_err();
    assert!(matches!(err, WmError::NoQuitPrompt));
}

#[test]
fn test_discard_exits_with_changes() {
    let mut h = Harness::new();
    h.make_dirty();
    quit_with_optional_confirmation_prompt(&mut h.session, Some(h.main)).unwrap();

    assert!(respond_to_quit_prompt(&mut h.session, QuitChoice::Discard).unwrap());
    assert_eq!(h.session.take_exit_request(), Some(0));
    assert!(h.session.main.is_dirty());
}

#[test]
fn test_save_writes_then_exits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.toml");
    let mut h = Harness::with_stage(MemoryStage::new().with_file_path(&path), |_| {});
    h.make_dirty();
    quit_with_optional_confirmation_prompt(&mut h.session, Some(h.main)).unwrap();

    assert!(respond_to_quit_prompt(&mut h.session, QuitChoice::Save).unwrap());
    assert!(path.exists());
    assert_eq!(h.session.exit_requested(), Some(0));
}

#[test]
fn test_failed_save_keeps_running() {
    let mut h = Harness::new();
    h.make_dirty();
    quit_with_optional_confirmation_prompt(&mut h.session, Some(h.main)).unwrap();

    let err = respond_to_quit_prompt(&mut h.session, QuitChoice::Save).unwrap_err();
    assert!(matches!(err, WmError::Stage(_)));
    assert_eq!(h.session.exit_requested(), None);
    assert!(h.session.quit_prompt().is_none());
}
