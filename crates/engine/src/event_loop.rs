//! Main loop
//
// Opens the main window, then ticks the session until something schedules an
// exit. A pending quit prompt is answered on stdin between ticks.

use std::io::{self, BufRead, Write as _};

use anyhow::Context as _;
use engine_state::DefaultLayout;
use window_manager::handlers::{add_main_window, respond_to_quit_prompt};
use window_manager::{QuitChoice, Session};

/// Run until an exit is scheduled. Returns the exit status.
pub fn run(session: &mut Session, layout: &DefaultLayout) -> anyhow::Result<i32> {
    let main = add_main_window(session, layout).context("Failed to open the main window")?;
    session.ctx_set_window(Some(main));
    tracing::info!("Main window {main} open");

    if session.globals.background {
        // Nothing drives a background session once startup is done.
        session.tick();
        session.request_exit(0);
    }

    loop {
        if let Some(code) = step(session, &mut io::stdin().lock()) {
            return Ok(code);
        }
    }
}

/// One pass of the loop: tick, answer a pending quit prompt from `input`,
/// and return the exit status once an exit is scheduled.
fn step(session: &mut Session, input: &mut impl BufRead) -> Option<i32> {
    session.tick();

    if session.quit_prompt().is_some() {
        let choice = ask_quit_choice(input);
        if let Err(e) = respond_to_quit_prompt(session, choice) {
            tracing::error!("Could not answer the quit prompt: {e}");
        }
    }

    let code = session.take_exit_request()?;
    tracing::info!("Exiting with status {code}");
    Some(code)
}

/// Ask on the terminal. Anything unreadable counts as cancel.
fn ask_quit_choice(input: &mut impl BufRead) -> QuitChoice {
    print!("Save changes before quitting? [s]ave / [d]iscard / [c]ancel: ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => QuitChoice::Cancel,
        Ok(_) => parse_quit_choice(&line),
    }
}

fn parse_quit_choice(line: &str) -> QuitChoice {
    match line.trim().to_ascii_lowercase().as_str() {
        "s" | "save" => QuitChoice::Save,
        "d" | "discard" => QuitChoice::Discard,
        _ => QuitChoice::Cancel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor::HeadlessSystem;
    use engine_state::{Globals, Main, MemoryStage, Preferences};
    use window_manager::handlers::quit_with_optional_confirmation_prompt;
    use window_manager::operator::operator_exec;
    use window_manager::ops::register_window_operators;
    use window_manager::ops::window_ops::WINDOW_NEW;
    use window_manager::{MsgBus, OperatorRegistry, QuitFlow};

    fn session_on(stage: MemoryStage, globals: Globals) -> (Session, DefaultLayout) {
        let (main, layout) = Main::with_default_layout(stage);
        let mut registry = OperatorRegistry::new();
        register_window_operators(&mut registry).unwrap();
        let session = Session::new(
            Box::new(HeadlessSystem::new()),
            main,
            Preferences::default(),
            globals,
            registry,
            MsgBus::new(),
        );
        (session, layout)
    }

    fn background_session() -> (Session, DefaultLayout) {
        session_on(MemoryStage::new(), Globals::new().with_background(true))
    }

    #[test]
    fn test_quit_choice_parsing() {
        assert_eq!(parse_quit_choice("s\n"), QuitChoice::Save);
        assert_eq!(parse_quit_choice(" Discard "), QuitChoice::Discard);
        assert_eq!(parse_quit_choice("what"), QuitChoice::Cancel);
        assert_eq!(ask_quit_choice(&mut io::empty()), QuitChoice::Cancel);
        assert_eq!(ask_quit_choice(&mut "d\n".as_bytes()), QuitChoice::Discard);
    }

    #[test]
    fn test_background_session_exits_after_startup() {
        let (mut session, layout) = background_session();
        assert_eq!(run(&mut session, &layout).unwrap(), 0);
        assert_eq!(session.wm.len(), 1);
    }

    #[test]
    fn test_new_window_then_save_on_quit_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("documents").join("untitled.toml");
        let stage = MemoryStage::open(&file).unwrap();
        let (mut session, layout) = session_on(stage, Globals::new());

        let main = add_main_window(&mut session, &layout).unwrap();
        session.ctx_set_window(Some(main));
        operator_exec(&mut session, WINDOW_NEW, Default::default()).unwrap();
        assert_eq!(session.wm.len(), 2);
        assert!(session.main.is_dirty());

        let flow = quit_with_optional_confirmation_prompt(&mut session, Some(main)).unwrap();
        assert_eq!(flow, QuitFlow::PromptIfDirty);
        assert_eq!(step(&mut session, &mut "save\n".as_bytes()), Some(0));

        assert!(!session.main.is_dirty());
        let saved = MemoryStage::open(&file).unwrap();
        assert!(saved.prim_count() > 6);
    }

    #[test]
    fn test_cancelled_prompt_keeps_looping() {
        let (mut session, layout) = session_on(MemoryStage::new(), Globals::new());
        let main = add_main_window(&mut session, &layout).unwrap();
        session.ctx_set_window(Some(main));
        operator_exec(&mut session, WINDOW_NEW, Default::default()).unwrap();

        quit_with_optional_confirmation_prompt(&mut session, Some(main)).unwrap();
        assert_eq!(step(&mut session, &mut "c\n".as_bytes()), None);
        assert!(session.quit_prompt().is_none());
    }
}
