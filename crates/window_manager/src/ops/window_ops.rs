//! Window operators: close, new, new main, fullscreen toggle and quit.

use anchor::WindowState;
use engine_state::document::{ATTR_SPACE_TYPE, REL_AREAS};
use glam::IVec2;

use crate::error::OperatorError;
use crate::event::Event;
use crate::handlers::close::window_close;
use crate::handlers::lifecycle::{window_copy, window_open, OpenWindowParams};
use crate::handlers::quit::quit_with_optional_confirmation_prompt;
use crate::operator::{Operator, OperatorInstance, OperatorRegistry, OperatorResult, OperatorType};
use crate::session::Session;
use crate::window::Window;
use crate::window_config::{WindowConfig, DEFAULT_SPACE_TYPE};

pub const WINDOW_CLOSE: &str = "wm.window_close";
pub const WINDOW_NEW: &str = "wm.window_new";
pub const WINDOW_NEW_MAIN: &str = "wm.window_new_main";
pub const WINDOW_FULLSCREEN_TOGGLE: &str = "wm.window_fullscreen_toggle";
pub const QUIT: &str = "wm.quit";

/// A context window exists.
fn winactive(session: &Session) -> bool {
    session.ctx_window().is_some()
}

/// A context window exists and shows a screen.
fn winactive_normal(session: &Session) -> bool {
    session.ctx_window().is_some_and(|w| w.screen.is_some())
}

struct WindowClose;

impl Operator for WindowClose {
    fn poll(&self, session: &Session) -> bool {
        winactive(session)
    }

    fn exec(&self, session: &mut Session, _op: &mut OperatorInstance) -> OperatorResult {
        let Some(id) = session.ctx.window() else {
            return OperatorResult::CANCELLED;
        };
        window_close(session, id);
        OperatorResult::FINISHED
    }
}

struct WindowNew;

/// Editor type of the source window's last area.
fn source_space_type(session: &Session, source: &Window) -> String {
    let stage = session.data_stage();
    source
        .screen
        .iter()
        .flat_map(|screen| stage.relationship_targets(screen, REL_AREAS))
        .filter_map(|area| stage.attribute(&area, ATTR_SPACE_TYPE))
        .filter_map(|value| value.as_token().map(str::to_owned))
        .filter(|token| !token.is_empty())
        .last()
        .unwrap_or_else(|| DEFAULT_SPACE_TYPE.to_owned())
}

impl Operator for WindowNew {
    fn poll(&self, session: &Session) -> bool {
        winactive_normal(session)
    }

    fn exec(&self, session: &mut Session, _op: &mut OperatorInstance) -> OperatorResult {
        let Some(source) = session.ctx_window() else {
            return OperatorResult::CANCELLED;
        };
        let size = WindowConfig::new_window_size(IVec2::new(source.pixels_x(), source.pixels_y()));
        let params = OpenWindowParams::new(&session.prefs.app_name, size)
            .with_alignment(source.alignment)
            .with_space_type(&source_space_type(session, source));

        match window_open(session, &params) {
            Some(_) => OperatorResult::FINISHED,
            None => OperatorResult::CANCELLED,
        }
    }
}

struct WindowNewMain;

impl Operator for WindowNewMain {
    fn poll(&self, session: &Session) -> bool {
        winactive_normal(session)
    }

    fn exec(&self, session: &mut Session, _op: &mut OperatorInstance) -> OperatorResult {
        let Some(source) = session.ctx.window() else {
            return OperatorResult::CANCELLED;
        };
        match window_copy(session, source, false) {
            Some(_) => OperatorResult::FINISHED,
            None => OperatorResult::CANCELLED,
        }
    }
}

struct WindowFullscreenToggle;

impl Operator for WindowFullscreenToggle {
    fn poll(&self, session: &Session) -> bool {
        winactive(session)
    }

    fn exec(&self, session: &mut Session, _op: &mut OperatorInstance) -> OperatorResult {
        let Some(win) = session.ctx_window() else {
            return OperatorResult::CANCELLED;
        };
        let id = win.id;
        let Some(handle) = win.native_handle() else {
            return OperatorResult::CANCELLED;
        };

        let next = match session.system().window_state(handle) {
            WindowState::FullScreen => WindowState::Normal,
            _ => WindowState::FullScreen,
        };
        if let Err(e) = session.system_mut().set_window_state(handle, next) {
            tracing::warn!("Failed to set {id} to {next:?}: {e}");
            return OperatorResult::CANCELLED;
        }
        if let Some(win) = session.wm.window_mut(id) {
            win.state = next;
        }
        OperatorResult::FINISHED
    }
}

struct Quit;

impl Operator for Quit {
    fn invoke(&self, session: &mut Session, _op: &mut OperatorInstance, _event: &Event) -> OperatorResult {
        let host = session.ctx.window();
        match quit_with_optional_confirmation_prompt(session, host) {
            Ok(_) => OperatorResult::FINISHED,
            Err(e) => {
                tracing::warn!("Quit failed: {e}");
                OperatorResult::CANCELLED
            }
        }
    }

    fn exec(&self, session: &mut Session, _op: &mut OperatorInstance) -> OperatorResult {
        session.request_exit(0);
        OperatorResult::FINISHED
    }
}

/// Register the window operators.
pub fn register_window_operators(registry: &mut OperatorRegistry) -> Result<(), OperatorError> {
    registry.register(
        OperatorType::new(WINDOW_CLOSE, "Close Window", WindowClose)
            .with_description("Close the current window"),
    )?;
    registry.register(
        OperatorType::new(WINDOW_NEW, "New Window", WindowNew).with_description("Create a new window"),
    )?;
    registry.register(
        OperatorType::new(WINDOW_NEW_MAIN, "New Main Window", WindowNewMain)
            .with_description("Create a new main window with its own workspace and scene selection"),
    )?;
    registry.register(
        OperatorType::new(WINDOW_FULLSCREEN_TOGGLE, "Toggle Window Fullscreen", WindowFullscreenToggle)
            .with_description("Toggle the current window fullscreen"),
    )?;
    registry.register(OperatorType::new(QUIT, "Quit", Quit).with_description("Quit the application"))?;
    Ok(())
}
