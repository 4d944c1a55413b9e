//! Session fixtures for unit tests.

use anchor::HeadlessSystem;
use engine_state::{DefaultLayout, Globals, Main, MemoryStage, Preferences, WindowId};

use crate::handlers::lifecycle::add_main_window;
use crate::msgbus::MsgBus;
use crate::operator::OperatorRegistry;
use crate::ops::register_window_operators;
use crate::session::Session;

pub(crate) struct TestSession {
    pub session: Session,
    /// Shares state with the session's platform provider.
    pub system: HeadlessSystem,
    pub layout: DefaultLayout,
    /// Main window of [`TestSession::with_main_window`]; `WindowId(0)` otherwise.
    pub main: WindowId,
}

impl TestSession {
    /// A session with the window operators plus whatever `register` adds, and no windows.
    pub fn build(register: impl FnOnce(&mut OperatorRegistry)) -> Self {
        let system = HeadlessSystem::new();
        let (main, layout) = Main::with_default_layout(MemoryStage::new());
        let mut registry = OperatorRegistry::new();
        register_window_operators(&mut registry).unwrap();
        register(&mut registry);

        let session = Session::new(
            Box::new(system.clone()),
            main,
            Preferences::default(),
            Globals::new(),
            registry,
            MsgBus::new(),
        );
        Self {
            session,
            system,
            layout,
            main: WindowId(0),
        }
    }

    pub fn new() -> Self {
        Self::build(|_| {})
    }

    /// A session with one realized main window that is also the context window.
    pub fn with_main_window() -> Self {
        let mut t = Self::new();
        t.main = add_main_window(&mut t.session, &t.layout).unwrap();
        t.session.ctx_set_window(Some(t.main));
        t
    }
}
