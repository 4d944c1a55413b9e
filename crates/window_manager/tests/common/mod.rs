#![allow(dead_code)]

use anchor::{EventKind, HeadlessSystem, NativeWindowHandle};
use engine_state::{AttrValue, DefaultLayout, Globals, Main, MemoryStage, Preferences, WindowId};
use window_manager::handlers::add_main_window;
use window_manager::ops::register_window_operators;
use window_manager::{MsgBus, OperatorRegistry, Session};

pub struct Harness {
    pub session: Session,
    pub system: HeadlessSystem,
    pub layout: DefaultLayout,
    pub main: WindowId,
}

impl Harness {
    /// Session with the window operators, `register`'s extras and one realized main window.
    pub fn with_operators(register: impl FnOnce(&mut OperatorRegistry)) -> Self {
        Self::with_stage(MemoryStage::new(), register)
    }

    /// Like [`Harness::with_operators`] but over a caller-built stage.
    pub fn with_stage(stage: MemoryStage, register: impl FnOnce(&mut OperatorRegistry)) -> Self {
        let system = HeadlessSystem::new();
        let (main, layout) = Main::with_default_layout(stage);
        let mut registry = OperatorRegistry::new();
        register_window_operators(&mut registry).unwrap();
        register(&mut registry);

        let mut session = Session::new(
            Box::new(system.clone()),
            main,
            Preferences::default(),
            Globals::new(),
            registry,
            MsgBus::new(),
        );
        let main = add_main_window(&mut session, &layout).unwrap();
        session.ctx_set_window(Some(main));

        Self {
            session,
            system,
            layout,
            main,
        }
    }

    pub fn new() -> Self {
        Self::with_operators(|_| {})
    }

    pub fn handle(&self, id: WindowId) -> NativeWindowHandle {
        self.session.wm.window(id).unwrap().native_handle().unwrap()
    }

    /// Queue a native event for `id` on the headless provider.
    pub fn push(&self, id: WindowId, kind: EventKind) {
        self.system.push_event(Some(self.handle(id)), kind);
    }

    pub fn make_dirty(&mut self) {
        let scene = self.layout.scene.clone();
        self.session
            .main
            .stage_mut()
            .set_attribute(&scene, "frame", AttrValue::Int(12))
            .unwrap();
    }
}
