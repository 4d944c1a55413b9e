//! The session: one running application instance.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │                Session                   │
//! ├──────────────────────────────────────────┤
//! │ system: Box<dyn PlatformSystem>          │
//! │ main: Main (document + stage)            │
//! │ wm: WindowManager                        │
//! │ prefs / globals                          │
//! │ ctx: Context (CTX)                       │
//! │ registry: Arc<OperatorRegistry> (sealed) │
//! │ msgbus / keymap                          │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Everything that used to be process-global lives here and is passed by
//! reference. The context only stores ids and paths; the session is what
//! resolves them.

use std::sync::Arc;

use anchor::PlatformSystem;
use engine_state::{Context, ContextWindow, Globals, Main, Preferences, PrimPath, Stage, WindowId};

use crate::handlers;
use crate::handlers::quit::QuitPrompt;
use crate::keymap::Keymap;
use crate::manager::WindowManager;
use crate::msgbus::MsgBus;
use crate::operator::{OperatorInstance, OperatorRegistry};
use crate::window::Window;

pub struct Session {
    /// Platform window provider
    system: Box<dyn PlatformSystem>,

    /// Open document
    pub main: Main,

    /// Windows, notifiers and undo depth
    pub wm: WindowManager,

    /// User preferences
    pub prefs: Preferences,

    /// Process flags (background, factory startup, rendering)
    pub globals: Globals,

    /// Current window/scene/screen/area/region
    pub ctx: Context,

    /// Operator types; sealed, read-only from here on
    registry: Arc<OperatorRegistry>,

    /// "Operator ran" notices
    pub msgbus: MsgBus,

    /// Window-level key bindings
    pub keymap: Keymap,

    /// Last finished `REGISTER` operator, for repeat-last
    pub(crate) last_operator: Option<OperatorInstance>,

    /// Pending quit confirmation
    pub(crate) quit_prompt: Option<QuitPrompt>,

    /// Process exit status requested by the quit flow
    exit_code: Option<i32>,
}

impl Session {
    /// Build a session around an already-populated operator registry.
    ///
    /// The registry is sealed here and every operator type is announced on
    /// the message bus, so all registration is finished before the first
    /// event is dispatched.
    ///
    /// # Arguments
    /// * `system` - Platform window provider
    /// * `main` - The document to edit
    /// * `prefs` - User preferences
    /// * `globals` - Process flags
    /// * `registry` - Operator types
    /// * `msgbus` - Message bus, possibly with listeners already attached
    pub fn new(
        system: Box<dyn PlatformSystem>,
        main: Main,
        prefs: Preferences,
        globals: Globals,
        mut registry: OperatorRegistry,
        mut msgbus: MsgBus,
    ) -> Self {
        registry.seal();
        for ot in registry.iter() {
            msgbus.register(ot);
        }
        tracing::debug!("Session created with {} operator types", registry.len());

        Self {
            system,
            main,
            wm: WindowManager::new(),
            prefs,
            globals,
            ctx: Context::new(),
            registry: Arc::new(registry),
            msgbus,
            keymap: Keymap::default_window_keymap(),
            last_operator: None,
            quit_prompt: None,
            exit_code: None,
        }
    }

    /// Replace the keymap (builder pattern)
    pub fn with_keymap(mut self, keymap: Keymap) -> Self {
        self.keymap = keymap;
        self
    }

    pub fn system(&self) -> &dyn PlatformSystem {
        self.system.as_ref()
    }

    pub fn system_mut(&mut self) -> &mut dyn PlatformSystem {
        self.system.as_mut()
    }

    pub fn registry(&self) -> Arc<OperatorRegistry> {
        Arc::clone(&self.registry)
    }

    // ===== Context accessors =====

    /// The context window, resolved against the window table.
    pub fn ctx_window(&self) -> Option<&Window> {
        self.wm.window(self.ctx.window()?)
    }

    pub fn ctx_scene(&self) -> Option<&PrimPath> {
        self.ctx.scene()
    }

    /// Make `id` the context window. Unknown ids clear it.
    pub fn ctx_set_window(&mut self, id: Option<WindowId>) {
        let window = id.and_then(|id| self.wm.window(id));
        if id.is_some() && window.is_none() {
            tracing::debug!("Context window {:?} is not in the window table", id);
        }
        self.ctx.set_window(window.map(|w| w as &dyn ContextWindow));
    }

    pub fn data_stage(&self) -> &dyn Stage {
        self.main.stage()
    }

    // ===== Exit =====

    /// Schedule a process exit at the end of the current tick.
    pub fn request_exit(&mut self, code: i32) {
        tracing::info!("Exit requested with status {code}");
        self.exit_code.get_or_insert(code);
    }

    pub fn exit_requested(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn take_exit_request(&mut self) -> Option<i32> {
        self.exit_code.take()
    }

    pub fn quit_prompt(&self) -> Option<&QuitPrompt> {
        self.quit_prompt.as_ref()
    }

    pub fn last_operator(&self) -> Option<&OperatorInstance> {
        self.last_operator.as_ref()
    }

    /// Double-click interval in seconds.
    pub(crate) fn double_click_time(&self) -> f64 {
        self.prefs.double_click_time_ms as f64 / 1000.0
    }

    /// Run one iteration of the main loop.
    ///
    /// Pumps native events, runs every window's handlers, processes the
    /// notifiers and redraws what they flagged.
    pub fn tick(&mut self) {
        handlers::lifecycle::process_events(self);
        handlers::dispatch::do_handlers(self);
        handlers::notifiers::do_notifiers(self);
        handlers::notifiers::draw_update(self);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("main", &self.main)
            .field("windows", &self.wm.len())
            .field("ctx", &self.ctx)
            .field("exit_code", &self.exit_code)
            .finish_non_exhaustive()
    }
}
