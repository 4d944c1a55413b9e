//! Process-wide flags, owned by the session instead of a global singleton.

/// Flags fixed at startup or toggled by long-running jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Globals {
    /// Server mode: no native windows are shown.
    pub background: bool,
    /// Started with `--factory-startup`; user preferences were not read.
    pub factory_startup: bool,
    /// A render job is running; windows should not be redrawn.
    pub is_rendering: bool,
    /// Trace every translated input event.
    pub debug_events: bool,
}

impl Globals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    pub fn with_factory_startup(mut self, factory_startup: bool) -> Self {
        self.factory_startup = factory_startup;
        self
    }

    pub fn with_debug_events(mut self, debug_events: bool) -> Self {
        self.debug_events = debug_events;
        self
    }
}
