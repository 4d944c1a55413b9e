//! Notifiers: coarse "something changed" broadcasts.
//!
//! Notifiers are queued on the window manager and drained once per tick in
//! push order. They are not input events; they tell the UI layer what to
//! refresh (a window was added, a scene changed, ...).

use std::collections::VecDeque;

use engine_state::{PrimPath, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifierCategory {
    Wm,
    Window,
    Screen,
    Scene,
    Space,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotifierAction {
    #[default]
    None,
    Edited,
    Evaluated,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notifier {
    /// Window the change concerns, `None` for all windows.
    pub window: Option<WindowId>,
    pub category: NotifierCategory,
    pub data: u32,
    pub subtype: u32,
    pub action: NotifierAction,
    /// What changed. Not owned; may no longer exist by the time the notifier is read.
    pub reference: Option<PrimPath>,
}

impl Notifier {
    pub fn new(category: NotifierCategory) -> Self {
        Self {
            window: None,
            category,
            data: 0,
            subtype: 0,
            action: NotifierAction::None,
            reference: None,
        }
    }

    pub fn with_window(mut self, window: WindowId) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_action(mut self, action: NotifierAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_data(mut self, data: u32, subtype: u32) -> Self {
        self.data = data;
        self.subtype = subtype;
        self
    }

    pub fn with_reference(mut self, reference: PrimPath) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Whether this notifier concerns `window`.
    pub fn targets(&self, window: WindowId) -> bool {
        self.window.map_or(true, |w| w == window)
    }
}

#[derive(Debug, Default)]
pub struct NotifierQueue {
    queue: VecDeque<Notifier>,
}

impl NotifierQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notifier: Notifier) {
        tracing::trace!("Notifier pushed: {:?}", notifier);
        self.queue.push_back(notifier);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notifier> {
        self.queue.iter()
    }

    /// Takes all queued notifiers, oldest first.
    pub fn drain(&mut self) -> Vec<Notifier> {
        self.queue.drain(..).collect()
    }

    /// Drops notifiers aimed at `window` once it is gone.
    pub fn remove_window(&mut self, window: WindowId) {
        self.queue.retain(|n| n.window != Some(window));
    }
}
