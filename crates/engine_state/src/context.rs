//! Typed Context
//!
//! The context routes "what is current" through every call: the current
//! window, the scene shown in it, and the screen/area/region under the
//! cursor. It never owns what it points at. Windows are referred to by
//! [`WindowId`] and stage objects by [`PrimPath`]; both are only meaningful
//! while the referenced object is still in its owning collection.
//!
//! The document, window manager and preferences are single per session and
//! are reached through the session that owns both them and this context.

use std::fmt;

use crate::path::PrimPath;

/// Stable key of a window in the window manager.
///
/// Ids are allocated from 1 and never reused within a session, so a stale id
/// simply stops resolving once its window is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "win{}", self.0)
    }
}

/// What the context needs to know about a window to make it current.
pub trait ContextWindow {
    fn id(&self) -> WindowId;
    fn scene(&self) -> Option<&PrimPath>;
    fn screen(&self) -> Option<&PrimPath>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    window: Option<WindowId>,
    scene: Option<PrimPath>,
    screen: Option<PrimPath>,
    area: Option<PrimPath>,
    region: Option<PrimPath>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    pub fn scene(&self) -> Option<&PrimPath> {
        self.scene.as_ref()
    }

    pub fn screen(&self) -> Option<&PrimPath> {
        self.screen.as_ref()
    }

    pub fn area(&self) -> Option<&PrimPath> {
        self.area.as_ref()
    }

    pub fn region(&self) -> Option<&PrimPath> {
        self.region.as_ref()
    }

    /// Make `window` current.
    ///
    /// The scene and screen are always re-derived from the window, and the
    /// area/region are cleared since they belong to the previous screen.
    pub fn set_window(&mut self, window: Option<&dyn ContextWindow>) {
        self.window = window.map(|w| w.id());
        self.scene = window.and_then(|w| w.scene().cloned());
        self.screen = window.and_then(|w| w.screen().cloned());
        self.area = None;
        self.region = None;
    }

    pub fn set_area(&mut self, area: Option<PrimPath>) {
        self.area = area;
        self.region = None;
    }

    pub fn set_region(&mut self, region: Option<PrimPath>) {
        self.region = region;
    }

    /// Drop the current window if it is `id`. Returns whether it was.
    pub fn forget_window(&mut self, id: WindowId) -> bool {
        if self.window != Some(id) {
            return false;
        }
        self.set_window(None);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestWindow {
        id: WindowId,
        scene: Option<PrimPath>,
        screen: Option<PrimPath>,
    }

    impl ContextWindow for TestWindow {
        fn id(&self) -> WindowId {
            self.id
        }
        fn scene(&self) -> Option<&PrimPath> {
            self.scene.as_ref()
        }
        fn screen(&self) -> Option<&PrimPath> {
            self.screen.as_ref()
        }
    }

    fn window(id: u64, scene: &str) -> TestWindow {
        TestWindow {
            id: WindowId(id),
            scene: Some(PrimPath::new(scene)),
            screen: Some(PrimPath::new("/Workspaces/Layout/Screen")),
        }
    }

    #[test]
    fn test_set_window_derives_scene() {
        let mut ctx = Context::new();
        let a = window(1, "/Scenes/A");
        let b = window(2, "/Scenes/B");

        ctx.set_window(Some(&a));
        assert_eq!(ctx.window(), Some(WindowId(1)));
        assert_eq!(ctx.scene(), Some(&PrimPath::new("/Scenes/A")));

        ctx.set_window(Some(&b));
        assert_eq!(ctx.scene(), Some(&PrimPath::new("/Scenes/B")));
    }

    #[test]
    fn test_clearing_window_clears_scene() {
        let mut ctx = Context::new();
        ctx.set_window(Some(&window(1, "/Scenes/A")));
        ctx.set_area(Some(PrimPath::new("/Workspaces/Layout/Screen/Area_0")));
        ctx.set_window(None);
        assert_eq!(ctx, Context::new());
    }

    #[test]
    fn test_window_without_scene() {
        let mut ctx = Context::new();
        let mut w = window(3, "/Scenes/A");
        w.scene = None;
        ctx.set_window(Some(&w));
        assert_eq!(ctx.window(), Some(WindowId(3)));
        assert_eq!(ctx.scene(), None);
    }

    #[test]
    fn test_forget_window_only_matches_current() {
        let mut ctx = Context::new();
        ctx.set_window(Some(&window(1, "/Scenes/A")));
        assert!(!ctx.forget_window(WindowId(2)));
        assert!(ctx.forget_window(WindowId(1)));
        assert_eq!(ctx.window(), None);
        assert_eq!(ctx.scene(), None);
    }
}
