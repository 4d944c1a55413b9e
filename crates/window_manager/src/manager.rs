//! The window manager: owner of every window of a session.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │             WindowManager                │
//! ├──────────────────────────────────────────┤
//! │ windows: BTreeMap<WindowId, Window>      │
//! │ ids: WindowIdMap (native ↔ WindowId)     │
//! │ drawable / active: Option<WindowId>      │
//! │ notifiers: NotifierQueue                 │
//! │ undo_depth                               │
//! │ drags                                    │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Ids grow monotonically, so iterating the map visits windows in creation
//! order and "the first window" is stable.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use anchor::NativeWindowHandle;
use engine_state::WindowId;

use crate::notifier::{Notifier, NotifierQueue};
use crate::window::Window;
use crate::window_id_map::WindowIdMap;

/// An in-flight drag-and-drop payload.
pub struct Drag {
    pub payload: Box<dyn Any>,
}

impl fmt::Debug for Drag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Drag(..)")
    }
}

#[derive(Debug, Default)]
pub struct WindowManager {
    windows: BTreeMap<WindowId, Window>,
    ids: WindowIdMap,
    drawable: Option<WindowId>,
    active: Option<WindowId>,
    pub notifiers: NotifierQueue,
    undo_depth: u32,
    drags: Vec<Drag>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unrealized window to the table.
    ///
    /// A non-dialog window asked to become the child of a child is re-parented
    /// up to the main window at the top of that chain, so a non-dialog child
    /// always hangs directly off a main window. A parent that is not in the
    /// table is dropped.
    ///
    /// # Arguments
    /// * `parent` - Requested parent
    /// * `is_dialog` - Dialogs keep whatever parent they ask for
    pub fn add_window(&mut self, parent: Option<WindowId>, is_dialog: bool) -> WindowId {
        let parent = parent.and_then(|requested| {
            if !self.windows.contains_key(&requested) {
                tracing::warn!("Parent window {requested} does not exist, opening top-level");
                return None;
            }
            let mut parent = requested;
            while let Some(up) = self.windows.get(&parent).and_then(|w| w.parent).filter(|_| !is_dialog) {
                parent = up;
            }
            Some(parent)
        });

        let id = self.ids.allocate();
        let mut window = Window::new(id, parent);
        window.is_dialog = is_dialog;
        self.windows.insert(id, window);
        tracing::debug!("Added window {id} (parent {parent:?})");
        id
    }

    /// Remove `id` from the table and drop every reference the manager holds to it.
    ///
    /// Children are left untouched; closing them first is the caller's job.
    pub fn remove_window(&mut self, id: WindowId) -> Option<Window> {
        let window = self.windows.remove(&id)?;
        self.ids.unbind(id);
        if self.drawable == Some(id) {
            self.drawable = None;
        }
        if self.active == Some(id) {
            self.active = None;
        }
        self.notifiers.remove_window(id);
        Some(window)
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(&id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(&id)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    /// Windows in creation order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.values()
    }

    pub fn windows_mut(&mut self) -> impl Iterator<Item = &mut Window> {
        self.windows.values_mut()
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn first_window(&self) -> Option<WindowId> {
        self.windows.keys().next().copied()
    }

    /// Any main window other than `exclude`.
    pub fn other_main_window(&self, exclude: WindowId) -> Option<WindowId> {
        self.windows
            .values()
            .find(|w| w.id != exclude && w.parent.is_none())
            .map(|w| w.id)
    }

    pub fn children_of(&self, id: WindowId) -> Vec<WindowId> {
        self.windows
            .values()
            .filter(|w| w.parent == Some(id))
            .map(|w| w.id)
            .collect()
    }

    pub fn window_by_native(&self, handle: NativeWindowHandle) -> Option<WindowId> {
        self.ids.get_id(handle)
    }

    pub(crate) fn bind_native(&mut self, id: WindowId, handle: NativeWindowHandle) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.native = Some(handle);
            self.ids.bind(id, handle);
        }
    }

    pub fn drawable(&self) -> Option<WindowId> {
        self.drawable
    }

    pub(crate) fn set_drawable(&mut self, id: Option<WindowId>) {
        self.drawable = id.filter(|id| self.windows.contains_key(id));
    }

    pub fn active(&self) -> Option<WindowId> {
        self.active
    }

    pub(crate) fn set_active(&mut self, id: Option<WindowId>) {
        self.active = id.filter(|id| self.windows.contains_key(id));
    }

    pub fn add_notifier(&mut self, notifier: Notifier) {
        self.notifiers.push(notifier);
    }

    pub fn undo_depth(&self) -> u32 {
        self.undo_depth
    }

    pub(crate) fn push_undo_depth(&mut self) {
        self.undo_depth += 1;
    }

    pub(crate) fn pop_undo_depth(&mut self) {
        self.undo_depth = self.undo_depth.saturating_sub(1);
    }

    pub fn start_drag(&mut self, payload: Box<dyn Any>) {
        self.drags.push(Drag { payload });
    }

    pub fn drags(&self) -> &[Drag] {
        &self.drags
    }

    pub fn clear_drags(&mut self) {
        self.drags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::NotifierCategory;

    #[test]
    fn test_child_of_child_is_flattened() {
        let mut wm = WindowManager::new();
        let main = wm.add_window(None, false);
        let child = wm.add_window(Some(main), false);
        let grandchild = wm.add_window(Some(child), false);
        assert_eq!(wm.window(grandchild).and_then(|w| w.parent), Some(main));
    }

    #[test]
    fn test_dialog_keeps_requested_parent() {
        let mut wm = WindowManager::new();
        let main = wm.add_window(None, false);
        let child = wm.add_window(Some(main), false);
        let dialog = wm.add_window(Some(child), true);
        assert_eq!(wm.window(dialog).and_then(|w| w.parent), Some(child));

        // a window opened from the dialog still lands on the main window
        let from_dialog = wm.add_window(Some(dialog), false);
        assert_eq!(wm.window(from_dialog).and_then(|w| w.parent), Some(main));
    }

    #[test]
    fn test_missing_parent_opens_top_level() {
        let mut wm = WindowManager::new();
        let id = wm.add_window(Some(WindowId(42)), false);
        assert!(wm.window(id).is_some_and(|w| w.is_main()));
    }

    #[test]
    fn test_remove_clears_references() {
        let mut wm = WindowManager::new();
        let a = wm.add_window(None, false);
        let b = wm.add_window(None, false);
        wm.bind_native(b, NativeWindowHandle::from_raw(5));
        wm.set_drawable(Some(b));
        wm.set_active(Some(b));
        wm.add_notifier(Notifier::new(NotifierCategory::Window).with_window(b));

        assert!(wm.remove_window(b).is_some());
        assert_eq!(wm.drawable(), None);
        assert_eq!(wm.active(), None);
        assert!(wm.notifiers.is_empty());
        assert_eq!(wm.window_by_native(NativeWindowHandle::from_raw(5)), None);
        assert_eq!(wm.first_window(), Some(a));
    }

    #[test]
    fn test_drawable_must_be_in_table() {
        let mut wm = WindowManager::new();
        wm.set_drawable(Some(WindowId(9)));
        assert_eq!(wm.drawable(), None);
    }

    #[test]
    fn test_other_main_window() {
        let mut wm = WindowManager::new();
        let a = wm.add_window(None, false);
        let _child = wm.add_window(Some(a), false);
        assert_eq!(wm.other_main_window(a), None);
        let b = wm.add_window(None, false);
        assert_eq!(wm.other_main_window(a), Some(b));
    }

    #[test]
    fn test_drags() {
        let mut wm = WindowManager::new();
        wm.start_drag(Box::new("asset"));
        assert_eq!(wm.drags().len(), 1);
        assert_eq!(wm.drags()[0].payload.downcast_ref::<&str>(), Some(&"asset"));
        wm.clear_drags();
        assert!(wm.drags().is_empty());
    }
}
