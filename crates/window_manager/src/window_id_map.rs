//! WindowId allocation and native handle mapping
//!
//! Windows get their [`WindowId`] when they are added to the manager, long
//! before a native window exists. Once realized, the native handle is bound
//! here so incoming platform events can be routed back to the window.

use std::collections::HashMap;

use anchor::NativeWindowHandle;
use engine_state::WindowId;

/// Mapping between native handles and window ids.
#[derive(Debug)]
pub struct WindowIdMap {
    next_id: u64,
    forward_map: HashMap<NativeWindowHandle, WindowId>,
    reverse_map: HashMap<WindowId, NativeWindowHandle>,
}

impl WindowIdMap {
    pub fn new() -> Self {
        Self {
            next_id: 1, // 0 is never handed out
            forward_map: HashMap::new(),
            reverse_map: HashMap::new(),
        }
    }

    /// Allocate the next window id. Ids are never reused.
    pub fn allocate(&mut self) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Bind a realized native handle to `id`, replacing any previous binding.
    pub fn bind(&mut self, id: WindowId, handle: NativeWindowHandle) {
        if let Some(old) = self.reverse_map.insert(id, handle) {
            self.forward_map.remove(&old);
        }
        self.forward_map.insert(handle, id);
    }

    pub fn get_id(&self, handle: NativeWindowHandle) -> Option<WindowId> {
        self.forward_map.get(&handle).copied()
    }

    pub fn get_handle(&self, id: WindowId) -> Option<NativeWindowHandle> {
        self.reverse_map.get(&id).copied()
    }

    /// Remove the binding of `id`, returning the handle it had.
    pub fn unbind(&mut self, id: WindowId) -> Option<NativeWindowHandle> {
        let handle = self.reverse_map.remove(&id)?;
        self.forward_map.remove(&handle);
        Some(handle)
    }
}

impl Default for WindowIdMap {
    fn default() -> Self {
        Self::new()
    }
}
