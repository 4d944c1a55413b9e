//! In-memory platform backend.
//!
//! Serves background (server) sessions that never show a window, and doubles
//! as the scripted provider in tests: the handle is cheaply cloneable and all
//! clones share one state, so a test can keep a clone to inject native events
//! or OS modifier state while the session owns the boxed system.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::rc::Rc;

use glam::{IVec2, UVec2};

use crate::event::{EventKind, NativeEvent};
use crate::system::{sanitize_size, AnchorError, PlatformSystem};
use crate::types::{
    DrawingContextType, ModifierKey, NativeWindowHandle, StandardCursor, WindowDescriptor,
    WindowOrder, WindowState,
};

#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    pub descriptor: WindowDescriptor,
    pub state: WindowState,
    pub title: String,
    pub cursor: StandardCursor,
    pub swaps: usize,
    pub raised: usize,
}

#[derive(Debug)]
struct HeadlessState {
    next_handle: u64,
    clock_ms: u64,
    windows: BTreeMap<NativeWindowHandle, HeadlessWindow>,
    pending: VecDeque<NativeEvent>,
    held: HashSet<ModifierKey>,
    cursor: IVec2,
    display: UVec2,
    dpi_hint: f32,
    native_pixel_size: f32,
    fail_creation: bool,
    create_calls: usize,
    current_context: Option<NativeWindowHandle>,
}

impl Default for HeadlessState {
    fn default() -> Self {
        Self {
            next_handle: 1,
            clock_ms: 0,
            windows: BTreeMap::new(),
            pending: VecDeque::new(),
            held: HashSet::new(),
            cursor: IVec2::ZERO,
            display: UVec2::new(1920, 1080),
            dpi_hint: 96.0,
            native_pixel_size: 1.0,
            fail_creation: false,
            create_calls: 0,
            current_context: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessSystem {
    inner: Rc<RefCell<HeadlessState>>,
}

impl HeadlessSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a native event stamped with the internal clock.
    pub fn push_event(&self, window: Option<NativeWindowHandle>, kind: EventKind) {
        let mut state = self.inner.borrow_mut();
        state.clock_ms += 1;
        let time_ms = state.clock_ms;
        state.pending.push_back(NativeEvent::new(time_ms, window, kind));
    }

    /// Queues a fully built event, keeping its timestamp.
    pub fn push_native_event(&self, event: NativeEvent) {
        let mut state = self.inner.borrow_mut();
        state.clock_ms = state.clock_ms.max(event.time_ms);
        state.pending.push_back(event);
    }

    pub fn set_modifier_held(&self, key: ModifierKey, held: bool) {
        let mut state = self.inner.borrow_mut();
        if held {
            state.held.insert(key);
        } else {
            state.held.remove(&key);
        }
    }

    pub fn move_cursor(&self, position: IVec2) {
        self.inner.borrow_mut().cursor = position;
    }

    pub fn set_display_dimensions(&self, size: UVec2) {
        self.inner.borrow_mut().display = size;
    }

    pub fn set_dpi_hint(&self, dpi: f32) {
        self.inner.borrow_mut().dpi_hint = dpi;
    }

    pub fn set_native_pixel_size(&self, size: f32) {
        self.inner.borrow_mut().native_pixel_size = size;
    }

    /// Makes every following `create_window` call fail until cleared.
    pub fn fail_window_creation(&self, fail: bool) {
        self.inner.borrow_mut().fail_creation = fail;
    }

    pub fn create_calls(&self) -> usize {
        self.inner.borrow().create_calls
    }

    pub fn window_count(&self) -> usize {
        self.inner.borrow().windows.len()
    }

    pub fn window(&self, handle: NativeWindowHandle) -> Option<HeadlessWindow> {
        self.inner.borrow().windows.get(&handle).cloned()
    }

    pub fn current_context(&self) -> Option<NativeWindowHandle> {
        self.inner.borrow().current_context
    }

    fn with_window<R>(
        &self,
        handle: NativeWindowHandle,
        f: impl FnOnce(&mut HeadlessWindow) -> R,
    ) -> Result<R, AnchorError> {
        let mut state = self.inner.borrow_mut();
        let window = state
            .windows
            .get_mut(&handle)
            .ok_or(AnchorError::InvalidWindow(handle))?;
        Ok(f(window))
    }
}

impl PlatformSystem for HeadlessSystem {
    fn create_window(&mut self, desc: &WindowDescriptor) -> Result<NativeWindowHandle, AnchorError> {
        let mut state = self.inner.borrow_mut();
        state.create_calls += 1;
        if state.fail_creation {
            return Err(AnchorError::WindowCreation("headless creation disabled".into()));
        }
        if let Some(parent) = desc.parent {
            if !state.windows.contains_key(&parent) {
                return Err(AnchorError::InvalidWindow(parent));
            }
        }

        let handle = NativeWindowHandle::from_raw(state.next_handle);
        state.next_handle += 1;

        let mut descriptor = desc.clone();
        descriptor.size = sanitize_size(desc.size);
        state.windows.insert(
            handle,
            HeadlessWindow {
                title: desc.title.clone(),
                state: desc.state,
                descriptor,
                cursor: StandardCursor::Default,
                swaps: 0,
                raised: 0,
            },
        );
        tracing::trace!("Headless window {:?} created", handle);
        Ok(handle)
    }

    fn dispose_window(&mut self, window: NativeWindowHandle) -> Result<(), AnchorError> {
        let mut state = self.inner.borrow_mut();
        state
            .windows
            .remove(&window)
            .ok_or(AnchorError::InvalidWindow(window))?;
        if state.current_context == Some(window) {
            state.current_context = None;
        }
        Ok(())
    }

    fn valid_window(&self, window: NativeWindowHandle) -> bool {
        self.inner.borrow().windows.contains_key(&window)
    }

    fn process_events(&mut self, _wait: bool) -> bool {
        !self.inner.borrow().pending.is_empty()
    }

    fn take_events(&mut self) -> Vec<NativeEvent> {
        self.inner.borrow_mut().pending.drain(..).collect()
    }

    fn modifier_key_state(&self, key: ModifierKey) -> bool {
        self.inner.borrow().held.contains(&key)
    }

    fn cursor_position(&self) -> IVec2 {
        self.inner.borrow().cursor
    }

    fn set_cursor_position(&mut self, position: IVec2) -> Result<(), AnchorError> {
        self.inner.borrow_mut().cursor = position;
        Ok(())
    }

    fn set_cursor_shape(&mut self, window: NativeWindowHandle, cursor: StandardCursor) {
        let _ = self.with_window(window, |w| w.cursor = cursor);
    }

    fn main_display_dimensions(&self) -> UVec2 {
        self.inner.borrow().display
    }

    fn dpi_hint(&self, _window: NativeWindowHandle) -> f32 {
        self.inner.borrow().dpi_hint
    }

    fn native_pixel_size(&self, _window: NativeWindowHandle) -> f32 {
        self.inner.borrow().native_pixel_size
    }

    fn window_state(&self, window: NativeWindowHandle) -> WindowState {
        self.inner
            .borrow()
            .windows
            .get(&window)
            .map(|w| w.state)
            .unwrap_or_default()
    }

    fn set_window_state(&mut self, window: NativeWindowHandle, state: WindowState) -> Result<(), AnchorError> {
        self.with_window(window, |w| w.state = state)
    }

    fn set_window_order(&mut self, window: NativeWindowHandle, order: WindowOrder) -> Result<(), AnchorError> {
        self.with_window(window, |w| {
            if order == WindowOrder::Top {
                w.raised += 1;
            }
        })
    }

    fn set_title(&mut self, window: NativeWindowHandle, title: &str) {
        let _ = self.with_window(window, |w| w.title = title.to_owned());
    }

    fn is_dialog_window(&self, window: NativeWindowHandle) -> bool {
        self.inner
            .borrow()
            .windows
            .get(&window)
            .is_some_and(|w| w.descriptor.is_dialog)
    }

    fn activate_drawing_context(&mut self, window: NativeWindowHandle) -> Result<(), AnchorError> {
        if !self.valid_window(window) {
            return Err(AnchorError::InvalidWindow(window));
        }
        self.inner.borrow_mut().current_context = Some(window);
        Ok(())
    }

    fn swap_buffers(&mut self, window: NativeWindowHandle) -> Result<(), AnchorError> {
        self.with_window(window, |w| w.swaps += 1)
    }

    fn drawing_context_type(&self, window: NativeWindowHandle) -> DrawingContextType {
        self.inner
            .borrow()
            .windows
            .get(&window)
            .map(|w| w.descriptor.context_type)
            .unwrap_or(DrawingContextType::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventConsumer;
    use crate::types::WindowFlags;

    fn descriptor() -> WindowDescriptor {
        WindowDescriptor {
            parent: None,
            title: "Main".into(),
            icon: String::new(),
            position: IVec2::ZERO,
            size: UVec2::new(800, 600),
            state: WindowState::Normal,
            is_dialog: false,
            context_type: DrawingContextType::Vulkan,
            flags: WindowFlags::empty(),
        }
    }

    struct Recorder(Vec<EventKind>);

    impl EventConsumer for Recorder {
        fn process_event(&mut self, event: NativeEvent) -> bool {
            self.0.push(event.kind);
            true
        }
    }

    #[test]
    fn test_handles_are_sequential_and_shared_between_clones() {
        let probe = HeadlessSystem::new();
        let mut system = probe.clone();
        let a = system.create_window(&descriptor()).unwrap();
        let b = system.create_window(&descriptor()).unwrap();
        assert_eq!(a.as_raw(), 1);
        assert_eq!(b.as_raw(), 2);
        assert_eq!(probe.window_count(), 2);
        assert_eq!(probe.create_calls(), 2);
    }

    #[test]
    fn test_creation_failure_is_reported() {
        let probe = HeadlessSystem::new();
        let mut system = probe.clone();
        probe.fail_window_creation(true);
        assert!(matches!(
            system.create_window(&descriptor()),
            Err(AnchorError::WindowCreation(_))
        ));
        assert_eq!(probe.window_count(), 0);
        assert_eq!(probe.create_calls(), 1);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut system = HeadlessSystem::new();
        let mut desc = descriptor();
        desc.parent = Some(NativeWindowHandle::from_raw(42));
        assert!(matches!(
            system.create_window(&desc),
            Err(AnchorError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_dispatch_preserves_order() {
        let probe = HeadlessSystem::new();
        let mut system = probe.clone();
        probe.push_event(None, EventKind::WindowActivate);
        probe.push_event(None, EventKind::Wheel { z: 1 });
        probe.push_event(None, EventKind::QuitRequest);
        assert!(system.process_events(false));

        let mut recorder = Recorder(Vec::new());
        system.dispatch_events(&mut recorder);
        assert_eq!(
            recorder.0,
            vec![EventKind::WindowActivate, EventKind::Wheel { z: 1 }, EventKind::QuitRequest]
        );
        assert!(!system.process_events(false));
    }

    #[test]
    fn test_dispose_clears_current_context() {
        let mut system = HeadlessSystem::new();
        let handle = system.create_window(&descriptor()).unwrap();
        system.activate_drawing_context(handle).unwrap();
        assert_eq!(system.current_context(), Some(handle));
        system.dispose_window(handle).unwrap();
        assert_eq!(system.current_context(), None);
        assert!(system.dispose_window(handle).is_err());
    }
}
