//! Native backend on top of winit.
//!
//! winit owns its event loop, so the backend never calls `run_app`. Each
//! `process_events` pumps the loop once with `pump_app_events`, translating
//! window events into [`NativeEvent`]s as they arrive. Window creation needs
//! an `ActiveEventLoop`, so `create_window` queues a request and pumps until
//! the handler has had a chance to build it.
//!
//! ```text
//! process_events ──► pump_app_events ──► WinitState (ApplicationHandler)
//!                                          ├─ resumed / about_to_wait: build queued windows
//!                                          └─ window_event: translate ──► pending
//! take_events ◄──────────────────────────────────────────────────────────── pending
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{IVec2, UVec2};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorIcon, Fullscreen, Window as WinitWindow, WindowAttributes, WindowId};

use crate::event::{EventKind, KeyData, NativeEvent};
use crate::system::{sanitize_size, AnchorError, PlatformSystem};
use crate::types::{
    DrawingContextType, Key, ModifierKey, MouseButton, NativeWindowHandle, StandardCursor,
    WindowDescriptor, WindowFlags, WindowOrder, WindowState,
};

/// Pumps allowed while waiting for a queued window to be built.
const CREATE_PUMP_ATTEMPTS: usize = 4;

struct NativeWindow {
    window: Arc<WinitWindow>,
    context_type: DrawingContextType,
    is_dialog: bool,
}

struct CreateRequest {
    handle: NativeWindowHandle,
    attributes: WindowAttributes,
    minimized: bool,
}

struct WinitState {
    started: Instant,
    next_handle: u64,
    windows: HashMap<NativeWindowHandle, NativeWindow>,
    by_winit_id: HashMap<WindowId, NativeWindowHandle>,
    create_queue: VecDeque<CreateRequest>,
    create_failures: HashMap<NativeWindowHandle, String>,
    pending: VecDeque<NativeEvent>,
    held: HashSet<ModifierKey>,
    cursor: IVec2,
    display: UVec2,
}

impl WinitState {
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn push(&mut self, window: Option<NativeWindowHandle>, kind: EventKind) {
        let time_ms = self.now_ms();
        self.pending.push_back(NativeEvent::new(time_ms, window, kind));
    }

    fn build_queued_windows(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(monitor) = event_loop.primary_monitor() {
            let size = monitor.size();
            self.display = UVec2::new(size.width, size.height);
        }

        while let Some(request) = self.create_queue.pop_front() {
            match event_loop.create_window(request.attributes) {
                Ok(window) => {
                    if request.minimized {
                        window.set_minimized(true);
                    }
                    self.by_winit_id.insert(window.id(), request.handle);
                    self.windows.insert(
                        request.handle,
                        NativeWindow {
                            window: Arc::new(window),
                            context_type: DrawingContextType::Vulkan,
                            is_dialog: false,
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!("winit refused to create window {:?}: {e}", request.handle);
                    self.create_failures.insert(request.handle, e.to_string());
                }
            }
        }
    }

    fn track_key(&mut self, key: Key, pressed: bool) {
        if let Some(modifier) = key.as_modifier() {
            if pressed {
                self.held.insert(modifier);
            } else {
                self.held.remove(&modifier);
            }
        }
    }
}

impl ApplicationHandler for WinitState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.build_queued_windows(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(&handle) = self.by_winit_id.get(&window_id) else {
            return;
        };
        let target = Some(handle);

        match event {
            WindowEvent::CloseRequested => self.push(target, EventKind::WindowClose),
            WindowEvent::Focused(true) => self.push(target, EventKind::WindowActivate),
            WindowEvent::Focused(false) => self.push(target, EventKind::WindowDeactivate),
            WindowEvent::RedrawRequested => self.push(target, EventKind::WindowUpdate),
            WindowEvent::Resized(size) => self.push(
                target,
                EventKind::WindowSize {
                    width: size.width,
                    height: size.height,
                },
            ),
            WindowEvent::Moved(position) => self.push(
                target,
                EventKind::WindowMove {
                    x: position.x,
                    y: position.y,
                },
            ),
            WindowEvent::ScaleFactorChanged { .. } => {
                self.push(target, EventKind::WindowDpiHintChanged)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let origin = self
                    .windows
                    .get(&handle)
                    .and_then(|w| w.window.inner_position().ok())
                    .map(|p| IVec2::new(p.x, p.y))
                    .unwrap_or(IVec2::ZERO);
                let desktop = origin + IVec2::new(position.x as i32, position.y as i32);
                self.cursor = desktop;
                self.push(target, EventKind::CursorMove { position: desktop });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = convert_mouse_button(button) else {
                    return;
                };
                let kind = match state {
                    ElementState::Pressed => EventKind::ButtonDown(button),
                    ElementState::Released => EventKind::ButtonUp(button),
                };
                self.push(target, kind);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let z = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y.round() as i32,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 20.0).round() as i32,
                };
                if z != 0 {
                    self.push(target, EventKind::Wheel { z });
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = match event.physical_key {
                    PhysicalKey::Code(code) => convert_keycode(code),
                    PhysicalKey::Unidentified(_) => Key::Unknown,
                };
                let pressed = event.state == ElementState::Pressed;
                self.track_key(key, pressed);

                let mut data = KeyData::new(key).repeated(event.repeat);
                if pressed {
                    if let Some(text) = event.text.as_ref() {
                        data = data.with_text(text.as_str());
                    }
                }
                let kind = if pressed {
                    EventKind::KeyDown(data)
                } else {
                    EventKind::KeyUp(data)
                };
                self.push(target, kind);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                // winit does not say which side was released, so drop both.
                let state = modifiers.state();
                if !state.shift_key() {
                    self.held.remove(&ModifierKey::LeftShift);
                    self.held.remove(&ModifierKey::RightShift);
                }
                if !state.control_key() {
                    self.held.remove(&ModifierKey::LeftControl);
                    self.held.remove(&ModifierKey::RightControl);
                }
                if !state.alt_key() {
                    self.held.remove(&ModifierKey::LeftAlt);
                    self.held.remove(&ModifierKey::RightAlt);
                }
                if !state.super_key() {
                    self.held.remove(&ModifierKey::Os);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.build_queued_windows(event_loop);
    }
}

pub struct WinitSystem {
    event_loop: Option<EventLoop<()>>,
    state: WinitState,
}

impl WinitSystem {
    pub fn new() -> Result<Self, AnchorError> {
        let event_loop =
            EventLoop::new().map_err(|e| AnchorError::BackendUnavailable(e.to_string()))?;
        Ok(Self {
            event_loop: Some(event_loop),
            state: WinitState {
                started: Instant::now(),
                next_handle: 1,
                windows: HashMap::new(),
                by_winit_id: HashMap::new(),
                create_queue: VecDeque::new(),
                create_failures: HashMap::new(),
                pending: VecDeque::new(),
                held: HashSet::new(),
                cursor: IVec2::ZERO,
                display: UVec2::new(1920, 1080),
            },
        })
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        let Some(mut event_loop) = self.event_loop.take() else {
            return;
        };
        let status = event_loop.pump_app_events(timeout, &mut self.state);
        self.event_loop = Some(event_loop);
        if let PumpStatus::Exit(code) = status {
            tracing::debug!("winit event loop exited with code {code}");
            self.state.push(None, EventKind::QuitRequest);
        }
    }

    fn native(&self, handle: NativeWindowHandle) -> Result<&NativeWindow, AnchorError> {
        self.state
            .windows
            .get(&handle)
            .ok_or(AnchorError::InvalidWindow(handle))
    }

    fn attributes(&self, desc: &WindowDescriptor) -> Result<WindowAttributes, AnchorError> {
        let size = sanitize_size(desc.size);
        let mut attributes = WinitWindow::default_attributes()
            .with_title(desc.title.clone())
            .with_inner_size(PhysicalSize::new(size.x, size.y))
            .with_position(PhysicalPosition::new(desc.position.x, desc.position.y))
            .with_visible(!desc.flags.contains(WindowFlags::HIDDEN))
            .with_maximized(desc.state == WindowState::Maximized);

        if desc.state == WindowState::FullScreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        if let Some(parent) = desc.parent {
            let raw = self
                .native(parent)?
                .window
                .window_handle()
                .map_err(|e| AnchorError::WindowCreation(e.to_string()))?
                .as_raw();
            // SAFETY: the parent stays alive until the window manager closes
            // its children, which always happens before the parent is disposed.
            attributes = unsafe { attributes.with_parent_window(Some(raw)) };
        }
        Ok(attributes)
    }
}

impl PlatformSystem for WinitSystem {
    fn create_window(&mut self, desc: &WindowDescriptor) -> Result<NativeWindowHandle, AnchorError> {
        let attributes = self.attributes(desc)?;
        let handle = NativeWindowHandle::from_raw(self.state.next_handle);
        self.state.next_handle += 1;
        self.state.create_queue.push_back(CreateRequest {
            handle,
            attributes,
            minimized: desc.state == WindowState::Minimized,
        });

        for _ in 0..CREATE_PUMP_ATTEMPTS {
            self.pump(Some(Duration::ZERO));
            if let Some(reason) = self.state.create_failures.remove(&handle) {
                return Err(AnchorError::WindowCreation(reason));
            }
            if let Some(native) = self.state.windows.get_mut(&handle) {
                native.context_type = desc.context_type;
                native.is_dialog = desc.is_dialog;
                return Ok(handle);
            }
        }

        self.state.create_queue.retain(|r| r.handle != handle);
        Err(AnchorError::WindowCreation(
            "event loop never became active".into(),
        ))
    }

    fn dispose_window(&mut self, window: NativeWindowHandle) -> Result<(), AnchorError> {
        let native = self
            .state
            .windows
            .remove(&window)
            .ok_or(AnchorError::InvalidWindow(window))?;
        self.state.by_winit_id.remove(&native.window.id());
        Ok(())
    }

    fn valid_window(&self, window: NativeWindowHandle) -> bool {
        self.state.windows.contains_key(&window)
    }

    fn process_events(&mut self, wait: bool) -> bool {
        let timeout = if wait { None } else { Some(Duration::ZERO) };
        self.pump(timeout);
        !self.state.pending.is_empty()
    }

    fn take_events(&mut self) -> Vec<NativeEvent> {
        self.state.pending.drain(..).collect()
    }

    fn modifier_key_state(&self, key: ModifierKey) -> bool {
        self.state.held.contains(&key)
    }

    fn cursor_position(&self) -> IVec2 {
        self.state.cursor
    }

    fn set_cursor_position(&mut self, position: IVec2) -> Result<(), AnchorError> {
        let native = self
            .state
            .windows
            .values()
            .next()
            .ok_or(AnchorError::Unsupported("cursor warp without a window"))?;
        let origin = native
            .window
            .inner_position()
            .map_err(|_| AnchorError::Unsupported("window position query"))?;
        let local = position - IVec2::new(origin.x, origin.y);
        native
            .window
            .set_cursor_position(PhysicalPosition::new(local.x, local.y))
            .map_err(|_| AnchorError::Unsupported("cursor warp"))?;
        self.state.cursor = position;
        Ok(())
    }

    fn set_cursor_shape(&mut self, window: NativeWindowHandle, cursor: StandardCursor) {
        if let Ok(native) = self.native(window) {
            native.window.set_cursor(convert_cursor(cursor));
        }
    }

    fn main_display_dimensions(&self) -> UVec2 {
        self.state.display
    }

    fn dpi_hint(&self, window: NativeWindowHandle) -> f32 {
        self.native(window)
            .map(|n| (n.window.scale_factor() * 96.0) as f32)
            .unwrap_or(96.0)
    }

    fn native_pixel_size(&self, window: NativeWindowHandle) -> f32 {
        if cfg!(target_os = "macos") {
            self.native(window)
                .map(|n| n.window.scale_factor() as f32)
                .unwrap_or(1.0)
        } else {
            1.0
        }
    }

    fn window_state(&self, window: NativeWindowHandle) -> WindowState {
        let Ok(native) = self.native(window) else {
            return WindowState::Normal;
        };
        if native.window.fullscreen().is_some() {
            WindowState::FullScreen
        } else if native.window.is_minimized().unwrap_or(false) {
            WindowState::Minimized
        } else if native.window.is_maximized() {
            WindowState::Maximized
        } else {
            WindowState::Normal
        }
    }

    fn set_window_state(&mut self, window: NativeWindowHandle, state: WindowState) -> Result<(), AnchorError> {
        let native = self.native(window)?;
        match state {
            WindowState::Normal => {
                native.window.set_fullscreen(None);
                native.window.set_minimized(false);
                native.window.set_maximized(false);
            }
            WindowState::Maximized => {
                native.window.set_fullscreen(None);
                native.window.set_maximized(true);
            }
            WindowState::Minimized => native.window.set_minimized(true),
            WindowState::FullScreen => native
                .window
                .set_fullscreen(Some(Fullscreen::Borderless(None))),
        }
        Ok(())
    }

    fn set_window_order(&mut self, window: NativeWindowHandle, order: WindowOrder) -> Result<(), AnchorError> {
        let native = self.native(window)?;
        match order {
            WindowOrder::Top => native.window.focus_window(),
            WindowOrder::Bottom => return Err(AnchorError::Unsupported("lowering windows")),
        }
        Ok(())
    }

    fn set_title(&mut self, window: NativeWindowHandle, title: &str) {
        if let Ok(native) = self.native(window) {
            native.window.set_title(title);
        }
    }

    fn is_dialog_window(&self, window: NativeWindowHandle) -> bool {
        self.native(window).is_ok_and(|n| n.is_dialog)
    }

    fn activate_drawing_context(&mut self, window: NativeWindowHandle) -> Result<(), AnchorError> {
        // Swap chains belong to the renderer; binding only needs a live window.
        self.native(window).map(|_| ())
    }

    fn swap_buffers(&mut self, window: NativeWindowHandle) -> Result<(), AnchorError> {
        let native = self.native(window)?;
        native.window.pre_present_notify();
        Ok(())
    }

    fn drawing_context_type(&self, window: NativeWindowHandle) -> DrawingContextType {
        self.native(window)
            .map(|n| n.context_type)
            .unwrap_or(DrawingContextType::None)
    }

    fn raw_window_handle(&self, window: NativeWindowHandle) -> Option<RawWindowHandle> {
        let native = self.native(window).ok()?;
        native.window.window_handle().ok().map(|h| h.as_raw())
    }
}

fn convert_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    Some(match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Button4,
        WinitMouseButton::Forward => MouseButton::Button5,
        WinitMouseButton::Other(_) => return None,
    })
}

fn convert_cursor(cursor: StandardCursor) -> CursorIcon {
    match cursor {
        StandardCursor::Default => CursorIcon::Default,
        StandardCursor::Text => CursorIcon::Text,
        StandardCursor::Crosshair => CursorIcon::Crosshair,
        StandardCursor::Move => CursorIcon::Move,
        StandardCursor::Wait => CursorIcon::Wait,
        StandardCursor::Pointer => CursorIcon::Pointer,
        StandardCursor::NotAllowed => CursorIcon::NotAllowed,
        StandardCursor::ResizeHorizontal => CursorIcon::EwResize,
        StandardCursor::ResizeVertical => CursorIcon::NsResize,
    }
}

fn convert_keycode(code: KeyCode) -> Key {
    use KeyCode::*;
    match code {
        ShiftLeft => Key::LeftShift,
        ShiftRight => Key::RightShift,
        ControlLeft => Key::LeftControl,
        ControlRight => Key::RightControl,
        AltLeft => Key::LeftAlt,
        AltRight => Key::RightAlt,
        SuperLeft | SuperRight => Key::Os,

        KeyA => Key::Letter('a'),
        KeyB => Key::Letter('b'),
        KeyC => Key::Letter('c'),
        KeyD => Key::Letter('d'),
        KeyE => Key::Letter('e'),
        KeyF => Key::Letter('f'),
        KeyG => Key::Letter('g'),
        KeyH => Key::Letter('h'),
        KeyI => Key::Letter('i'),
        KeyJ => Key::Letter('j'),
        KeyK => Key::Letter('k'),
        KeyL => Key::Letter('l'),
        KeyM => Key::Letter('m'),
        KeyN => Key::Letter('n'),
        KeyO => Key::Letter('o'),
        KeyP => Key::Letter('p'),
        KeyQ => Key::Letter('q'),
        KeyR => Key::Letter('r'),
        KeyS => Key::Letter('s'),
        KeyT => Key::Letter('t'),
        KeyU => Key::Letter('u'),
        KeyV => Key::Letter('v'),
        KeyW => Key::Letter('w'),
        KeyX => Key::Letter('x'),
        KeyY => Key::Letter('y'),
        KeyZ => Key::Letter('z'),

        Digit0 | Numpad0 => Key::Digit(0),
        Digit1 | Numpad1 => Key::Digit(1),
        Digit2 | Numpad2 => Key::Digit(2),
        Digit3 | Numpad3 => Key::Digit(3),
        Digit4 | Numpad4 => Key::Digit(4),
        Digit5 | Numpad5 => Key::Digit(5),
        Digit6 | Numpad6 => Key::Digit(6),
        Digit7 | Numpad7 => Key::Digit(7),
        Digit8 | Numpad8 => Key::Digit(8),
        Digit9 | Numpad9 => Key::Digit(9),

        F1 => Key::F(1),
        F2 => Key::F(2),
        F3 => Key::F(3),
        F4 => Key::F(4),
        F5 => Key::F(5),
        F6 => Key::F(6),
        F7 => Key::F(7),
        F8 => Key::F(8),
        F9 => Key::F(9),
        F10 => Key::F(10),
        F11 => Key::F(11),
        F12 => Key::F(12),

        Space => Key::Space,
        Enter | NumpadEnter => Key::Enter,
        Tab => Key::Tab,
        Backspace => Key::Backspace,
        Escape => Key::Escape,
        Delete => Key::Delete,
        Insert => Key::Insert,
        Home => Key::Home,
        End => Key::End,
        PageUp => Key::PageUp,
        PageDown => Key::PageDown,

        ArrowUp => Key::Up,
        ArrowDown => Key::Down,
        ArrowLeft => Key::Left,
        ArrowRight => Key::Right,

        Minus => Key::Minus,
        Equal => Key::Equal,
        BracketLeft => Key::LeftBracket,
        BracketRight => Key::RightBracket,
        Backslash => Key::Backslash,
        Semicolon => Key::Semicolon,
        Quote => Key::Quote,
        Comma => Key::Comma,
        Period => Key::Period,
        Slash => Key::Slash,
        Backquote => Key::Grave,

        _ => Key::Unknown,
    }
}
