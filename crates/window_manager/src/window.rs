//! Per-Window State
//!
//! One [`Window`] per OS-level window. The window manager owns every window;
//! everything else refers to a window by its [`WindowId`].
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │               Window                   │
//! ├────────────────────────────────────────┤
//! │ Identity:                              │
//! │  - id / path (/Windows/Window_N)       │
//! │  - native handle (None = unrealized)   │
//! │  - parent                              │
//! │                                        │
//! │ Display:                               │
//! │  - title, icon, pos, size, state       │
//! │  - cursor, alignment, dpi              │
//! │                                        │
//! │ Session data:                          │
//! │  - scene, workspace, screen            │
//! │                                        │
//! │ Event tracking:                        │
//! │  - eventstate (last known input)       │
//! │  - event_queue (FIFO)                  │
//! │  - modal_handlers (top = last)         │
//! └────────────────────────────────────────┘
//! ```

use anchor::{NativeWindowHandle, StandardCursor, WindowState};
use engine_state::{document::WINDOWS_ROOT, ContextWindow, PrimPath, WindowId};
use glam::IVec2;

use crate::event::{Event, EventQueue};
use crate::geometry::{self, Alignment, Rect, WindowDpi};
use crate::operator::OperatorInstance;

#[derive(Debug)]
pub struct Window {
    pub id: WindowId,
    /// Stage path this window is stored under.
    pub path: PrimPath,
    /// Dialogs and child windows point at their parent. `None` marks a main window.
    pub parent: Option<WindowId>,

    pub title: String,
    pub icon: String,
    /// Position in OS coordinates.
    pub pos: IVec2,
    /// Size in OS coordinates. Zero until authored or defaulted.
    pub size: IVec2,
    pub state: WindowState,
    pub cursor: StandardCursor,
    pub alignment: Alignment,
    pub is_dialog: bool,
    pub dpi: WindowDpi,
    pub native_pixel_size: f32,

    pub scene: Option<PrimPath>,
    pub workspace: Option<PrimPath>,
    pub screen: Option<PrimPath>,

    pub(crate) native: Option<NativeWindowHandle>,

    /// Has OS input focus.
    pub active: bool,
    /// Queue a synthetic mouse-move once the queue has been drained.
    pub addmousemove: bool,
    pub needs_redraw: bool,

    /// Last known input state, used to fill in new events.
    pub eventstate: Event,
    pub event_queue: EventQueue,
    pub(crate) modal_handlers: Vec<OperatorInstance>,
}

impl Window {
    /// Create an unrealized window with no geometry.
    ///
    /// # Arguments
    /// * `id` - Key in the window manager
    /// * `parent` - Parent window, already flattened by the caller
    pub fn new(id: WindowId, parent: Option<WindowId>) -> Self {
        Self {
            id,
            path: PrimPath::new(WINDOWS_ROOT).child(&format!("Window_{}", id.0)),
            parent,
            title: String::new(),
            icon: String::new(),
            pos: IVec2::ZERO,
            size: IVec2::ZERO,
            state: WindowState::Normal,
            cursor: StandardCursor::Default,
            alignment: Alignment::Absolute,
            is_dialog: false,
            dpi: WindowDpi::default(),
            native_pixel_size: 1.0,
            scene: None,
            workspace: None,
            screen: None,
            native: None,
            active: false,
            addmousemove: false,
            needs_redraw: true,
            eventstate: Event::default(),
            event_queue: EventQueue::new(),
            modal_handlers: Vec::new(),
        }
    }

    pub fn native_handle(&self) -> Option<NativeWindowHandle> {
        self.native
    }

    pub fn is_realized(&self) -> bool {
        self.native.is_some()
    }

    /// A main window has no parent; closing it quits the application.
    pub fn is_main(&self) -> bool {
        self.parent.is_none()
    }

    pub fn pixels_x(&self) -> i32 {
        (self.native_pixel_size * self.size.x as f32) as i32
    }

    pub fn pixels_y(&self) -> i32 {
        (self.native_pixel_size * self.size.y as f32) as i32
    }

    /// The window's drawable area in native pixels, origin at zero.
    pub fn screen_rect(&self) -> Rect {
        Rect::new(IVec2::ZERO, geometry::pixel_size(self.size, self.native_pixel_size))
    }

    pub fn local_to_desktop(&self, local: IVec2) -> IVec2 {
        geometry::local_to_desktop(self.pos, self.native_pixel_size, local)
    }

    pub fn desktop_to_local(&self, desktop: IVec2) -> IVec2 {
        geometry::desktop_to_local(self.pos, self.native_pixel_size, desktop)
    }

    pub fn modal_handler_count(&self) -> usize {
        self.modal_handlers.len()
    }

    /// Idnames of running modal operators, bottom first.
    pub fn modal_handler_names(&self) -> impl Iterator<Item = &str> {
        self.modal_handlers.iter().map(|op| op.idname.as_str())
    }
}

impl ContextWindow for Window {
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
