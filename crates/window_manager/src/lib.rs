//! Window Manager
//!
//! Owns every application window and routes native input through operators.
//!
//! ```text
//!  PlatformSystem ──NativeEvent──► handlers::events ──► Window.event_queue (FIFO)
//!                                        │                      │
//!                                lifecycle / close        handlers::dispatch
//!                                        │                      │
//!                                        ▼                      ▼
//!                                 WindowManager          modal handlers ─► keymap
//!                                   notifiers                   │
//!                                        │               operator registry
//!                                        ▼               poll ► invoke/exec/modal
//!                               handlers::notifiers             │
//!                                   (redraw)                 msgbus, undo
//! ```
//!
//! ## Modules
//!
//! - `session`: [`Session`], the owner of everything below plus the document and context
//! - `manager`: [`WindowManager`], the window table
//! - `window`: per-window state
//! - `event` / `input`: events and their translation from native input
//! - `operator` / `ops`: operator types, the call state machine, built-in operators
//! - `handlers`: platform callback, lifecycle, close, handler loop, quit flow
//! - `msgbus` / `notifier` / `keymap`: notices, notifiers and key bindings

pub mod error;
pub mod event;
pub mod geometry;
pub mod handlers;
pub mod input;
pub mod keymap;
pub mod manager;
pub mod msgbus;
pub mod notifier;
pub mod operator;
pub mod ops;
pub mod session;
pub mod window;
pub mod window_config;
pub mod window_id_map;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{OperatorError, WmError};
pub use event::{CustomData, Event, EventQueue, EventType, EventValue, ModifierKind};
pub use geometry::{Alignment, Rect, WindowDpi};
pub use handlers::{QuitChoice, QuitFlow, QuitPrompt};
pub use keymap::{KeyChord, Keymap, KeymapItem};
pub use manager::WindowManager;
pub use msgbus::{MsgBus, Notice, SubscriberId};
pub use notifier::{Notifier, NotifierAction, NotifierCategory};
pub use operator::{
    Operator, OperatorFlags, OperatorInstance, OperatorRegistry, OperatorResult, OperatorType,
    Properties, PropertyValue,
};
pub use session::Session;
pub use window::Window;
