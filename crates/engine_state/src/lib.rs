//! Engine State
//!
//! Session data shared by the window manager and everything built on it:
//! - the typed [`Context`] routing the current window/scene/screen
//! - the open document ([`Main`]) and the [`Stage`] object store behind it
//! - user [`Preferences`] and process [`Globals`]

pub mod context;
pub mod document;
pub mod globals;
pub mod path;
pub mod prefs;
pub mod stage;

pub use context::{Context, ContextWindow, WindowId};
pub use document::{DefaultLayout, Main, UndoStep};
pub use globals::Globals;
pub use path::PrimPath;
pub use prefs::{Preferences, PrefsError};
pub use stage::{AttrValue, MemoryStage, Stage, StageError};
