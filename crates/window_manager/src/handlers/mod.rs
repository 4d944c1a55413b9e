//! Event and lifecycle handlers
//!
//! - `events`: platform callback, classifies each native event
//! - `lifecycle`: realize, open, copy, make drawable, pump
//! - `close`: the close algorithm and window teardown
//! - `dispatch`: per-window handler loop (modal handlers, keymap)
//! - `notifiers`: notifier processing and redraw
//! - `quit`: quit confirmation flow

pub mod close;
pub mod dispatch;
pub mod events;
pub mod lifecycle;
pub mod notifiers;
pub mod quit;

pub use close::window_close;
pub use dispatch::do_handlers;
pub use events::dispatch_native_event;
pub use lifecycle::{
    add_main_window, check_windows, find_window_under_cursor, make_drawable, process_events,
    set_dpi, window_copy, window_open, window_realize, OpenWindowParams,
};
pub use notifiers::{do_notifiers, draw_update};
pub use quit::{quit_with_optional_confirmation_prompt, respond_to_quit_prompt, QuitChoice, QuitFlow, QuitPrompt};
