//! Built-in operators.

pub mod window_ops;

pub use window_ops::register_window_operators;
