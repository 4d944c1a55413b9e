//! Operators: discrete user commands with a poll/invoke/exec/modal lifecycle.
//!
//! ```text
//!            poll() == false ──► not runnable, nothing else is called
//!                 │
//!          invoke(event) / exec()
//!                 │
//!     ┌───────────┼──────────────────────┐
//!     ▼           ▼                      ▼
//!  FINISHED   CANCELLED            RUNNING_MODAL
//!     │           │                      │ retained on the window,
//!     └─► released ◄──── modal() ◄───────┘ fed every following event
//! ```
//!
//! Operator types live in an [`OperatorRegistry`] keyed by idname. Each call
//! creates a short-lived [`OperatorInstance`] carrying the call's properties.

pub mod call;
pub mod registry;

use std::collections::BTreeMap;
use std::fmt;

use engine_state::WindowId;
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::session::Session;

pub use call::{operator_exec, operator_invoke, repeat_last_operator};
pub use registry::OperatorRegistry;

bitflags::bitflags! {
    /// Outcome of an operator callback.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OperatorResult: u32 {
        const RUNNING_MODAL = 1 << 0;
        const CANCELLED = 1 << 1;
        const FINISHED = 1 << 2;
        /// Offer the event to the next handler too.
        const PASS_THROUGH = 1 << 3;
        /// Stop propagating the event this cycle.
        const HANDLED = 1 << 4;
        const INTERFACE = 1 << 5;
    }
}

impl OperatorResult {
    /// A result cannot be both still running and done.
    pub fn is_valid(self) -> bool {
        !(self.contains(Self::RUNNING_MODAL) && self.intersects(Self::FINISHED | Self::CANCELLED))
    }

    pub fn is_terminal(self) -> bool {
        self.intersects(Self::FINISHED | Self::CANCELLED)
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OperatorFlags: u32 {
        /// Remembered for repeat-last once finished.
        const REGISTER = 1 << 0;
        /// Pushes an undo step once finished.
        const UNDO = 1 << 1;
        /// Hidden from menus and search.
        const INTERNAL = 1 << 2;
    }
}

/// A typed operator property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

pub type Properties = BTreeMap<String, PropertyValue>;

/// Behaviour of an operator type.
///
/// `exec` runs without an event (scripts, repeat-last). `invoke` is the
/// interactive entry point and falls back to `exec`. Returning
/// `RUNNING_MODAL` from either keeps the instance alive and routes later
/// events of the same window to `modal`.
pub trait Operator: Send + Sync {
    fn poll(&self, _session: &Session) -> bool {
        true
    }

    fn invoke(&self, session: &mut Session, op: &mut OperatorInstance, _event: &Event) -> OperatorResult {
        self.exec(session, op)
    }

    fn exec(&self, _session: &mut Session, _op: &mut OperatorInstance) -> OperatorResult {
        OperatorResult::CANCELLED
    }

    fn modal(&self, _session: &mut Session, _op: &mut OperatorInstance, _event: &Event) -> OperatorResult {
        OperatorResult::CANCELLED
    }
}

/// Registered description of an operator.
pub struct OperatorType {
    /// Display name, also used for undo steps.
    pub name: String,
    /// Unique key, e.g. `wm.window_close`.
    pub idname: String,
    pub description: String,
    pub flag: OperatorFlags,
    pub ops: Box<dyn Operator>,
}

impl OperatorType {
    pub fn new(idname: &str, name: &str, ops: impl Operator + 'static) -> Self {
        Self {
            name: name.to_owned(),
            idname: idname.to_owned(),
            description: String::new(),
            flag: OperatorFlags::empty(),
            ops: Box::new(ops),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    pub fn with_flags(mut self, flag: OperatorFlags) -> Self {
        self.flag = flag;
        self
    }
}

impl fmt::Debug for OperatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorType")
            .field("idname", &self.idname)
            .field("name", &self.name)
            .field("flag", &self.flag)
            .finish_non_exhaustive()
    }
}

/// State of one operator call, alive for one invoke/modal/exec cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorInstance {
    pub idname: String,
    pub properties: Properties,
    /// Window that owns the triggering event, if any.
    pub window: Option<WindowId>,
}

impl OperatorInstance {
    pub fn new(idname: &str, properties: Properties) -> Self {
        Self {
            idname: idname.to_owned(),
            properties,
            window: None,
        }
    }

    pub fn bool_property(&self, name: &str) -> Option<bool> {
        match self.properties.get(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn int_property(&self, name: &str) -> Option<i64> {
        match self.properties.get(name)? {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_and_terminal_is_invalid() {
        assert!(OperatorResult::RUNNING_MODAL.is_valid());
        assert!((OperatorResult::FINISHED | OperatorResult::PASS_THROUGH).is_valid());
        assert!(!(OperatorResult::RUNNING_MODAL | OperatorResult::FINISHED).is_valid());
        assert!(!(OperatorResult::RUNNING_MODAL | OperatorResult::CANCELLED).is_valid());
    }

    #[test]
    fn test_result_bits_match_dispatch_layout() {
        assert_eq!(OperatorResult::RUNNING_MODAL.bits(), 1);
        assert_eq!(OperatorResult::CANCELLED.bits(), 2);
        assert_eq!(OperatorResult::FINISHED.bits(), 4);
        assert_eq!(OperatorResult::PASS_THROUGH.bits(), 8);
        assert_eq!(OperatorResult::HANDLED.bits(), 16);
        assert_eq!(OperatorResult::INTERFACE.bits(), 32);
    }

    #[test]
    fn test_property_accessors() {
        let mut props = Properties::new();
        props.insert("child".into(), PropertyValue::Bool(true));
        props.insert("count".into(), PropertyValue::Int(3));
        let op = OperatorInstance::new("wm.window_new_main", props);
        assert_eq!(op.bool_property("child"), Some(true));
        assert_eq!(op.int_property("count"), Some(3));
        assert_eq!(op.bool_property("count"), None);
        assert_eq!(op.int_property("missing"), None);
    }
}
