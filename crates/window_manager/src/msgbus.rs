//! Message bus: synchronous "operator ran" notices.
//!
//! Each registered operator type gets one notice. Registering announces the
//! operator once; every later send bumps the notice's reference count and
//! fans out to its subscribers plus every bus-wide listener. Delivery is
//! synchronous, on the dispatch thread, with no queueing.
//!
//! A failing subscriber (an `Err` or a panic) is logged and skipped; the
//! remaining subscribers still run.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::OperatorError;
use crate::operator::OperatorType;

/// What subscribers receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub idname: String,
    pub name: String,
    /// Reference count of the notice at the time of sending; 1 for the announcement.
    pub count: u32,
}

pub type Subscriber = Box<dyn FnMut(&Notice) -> anyhow::Result<()>>;

/// Handle for removing a subscriber again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct OperatorNotice {
    name: String,
    ref_count: u32,
    subscribers: Vec<(SubscriberId, Subscriber)>,
}

#[derive(Default)]
pub struct MsgBus {
    notices: HashMap<String, OperatorNotice>,
    listeners: Vec<(SubscriberId, Subscriber)>,
    next_subscriber: u64,
}

impl MsgBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the notice for `ot` and announce it.
    pub fn register(&mut self, ot: &OperatorType) {
        if self.notices.contains_key(&ot.idname) {
            tracing::warn!("Message bus notice for {} already exists", ot.idname);
            return;
        }
        self.notices.insert(
            ot.idname.clone(),
            OperatorNotice {
                name: ot.name.clone(),
                ref_count: 1,
                subscribers: Vec::new(),
            },
        );
        self.deliver(&ot.idname);
    }

    /// Re-send the notice of `idname`.
    pub fn send(&mut self, idname: &str) -> Result<(), OperatorError> {
        let notice = self
            .notices
            .get_mut(idname)
            .ok_or_else(|| OperatorError::NotFound(idname.to_owned()))?;
        notice.ref_count += 1;
        self.deliver(idname);
        Ok(())
    }

    /// Subscribe to the notice of one operator.
    pub fn subscribe(
        &mut self,
        idname: &str,
        subscriber: impl FnMut(&Notice) -> anyhow::Result<()> + 'static,
    ) -> Result<SubscriberId, OperatorError> {
        let id = self.next_id();
        let notice = self
            .notices
            .get_mut(idname)
            .ok_or_else(|| OperatorError::NotFound(idname.to_owned()))?;
        notice.subscribers.push((id, Box::new(subscriber)));
        Ok(id)
    }

    /// Subscribe to every notice, including announcements of operators
    /// registered afterwards.
    pub fn subscribe_all(
        &mut self,
        subscriber: impl FnMut(&Notice) -> anyhow::Result<()> + 'static,
    ) -> SubscriberId {
        let id = self.next_id();
        self.listeners.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        let mut removed = before != self.listeners.len();
        for notice in self.notices.values_mut() {
            let before = notice.subscribers.len();
            notice.subscribers.retain(|(sid, _)| *sid != id);
            removed |= before != notice.subscribers.len();
        }
        removed
    }

    pub fn ref_count(&self, idname: &str) -> Option<u32> {
        self.notices.get(idname).map(|n| n.ref_count)
    }

    fn next_id(&mut self) -> SubscriberId {
        self.next_subscriber += 1;
        SubscriberId(self.next_subscriber)
    }

    fn deliver(&mut self, idname: &str) {
        let Some(entry) = self.notices.get_mut(idname) else {
            return;
        };
        let notice = Notice {
            idname: idname.to_owned(),
            name: entry.name.clone(),
            count: entry.ref_count,
        };

        let subscribers = entry
            .subscribers
            .iter_mut()
            .chain(self.listeners.iter_mut());
        for (id, subscriber) in subscribers {
            match catch_unwind(AssertUnwindSafe(|| subscriber(&notice))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!("Subscriber {:?} failed on {}: {e:#}", id, notice.idname);
                }
                Err(_) => {
                    tracing::error!("Subscriber {:?} panicked on {}", id, notice.idname);
                }
            }
        }
    }
}

impl std::fmt::Debug for MsgBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MsgBus")
            .field("notices", &self.notices.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Noop;
    impl Operator for Noop {}

    fn ot(idname: &str) -> OperatorType {
        OperatorType::new(idname, "Noop", Noop)
    }

    #[test]
    fn test_register_announces_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = MsgBus::new();
        let sink = Rc::clone(&seen);
        bus.subscribe_all(move |n| {
            sink.borrow_mut().push((n.idname.clone(), n.count));
            Ok(())
        });
        bus.register(&ot("test.a"));
        assert_eq!(*seen.borrow(), vec![("test.a".to_owned(), 1)]);
        assert_eq!(bus.ref_count("test.a"), Some(1));
    }

    #[test]
    fn test_send_increments_ref_count() {
        let mut bus = MsgBus::new();
        bus.register(&ot("test.a"));
        bus.send("test.a").unwrap();
        bus.send("test.a").unwrap();
        assert_eq!(bus.ref_count("test.a"), Some(3));
        assert!(matches!(bus.send("test.missing"), Err(OperatorError::NotFound(_))));
    }

    #[test]
    fn test_failing_subscribers_do_not_block_others() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = MsgBus::new();
        bus.register(&ot("test.a"));
        bus.subscribe("test.a", |_| anyhow::bail!("broken")).unwrap();
        bus.subscribe("test.a", |_| panic!("worse")).unwrap();
        let counter = Rc::clone(&hits);
        bus.subscribe("test.a", move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        })
        .unwrap();

        bus.send("test.a").unwrap();
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let hits = Rc::new(RefCell::new(0));
        let mut bus = MsgBus::new();
        bus.register(&ot("test.a"));
        let counter = Rc::clone(&hits);
        let id = bus
            .subscribe("test.a", move |_| {
                *counter.borrow_mut() += 1;
                Ok(())
            })
            .unwrap();
        assert!(bus.unsubscribe(id));
        bus.send("test.a").unwrap();
        assert_eq!(*hits.borrow(), 0);
        assert!(!bus.unsubscribe(id));
    }
}
