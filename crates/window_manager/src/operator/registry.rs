//! Operator type registry.
//!
//! Populated once at startup, then sealed when the session is built. After
//! sealing the registry is read-only and can be shared freely.

use std::collections::HashMap;

use crate::error::OperatorError;
use crate::operator::OperatorType;

#[derive(Debug, Default)]
pub struct OperatorRegistry {
    types: HashMap<String, OperatorType>,
    /// Idnames in registration order.
    order: Vec<String>,
    sealed: bool,
}

impl OperatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `ot` under its idname.
    ///
    /// Fails without touching the registry when the idname is taken or the
    /// registry is sealed.
    pub fn register(&mut self, ot: OperatorType) -> Result<(), OperatorError> {
        if self.sealed {
            return Err(OperatorError::RegistrySealed(ot.idname));
        }
        if self.types.contains_key(&ot.idname) {
            return Err(OperatorError::AlreadyRegistered(ot.idname));
        }
        tracing::debug!("Registered operator {}", ot.idname);
        self.order.push(ot.idname.clone());
        self.types.insert(ot.idname.clone(), ot);
        Ok(())
    }

    pub fn find(&self, idname: &str) -> Option<&OperatorType> {
        self.types.get(idname)
    }

    /// Operator types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &OperatorType> {
        self.order.iter().filter_map(|id| self.types.get(id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;

    struct Noop;
    impl Operator for Noop {}

    #[test]
    fn test_find_missing_is_none() {
        let registry = OperatorRegistry::new();
        assert!(registry.find("nonexistent.op").is_none());
    }

    #[test]
    fn test_duplicate_is_rejected_and_first_kept() {
        let mut registry = OperatorRegistry::new();
        registry
            .register(OperatorType::new("test.noop", "First", Noop))
            .unwrap();
        let err = registry
            .register(OperatorType::new("test.noop", "Second", Noop))
            .unwrap_err();
        assert!(matches!(err, OperatorError::AlreadyRegistered(ref id) if id == "test.noop"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("test.noop").map(|ot| ot.name.as_str()), Some("First"));
    }

    #[test]
    fn test_sealed_registry_rejects() {
        let mut registry = OperatorRegistry::new();
        registry.seal();
        assert!(matches!(
            registry.register(OperatorType::new("test.late", "Late", Noop)),
            Err(OperatorError::RegistrySealed(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_iter_in_registration_order() {
        let mut registry = OperatorRegistry::new();
        for id in ["b.two", "a.one", "c.three"] {
            registry.register(OperatorType::new(id, id, Noop)).unwrap();
        }
        let ids: Vec<_> = registry.iter().map(|ot| ot.idname.as_str()).collect();
        assert_eq!(ids, ["b.two", "a.one", "c.three"]);
    }
}
