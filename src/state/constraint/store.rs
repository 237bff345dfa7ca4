use super::diseq::DisequalityConstraint;
use crate::state::constraint::Constraint;
use std::collections::HashSet;
use std::rc::Rc;

/// The attributed-constraint container of a state.
///
/// Constraints are keyed by identity (pointer), so the same constraint object
/// can be taken out, run, and re-inserted without disturbing the rest.
#[derive(Debug, Clone, Default)]
pub struct ConstraintStore(HashSet<Rc<dyn Constraint>>);

impl ConstraintStore {
    pub fn new() -> ConstraintStore {
        ConstraintStore(HashSet::new())
    }

    /// Add new constraint `c` while keeping the store normalized
    ///
    /// A disequality that subsumes or is subsumed by an existing disequality
    /// replaces the redundant one, so the store never accumulates weaker
    /// copies of the same constraint.
    pub fn push_and_normalize(&mut self, newc: Rc<dyn Constraint>) {
        if let Some(tree_newc) = newc.downcast_ref::<DisequalityConstraint>() {
            let mut normalized = HashSet::new();
            for storec in self.0.drain() {
                // All non-subsumable constraints are always carried along
                if let Some(tree_storec) = storec.downcast_ref::<DisequalityConstraint>() {
                    if !tree_storec.subsumes(tree_newc) && !tree_newc.subsumes(tree_storec) {
                        normalized.insert(storec);
                    }
                } else {
                    normalized.insert(storec);
                }
            }
            self.0 = normalized;
        }
        self.insert(newc);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<dyn Constraint>> + '_ {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn take(&mut self, u: &Rc<dyn Constraint>) -> Option<Rc<dyn Constraint>> {
        self.0.take(u)
    }

    pub fn insert(&mut self, key: Rc<dyn Constraint>) -> bool {
        self.0.insert(key)
    }
}

impl IntoIterator for ConstraintStore {
    type Item = Rc<dyn Constraint>;
    type IntoIter = std::collections::hash_set::IntoIter<Rc<dyn Constraint>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
