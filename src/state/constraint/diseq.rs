use crate::lterm::LTerm;
use crate::state::constraint::{Constraint, Outcome};
use crate::state::unification::unify_rec;
use crate::state::{SMap, SResult, State};
use std::rc::Rc;

/// Disequality constraint
///
/// Holds the minimal substitution that would make the two original terms
/// equal; the constraint is violated exactly when the current bindings
/// realize every pair in that substitution. Re-running narrows the
/// substitution as bindings arrive.
#[derive(Clone, Debug)]
pub struct DisequalityConstraint(SMap);

impl DisequalityConstraint {
    pub fn new(smap: SMap) -> Rc<DisequalityConstraint> {
        Rc::new(DisequalityConstraint(smap))
    }

    /// If the `self` subsumes the `other`.
    ///
    /// A constraint is subsumed by another constraint if unifying the constraint in the
    /// substitution of the another constraint does not extend the constraint.
    pub fn subsumes(&self, other: &DisequalityConstraint) -> bool {
        let mut extension = SMap::new();
        let mut state = State::new().with_smap(other.smap_ref().clone());
        for (u, v) in self.0.iter() {
            match unify_rec(state, &mut extension, u, v) {
                Err(()) => return false,
                Ok(s) => state = s,
            }
        }

        extension.is_empty()
    }

    pub fn smap_ref(&self) -> &SMap {
        &self.0
    }
}

impl Constraint for DisequalityConstraint {
    fn operands(&self) -> Vec<LTerm> {
        self.0.operands()
    }

    fn check(&self, smap: &SMap) -> Outcome {
        let mut extension = SMap::new();
        let mut state = State::new().with_smap(smap.clone());
        for (u, v) in self.0.iter() {
            match unify_rec(state, &mut extension, u, v) {
                // The pairs can no longer be made equal.
                Err(()) => return Outcome::Satisfied,
                Ok(s) => state = s,
            }
        }
        if extension.is_empty() {
            Outcome::Violated
        } else {
            Outcome::Pending
        }
    }

    fn run(self: Rc<Self>, state: State) -> SResult {
        let mut extension = SMap::new();
        let mut test_state = state.clone();
        for (u, v) in self.0.iter() {
            match unify_rec(test_state, &mut extension, u, v) {
                Err(_) => return Ok(state),
                Ok(new_state) => test_state = new_state,
            }
        }

        if extension.is_empty() {
            // Unification succeeded without extending the substitution: the
            // terms are already equal and the disequality is violated.
            Err(())
        } else {
            // Re-attach the narrowed remainder.
            let c = DisequalityConstraint::new(extension);
            Ok(state.with_constraint(c))
        }
    }
}

impl std::fmt::Display for DisequalityConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (u, v) in self.0.iter() {
            write!(f, "{} != {},", u, v)?;
        }
        write!(f, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsumes_1() {
        // ((x.5)) subsumes ((x.5)(y.6))
        let x = LTerm::any();
        let y = LTerm::any();
        let five = LTerm::from(5);
        let six = LTerm::from(6);
        let mut smap = SMap::new();
        smap.extend(x.clone(), five.clone());
        smap.extend(y.clone(), six.clone());
        let c0 = DisequalityConstraint(smap);
        let mut smap = SMap::new();
        smap.extend(x.clone(), five.clone());
        let c1 = DisequalityConstraint(smap);
        assert!(c1.subsumes(&c0));
        assert!(!c0.subsumes(&c1));
    }

    #[test]
    fn test_diseq_check() {
        let x = LTerm::any();
        let mut csmap = SMap::new();
        csmap.extend(x.clone(), LTerm::from(5));
        let c = DisequalityConstraint(csmap);

        // Unbound x: pending.
        let smap = SMap::new();
        assert_eq!(c.check(&smap), Outcome::Pending);

        // x bound to 5: violated.
        let mut smap = SMap::new();
        smap.extend(x.clone(), LTerm::from(5));
        assert_eq!(c.check(&smap), Outcome::Violated);

        // x bound to 6: satisfied.
        let mut smap = SMap::new();
        smap.extend(x.clone(), LTerm::from(6));
        assert_eq!(c.check(&smap), Outcome::Satisfied);
    }
}
