use crate::lterm::{LTerm, LTermInner};
use crate::state::constraint::{run_by_check, Constraint, Outcome};
use crate::state::{SMap, SResult, State};
use std::fmt;
use std::rc::Rc;

/// Absence constraint: `value` must not occur anywhere inside the resolution
/// of `term`. Pending while unresolved variables could still introduce an
/// occurrence.
#[derive(Clone, Debug)]
pub struct AbsenceConstraint {
    value: LTerm,
    term: LTerm,
}

impl AbsenceConstraint {
    pub fn new(value: LTerm, term: LTerm) -> Rc<AbsenceConstraint> {
        Rc::new(AbsenceConstraint { value, term })
    }

    /// Returns (occurrence found, unresolved variables seen).
    fn scan(value: &LTerm, term: &LTerm, smap: &SMap) -> (bool, bool) {
        let term = smap.walk(term);
        if term == value {
            return (true, false);
        }
        match term.as_ref() {
            LTermInner::Var(_, _) => (false, true),
            LTermInner::Cons(head, tail) => {
                let (f1, u1) = Self::scan(value, head, smap);
                if f1 {
                    return (true, u1);
                }
                let (f2, u2) = Self::scan(value, tail, smap);
                (f2, u1 || u2)
            }
            LTermInner::Tie(name, body) => {
                let (f1, u1) = Self::scan(value, name, smap);
                if f1 {
                    return (true, u1);
                }
                let (f2, u2) = Self::scan(value, body, smap);
                (f2, u1 || u2)
            }
            _ => (false, false),
        }
    }
}

impl Constraint for AbsenceConstraint {
    fn operands(&self) -> Vec<LTerm> {
        vec![self.term.clone()]
    }

    fn check(&self, smap: &SMap) -> Outcome {
        let value = smap.walk(&self.value).clone();
        if value.is_var() {
            return Outcome::Pending;
        }
        let (found, unresolved) = Self::scan(&value, &self.term, smap);
        if found {
            Outcome::Violated
        } else if unresolved {
            Outcome::Pending
        } else {
            Outcome::Satisfied
        }
    }

    fn run(self: Rc<Self>, state: State) -> SResult {
        run_by_check(self, state)
    }
}

impl fmt::Display for AbsenceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "absento({}, {})", self.value, self.term)
    }
}
