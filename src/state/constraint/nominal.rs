use crate::lterm::LTerm;
use crate::nominal::{alpha_eq, freshness};
use crate::state::constraint::{run_by_check, Constraint, Outcome};
use crate::state::{SMap, SResult, State};
use std::fmt;
use std::rc::Rc;

/// Freshness constraint: the nominal name must not occur free in the term.
#[derive(Clone, Debug)]
pub struct FreshnessConstraint {
    nom: LTerm,
    term: LTerm,
}

impl FreshnessConstraint {
    pub fn new(nom: LTerm, term: LTerm) -> Rc<FreshnessConstraint> {
        Rc::new(FreshnessConstraint { nom, term })
    }
}

impl Constraint for FreshnessConstraint {
    fn operands(&self) -> Vec<LTerm> {
        vec![self.nom.clone(), self.term.clone()]
    }

    fn check(&self, smap: &SMap) -> Outcome {
        freshness(&self.nom, &self.term, smap)
    }

    fn run(self: Rc<Self>, state: State) -> SResult {
        run_by_check(self, state)
    }
}

impl fmt::Display for FreshnessConstraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} # {}", self.nom, self.term)
    }
}

/// α-equivalence constraint: the terms must be equal modulo consistent
/// renaming of tie-bound names.
#[derive(Clone, Debug)]
pub struct AlphaEqConstraint {
    left: LTerm,
    right: LTerm,
}

impl AlphaEqConstraint {
    pub fn new(left: LTerm, right: LTerm) -> Rc<AlphaEqConstraint> {
        Rc::new(AlphaEqConstraint { left, right })
    }
}

impl Constraint for AlphaEqConstraint {
    fn operands(&self) -> Vec<LTerm> {
        vec![self.left.clone(), self.right.clone()]
    }

    fn check(&self, smap: &SMap) -> Outcome {
        alpha_eq(&self.left, &self.right, smap)
    }

    fn run(self: Rc<Self>, state: State) -> SResult {
        run_by_check(self, state)
    }
}

impl fmt::Display for AlphaEqConstraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} =α= {}", self.left, self.right)
    }
}
