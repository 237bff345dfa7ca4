use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::solver::Solver;
use crate::state::constraint::nominal::AlphaEqConstraint;
use crate::state::constraint::Constraint;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// α-equivalence goal: the two terms must be equal modulo consistent
/// renaming of tie-bound names.
#[derive(Debug)]
struct AlphaEqo {
    left: LTerm,
    right: LTerm,
}

impl Solve for AlphaEqo {
    fn solve(&self, _solver: &Solver, state: State) -> Stream {
        let c = AlphaEqConstraint::new(self.left.clone(), self.right.clone());
        Stream::from_result(c.run(state))
    }
}

pub fn alphaeqo(left: LTerm, right: LTerm) -> Goal {
    Goal::dynamic(Rc::new(AlphaEqo { left, right }))
}
