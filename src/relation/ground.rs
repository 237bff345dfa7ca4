use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// Non-relational groundness test: succeeds once when the term resolves to a
/// term without variables, fails otherwise.
#[derive(Debug)]
pub struct Ground {
    u: LTerm,
}

impl Ground {
    pub fn new(u: LTerm) -> Goal {
        Goal::dynamic(Rc::new(Ground { u }))
    }
}

impl Solve for Ground {
    fn solve(&self, _solver: &Solver, state: State) -> Stream {
        if state.smap_ref().walk_star(&self.u).is_ground() {
            Stream::unit(Box::new(state))
        } else {
            Stream::empty()
        }
    }
}

pub fn ground(u: LTerm) -> Goal {
    Ground::new(u)
}
