use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::operator::conj::conj;
use crate::operator::disj::disj;
use crate::relation::eq::eq;
use crate::relation::rembero::rembero;
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// Permutation relation: `permuteo(l, p)` holds when `p` is a reordering
/// of `l`.
#[derive(Debug)]
pub struct Permuteo {
    l: LTerm,
    p: LTerm,
}

impl Permuteo {
    pub fn new(l: LTerm, p: LTerm) -> Goal {
        Goal::dynamic(Rc::new(Permuteo { l, p }))
    }
}

impl Solve for Permuteo {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let a = LTerm::any();
        let d = LTerm::any();
        let pd = LTerm::any();
        let goal = disj(vec![
            conj(vec![
                eq(self.l.clone(), LTerm::empty_list()),
                eq(self.p.clone(), LTerm::empty_list()),
            ]),
            conj(vec![
                eq(self.l.clone(), LTerm::cons(a.clone(), d.clone())),
                // Permute the tail first so that the insertion below works
                // against a list of known length.
                permuteo(d, pd.clone()),
                rembero(a, self.p.clone(), pd),
            ]),
        ]);
        goal.solve(solver, state)
    }
}

pub fn permuteo(l: LTerm, p: LTerm) -> Goal {
    Permuteo::new(l, p)
}
