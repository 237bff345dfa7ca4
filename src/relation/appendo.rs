use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::operator::conj::conj;
use crate::operator::disj::disj;
use crate::relation::eq::eq;
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// List concatenation relation: `appendo(l, s, out)` holds when `out` is
/// `l` followed by `s`.
#[derive(Debug)]
pub struct Appendo {
    l: LTerm,
    s: LTerm,
    out: LTerm,
}

impl Appendo {
    pub fn new(l: LTerm, s: LTerm, out: LTerm) -> Goal {
        Goal::dynamic(Rc::new(Appendo { l, s, out }))
    }
}

impl Solve for Appendo {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let a = LTerm::any();
        let d = LTerm::any();
        let res = LTerm::any();
        let goal = disj(vec![
            conj(vec![
                eq(self.l.clone(), LTerm::empty_list()),
                eq(self.s.clone(), self.out.clone()),
            ]),
            conj(vec![
                eq(self.l.clone(), LTerm::cons(a.clone(), d.clone())),
                eq(self.out.clone(), LTerm::cons(a, res.clone())),
                appendo(d, self.s.clone(), res),
            ]),
        ]);
        goal.solve(solver, state)
    }
}

pub fn appendo(l: LTerm, s: LTerm, out: LTerm) -> Goal {
    Appendo::new(l, s, out)
}
