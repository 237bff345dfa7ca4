use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::operator::conj::conj;
use crate::operator::disj::disj;
use crate::relation::appendo::appendo;
use crate::relation::eq::eq;
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// List reversal relation.
#[derive(Debug)]
pub struct Reverso {
    l: LTerm,
    r: LTerm,
}

impl Reverso {
    pub fn new(l: LTerm, r: LTerm) -> Goal {
        Goal::dynamic(Rc::new(Reverso { l, r }))
    }
}

impl Solve for Reverso {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let a = LTerm::any();
        let d = LTerm::any();
        let rd = LTerm::any();
        let goal = disj(vec![
            conj(vec![
                eq(self.l.clone(), LTerm::empty_list()),
                eq(self.r.clone(), LTerm::empty_list()),
            ]),
            conj(vec![
                eq(self.l.clone(), LTerm::cons(a.clone(), d.clone())),
                reverso(d, rd.clone()),
                appendo(rd, LTerm::singleton(a), self.r.clone()),
            ]),
        ]);
        goal.solve(solver, state)
    }
}

pub fn reverso(l: LTerm, r: LTerm) -> Goal {
    Reverso::new(l, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run;
    use crate::lterm_list;

    #[test]
    fn test_reverso_1() {
        let solutions = run(1, |q| reverso(lterm_list![1, 2, 3], q.clone()));
        assert_eq!(solutions, vec![lterm_list![3, 2, 1]]);
    }

    #[test]
    fn test_reverso_2() {
        let solutions = run(1, |q| reverso(q.clone(), lterm_list![3, 2, 1]));
        assert_eq!(solutions, vec![lterm_list![1, 2, 3]]);
    }

    #[test]
    fn test_reverso_3() {
        let solutions = run(1, |q| reverso(LTerm::empty_list(), q.clone()));
        assert_eq!(solutions, vec![LTerm::empty_list()]);
    }
}
