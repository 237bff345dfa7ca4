use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::operator::conj::conj;
use crate::operator::disj::disj;
use crate::relation::eq::eq;
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// `rembero(x, l, out)` holds when `out` is `l` with one occurrence of `x`
/// removed.
#[derive(Debug)]
pub struct Rembero {
    x: LTerm,
    l: LTerm,
    out: LTerm,
}

impl Rembero {
    pub fn new(x: LTerm, l: LTerm, out: LTerm) -> Goal {
        Goal::dynamic(Rc::new(Rembero { x, l, out }))
    }
}

impl Solve for Rembero {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let a = LTerm::any();
        let d = LTerm::any();
        let res = LTerm::any();
        let goal = disj(vec![
            eq(self.l.clone(), LTerm::cons(self.x.clone(), self.out.clone())),
            conj(vec![
                eq(self.l.clone(), LTerm::cons(a.clone(), d.clone())),
                eq(self.out.clone(), LTerm::cons(a, res.clone())),
                rembero(self.x.clone(), d, res),
            ]),
        ]);
        goal.solve(solver, state)
    }
}

pub fn rembero(x: LTerm, l: LTerm, out: LTerm) -> Goal {
    Rembero::new(x, l, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run;
    use crate::lterm_list;

    #[test]
    fn test_rembero_1() {
        let solutions = run(0, |q| {
            rembero(LTerm::from(2), lterm_list![1, 2, 3], q.clone())
        });
        assert_eq!(solutions, vec![lterm_list![1, 3]]);
    }

    #[test]
    fn test_rembero_2() {
        // Each occurrence can be the removed one.
        let solutions = run(0, |q| {
            rembero(LTerm::from(1), lterm_list![1, 2, 1], q.clone())
        });
        assert_eq!(solutions, vec![lterm_list![2, 1], lterm_list![1, 2]]);
    }
}
