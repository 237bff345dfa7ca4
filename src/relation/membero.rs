use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::operator::conj::conj;
use crate::operator::disj::disj;
use crate::relation::eq::eq;
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// List membership relation.
///
/// The body is constructed lazily per expansion so that recursion over an
/// unbound tail produces one list cell per stream step.
#[derive(Debug)]
pub struct Membero {
    x: LTerm,
    l: LTerm,
}

impl Membero {
    pub fn new(x: LTerm, l: LTerm) -> Goal {
        Goal::dynamic(Rc::new(Membero { x, l }))
    }
}

impl Solve for Membero {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let head = LTerm::any();
        let tail = LTerm::any();
        let goal = disj(vec![
            eq(
                self.l.clone(),
                LTerm::cons(self.x.clone(), tail.clone()),
            ),
            conj(vec![
                eq(self.l.clone(), LTerm::cons(head, tail.clone())),
                membero(self.x.clone(), tail),
            ]),
        ]);
        goal.solve(solver, state)
    }
}

pub fn membero(x: LTerm, l: LTerm) -> Goal {
    Membero::new(x, l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run;
    use crate::lterm_list;

    #[test]
    fn test_membero_1() {
        let solutions = run(0, |q| membero(q.clone(), lterm_list![1, 2, 3]));
        assert_eq!(
            solutions,
            vec![LTerm::from(1), LTerm::from(2), LTerm::from(3)]
        );
    }

    #[test]
    fn test_membero_2() {
        // Checking membership of a constant.
        let solutions = run(0, |_q| membero(LTerm::from(2), lterm_list![1, 2, 3]));
        assert_eq!(solutions.len(), 1);

        let solutions = run(0, |_q| membero(LTerm::from(5), lterm_list![1, 2, 3]));
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_membero_3() {
        // Generating lists that contain the element: take a few.
        let solutions = run(3, |q| membero(LTerm::from(1), q.clone()));
        assert_eq!(solutions.len(), 3);
        for s in solutions {
            assert!(s.iter().any(|e| e == &1));
        }
    }
}
