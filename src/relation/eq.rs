use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// Unification as a goal.
#[derive(Debug)]
pub struct Eq {
    u: LTerm,
    v: LTerm,
}

impl Eq {
    pub fn new(u: LTerm, v: LTerm) -> Goal {
        Goal::dynamic(Rc::new(Eq { u, v }))
    }
}

impl Solve for Eq {
    fn solve(&self, _solver: &Solver, state: State) -> Stream {
        Stream::from_result(state.unify(&self.u, &self.v))
    }
}

pub fn eq(u: LTerm, v: LTerm) -> Goal {
    Eq::new(u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run;

    #[test]
    fn test_eq_1() {
        let solutions = run(0, |q| eq(q.clone(), LTerm::from(1)));
        assert_eq!(solutions, vec![LTerm::from(1)]);
    }

    #[test]
    fn test_eq_2() {
        let solutions = run(0, |_q| eq(LTerm::from(1), LTerm::from(2)));
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_eq_3() {
        // Unification propagates through list structure.
        let solutions = run(0, |q| {
            let x = LTerm::var("x");
            eq(
                LTerm::from_vec(vec![LTerm::from(1), x.clone(), LTerm::from(3)]),
                LTerm::cons(
                    LTerm::from(1),
                    LTerm::cons(LTerm::from(2), LTerm::singleton(q.clone())),
                ),
            )
        });
        assert_eq!(solutions, vec![LTerm::from(3)]);
    }
}
