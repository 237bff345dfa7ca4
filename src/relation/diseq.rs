use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// Disequality as a goal: the walked terms must never become structurally
/// equal. Posts a disequality constraint through disunification.
#[derive(Debug)]
pub struct Neq {
    u: LTerm,
    v: LTerm,
}

impl Neq {
    pub fn new(u: LTerm, v: LTerm) -> Goal {
        Goal::dynamic(Rc::new(Neq { u, v }))
    }
}

impl Solve for Neq {
    fn solve(&self, _solver: &Solver, state: State) -> Stream {
        Stream::from_result(state.disunify(&self.u, &self.v))
    }
}

pub fn neq(u: LTerm, v: LTerm) -> Goal {
    Neq::new(u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::conj::conj;
    use crate::query::run;
    use crate::relation::eq::eq;
    use crate::relation::membero::membero;
    use crate::lterm_list;

    #[test]
    fn test_neq_1() {
        let solutions = run(0, |q| {
            conj(vec![
                membero(q.clone(), lterm_list![1, 2, 3]),
                neq(q.clone(), LTerm::from(2)),
            ])
        });
        assert_eq!(solutions, vec![LTerm::from(1), LTerm::from(3)]);
    }

    #[test]
    fn test_neq_2() {
        // The constraint holds also when posted before the binding.
        let solutions = run(0, |q| {
            conj(vec![
                neq(q.clone(), LTerm::from(2)),
                membero(q.clone(), lterm_list![1, 2, 3]),
            ])
        });
        assert_eq!(solutions, vec![LTerm::from(1), LTerm::from(3)]);
    }

    #[test]
    fn test_neq_3() {
        // Tree disequality: one differing leaf is enough.
        let solutions = run(0, |q| {
            let x = LTerm::var("x");
            conj(vec![
                eq(q.clone(), LTerm::from_vec(vec![x.clone(), LTerm::from(2)])),
                neq(q.clone(), lterm_list![1, 2]),
                eq(x.clone(), LTerm::from(3)),
            ])
        });
        assert_eq!(solutions, vec![lterm_list![3, 2]]);

        let solutions = run(0, |q| {
            let x = LTerm::var("x");
            conj(vec![
                eq(q.clone(), LTerm::from_vec(vec![x.clone(), LTerm::from(2)])),
                neq(q.clone(), lterm_list![1, 2]),
                eq(x.clone(), LTerm::from(1)),
            ])
        });
        assert!(solutions.is_empty());
    }
}
