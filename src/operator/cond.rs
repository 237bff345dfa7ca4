//! Conditional operators.
//!
//! `ifa` commits to the condition branch as a whole: when the condition has
//! any answer, the consequent runs for every answer of the condition. `ifte`
//! additionally truncates the condition to its first answer before running
//! the consequent; `soft_cut` is its conventional Prolog name. `once` bounds
//! any goal to its first answer.
use crate::goal::{Goal, Solve};
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

#[derive(Debug)]
struct Ifa {
    cond: Goal,
    then: Goal,
    els: Goal,
}

impl Solve for Ifa {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let mut stream = self.cond.solve(solver, state.clone());

        match solver.peek(&mut stream) {
            Some(_) => Stream::bind(stream, self.then.clone()),
            None => self.els.solve(solver, state),
        }
    }
}

#[derive(Debug)]
struct Ifte {
    cond: Goal,
    then: Goal,
    els: Goal,
}

impl Solve for Ifte {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let mut stream = self.cond.solve(solver, state.clone());

        match solver.trunc(&mut stream) {
            Some(_) => Stream::bind(stream, self.then.clone()),
            None => self.els.solve(solver, state),
        }
    }
}

#[derive(Debug)]
struct Once {
    goal: Goal,
}

impl Solve for Once {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let mut stream = self.goal.solve(solver, state);
        let _ = solver.trunc(&mut stream);
        stream
    }
}

/// If `cond` succeeds, run `then` for every answer of `cond`; otherwise `els`.
pub fn ifa(cond: Goal, then: Goal, els: Goal) -> Goal {
    Goal::dynamic(Rc::new(Ifa { cond, then, els }))
}

/// If `cond` succeeds, commit to its first answer and run `then` in it;
/// otherwise `els`.
pub fn ifte(cond: Goal, then: Goal, els: Goal) -> Goal {
    Goal::dynamic(Rc::new(Ifte { cond, then, els }))
}

/// Soft-cut: an alias of `ifte`.
pub fn soft_cut(cond: Goal, then: Goal, els: Goal) -> Goal {
    ifte(cond, then, els)
}

/// At most one answer of the goal.
pub fn once(goal: Goal) -> Goal {
    Goal::dynamic(Rc::new(Once { goal }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run;
    use crate::relation::eq::eq;
    use crate::relation::membero::membero;
    use crate::lterm::LTerm;
    use crate::lterm_list;

    #[test]
    fn test_ifa_1() {
        // The then-branch runs for every answer of the condition.
        let solutions = run(0, |q| {
            let x = LTerm::var("x");
            ifa(
                membero(x.clone(), lterm_list![1, 2, 3]),
                eq(q.clone(), x.clone()),
                eq(q.clone(), LTerm::from(0)),
            )
        });
        assert_eq!(
            solutions,
            vec![LTerm::from(1), LTerm::from(2), LTerm::from(3)]
        );
    }

    #[test]
    fn test_ifa_2() {
        // A failing condition falls through to the else-branch.
        let solutions = run(0, |q| {
            ifa(
                Goal::fail(),
                eq(q.clone(), LTerm::from(1)),
                eq(q.clone(), LTerm::from(0)),
            )
        });
        assert_eq!(solutions, vec![LTerm::from(0)]);
    }

    #[test]
    fn test_ifte_1() {
        // Only the first answer of the condition is used.
        let solutions = run(0, |q| {
            let x = LTerm::var("x");
            ifte(
                membero(x.clone(), lterm_list![1, 2, 3]),
                eq(q.clone(), x.clone()),
                eq(q.clone(), LTerm::from(0)),
            )
        });
        assert_eq!(solutions, vec![LTerm::from(1)]);
    }

    #[test]
    fn test_ifte_2() {
        let solutions = run(0, |q| {
            ifte(
                Goal::fail(),
                eq(q.clone(), LTerm::from(1)),
                eq(q.clone(), LTerm::from(0)),
            )
        });
        assert_eq!(solutions, vec![LTerm::from(0)]);
    }

    #[test]
    fn test_once_1() {
        let solutions = run(0, |q| once(membero(q.clone(), lterm_list![1, 2, 3])));
        assert_eq!(solutions, vec![LTerm::from(1)]);
    }
}
