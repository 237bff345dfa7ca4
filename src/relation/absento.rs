use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::solver::Solver;
use crate::state::constraint::absent::AbsenceConstraint;
use crate::state::constraint::Constraint;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// Absence constraint goal: `value` must not occur anywhere in the
/// resolution of `term`.
#[derive(Debug)]
struct Absento {
    value: LTerm,
    term: LTerm,
}

impl Solve for Absento {
    fn solve(&self, _solver: &Solver, state: State) -> Stream {
        let c = AbsenceConstraint::new(self.value.clone(), self.term.clone());
        Stream::from_result(c.run(state))
    }
}

pub fn absento(value: LTerm, term: LTerm) -> Goal {
    Goal::dynamic(Rc::new(Absento { value, term }))
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
    fn test_absento_1() {
        let solutions = run(0, |q| {
            conj(vec![
                eq(q.clone(), lterm_list![1, 2, 3]),
                absento(LTerm::from(5), q.clone()),
            ])
        });
        assert_eq!(solutions, vec![lterm_list![1, 2, 3]]);

        let solutions = run(0, |q| {
            conj(vec![
                eq(q.clone(), lterm_list![1, 5, 3]),
                absento(LTerm::from(5), q.clone()),
            ])
        });
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_absento_2() {
        // Posted before the offending binding arrives.
        let solutions = run(0, |q| {
            let x = LTerm::var("x");
            conj(vec![
                eq(q.clone(), LTerm::from_vec(vec![LTerm::from(1), x.clone()])),
                absento(LTerm::from(5), q.clone()),
                membero(x.clone(), lterm_list![4, 5, 6]),
            ])
        });
        assert_eq!(solutions, vec![lterm_list![1, 4], lterm_list![1, 6]]);
    }
}
