use crate::goal::{Goal, Solve};
use crate::solver::Solver;
use crate::state::State;
use crate::stream::{LazyStream, Stream};
use std::rc::Rc;

/// Fair disjunction of goals.
///
/// Sub-streams are merged with `mplus`, each wrapped in a delay so that the
/// interleave pulls answers from every branch in turn; an infinite branch
/// cannot starve the others.
#[derive(Debug)]
pub struct Disj {
    goals: Vec<Goal>,
}

impl Disj {
    pub fn from_vec(goals: Vec<Goal>) -> Goal {
        match goals.len() {
            0 => Goal::fail(),
            1 => goals.into_iter().next().unwrap(),
            _ => Goal::dynamic(Rc::new(Disj { goals })),
        }
    }
}

impl Solve for Disj {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let mut stream = Stream::empty();

        // Process first element separately to avoid one extra clone of `state`.
        for goal in self.goals.iter().rev().take(self.goals.len() - 1) {
            let new_stream = goal.solve(solver, state.clone());
            stream = Stream::mplus(new_stream, LazyStream::delay(stream));
        }

        let new_stream = self.goals[0].solve(solver, state);
        Stream::mplus(new_stream, LazyStream::delay(stream))
    }
}

/// Disjunction operator with the usual miniKanren interleaved search.
pub fn disj(goals: Vec<Goal>) -> Goal {
    Disj::from_vec(goals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run;
    use crate::relation::membero::membero;
    use crate::lterm_list;

    #[test]
    fn test_disj_1() {
        // The streams of the disjuncts are interleaved.
        let solutions = run(0, |q| {
            disj(vec![
                membero(q.clone(), lterm_list![1, 2, 3]),
                membero(q.clone(), lterm_list![4, 5, 6]),
                membero(q.clone(), lterm_list![7, 8, 9]),
            ])
        });
        let mut expected: Vec<isize> = (1..=9).collect();
        for x in solutions.iter() {
            let n = x.get_number().unwrap();
            assert!(expected.contains(&n));
            expected.retain(|y| n != *y);
        }
        assert_eq!(expected.len(), 0);
    }

    #[test]
    fn test_disj_2() {
        // An empty disjunction fails.
        let solutions = run(0, |_q| disj(vec![]));
        assert!(solutions.is_empty());
    }
}
