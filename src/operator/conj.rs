use crate::goal::{Goal, Solve};
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// Conjunction of goals.
///
/// The stream of the first goal is piped through the remaining goals with
/// `bind`; binding is lazy, so a recursive goal placed after its generator
/// expands only as the stream is pulled.
#[derive(Debug)]
pub struct Conj {
    goals: Vec<Goal>,
}

impl Conj {
    pub fn from_vec(goals: Vec<Goal>) -> Goal {
        match goals.len() {
            0 => Goal::succeed(),
            1 => goals.into_iter().next().unwrap(),
            _ => Goal::dynamic(Rc::new(Conj { goals })),
        }
    }
}

impl Solve for Conj {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let mut iter = self.goals.iter();
        let mut stream = iter.next().unwrap().solve(solver, state);
        for goal in iter {
            stream = Stream::bind(stream, goal.clone());
        }
        stream
    }
}

/// Conjunction operator: all goals must succeed in the same state.
pub fn conj(goals: Vec<Goal>) -> Goal {
    Conj::from_vec(goals)
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
    fn test_conj_1() {
        let solutions = run(0, |q| {
            conj(vec![
                membero(q.clone(), lterm_list![1, 2, 3]),
                membero(q.clone(), lterm_list![2, 3, 4]),
            ])
        });
        assert_eq!(solutions, vec![LTerm::from(2), LTerm::from(3)]);
    }

    #[test]
    fn test_conj_2() {
        // An empty conjunction succeeds once.
        let solutions = run(0, |_q| conj(vec![]));
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn test_conj_3() {
        // A failing conjunct empties the stream.
        let solutions = run(0, |q| {
            conj(vec![eq(q.clone(), LTerm::from(1)), Goal::fail()])
        });
        assert!(solutions.is_empty());
    }
}
