use crate::goal::{Goal, Solve};
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::fmt;
use std::rc::Rc;

/// Delayed goal construction.
///
/// The closure is invoked when the goal is solved and the resulting goal is
/// paused into the stream, one expansion per stream step. This is what makes
/// directly recursive goal definitions terminate.
pub struct Closure {
    f: Box<dyn Fn() -> Goal>,
}

impl Closure {
    pub fn new(f: Box<dyn Fn() -> Goal>) -> Goal {
        Goal::dynamic(Rc::new(Closure { f }))
    }
}

impl Solve for Closure {
    fn solve(&self, _solver: &Solver, state: State) -> Stream {
        Stream::pause(Box::new(state), (self.f)())
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Closure(...)")
    }
}

pub fn closure<F>(f: F) -> Goal
where
    F: Fn() -> Goal + 'static,
{
    Closure::new(Box::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::disj::disj;
    use crate::query::run;
    use crate::relation::eq::eq;
    use crate::lterm::LTerm;

    // fives(x) ≡ x == 5 ∨ fives(x): an infinite stream of fives.
    fn fives(x: LTerm) -> Goal {
        let x2 = x.clone();
        disj(vec![
            eq(x.clone(), LTerm::from(5)),
            closure(move || fives(x2.clone())),
        ])
    }

    #[test]
    fn test_closure_infinite_stream() {
        let solutions = run(3, |q| fives(q.clone()));
        assert_eq!(solutions.len(), 3);
        assert!(solutions.iter().all(|s| s == &5));
    }
}
