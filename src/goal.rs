use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::fmt;
use std::rc::Rc;

/// A solvable goal: a function from a state to a stream of states.
///
/// `Succeed` and `Fail` are recognized structurally so that stream `bind`
/// can short-circuit them without allocating.
#[derive(Clone, Debug)]
pub enum Goal {
    Succeed,
    Fail,
    Dynamic(Rc<dyn Solve>),
}

impl Goal {
    pub fn succeed() -> Goal {
        Goal::Succeed
    }

    pub fn fail() -> Goal {
        Goal::Fail
    }

    pub fn dynamic(u: Rc<dyn Solve>) -> Goal {
        Goal::Dynamic(u)
    }

    pub fn is_succeed(&self) -> bool {
        matches!(self, Goal::Succeed)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Goal::Fail)
    }

    pub fn solve(&self, solver: &Solver, state: State) -> Stream {
        match self {
            Goal::Succeed => Stream::unit(Box::new(state)),
            Goal::Fail => Stream::empty(),
            Goal::Dynamic(dynamic) => dynamic.solve(solver, state),
        }
    }
}

pub trait Solve: fmt::Debug {
    /// Generate a stream of solutions to the goal by applying it to some initial state.
    fn solve(&self, solver: &Solver, state: State) -> Stream;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_succeed() {
        let g = Goal::succeed();
        assert!(g.is_succeed());
        assert!(!g.is_fail());
    }

    #[test]
    fn test_goal_fail() {
        let g = Goal::fail();
        assert!(g.is_fail());
        assert!(!g.is_succeed());
    }

    #[derive(Debug)]
    struct TestGoal {}

    impl Solve for TestGoal {
        fn solve(&self, _solver: &Solver, _state: State) -> Stream {
            Stream::empty()
        }
    }

    #[test]
    fn test_goal_dynamic() {
        let g = Goal::dynamic(Rc::new(TestGoal {}));
        assert!(!g.is_succeed());
        assert!(!g.is_fail());
    }
}
