//! # Projection
//!
//! `project` resolves the listed variables against the current substitution
//! and hands the resolved values to a closure that produces the continuation
//! goal. Projection is non-relational: if any projected variable is not yet
//! ground the goal fails, and the caller is expected to order goals so that
//! the bindings exist.
use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::fmt;
use std::rc::Rc;

pub struct Project {
    variables: Vec<LTerm>,
    f: Box<dyn Fn(&[LTerm]) -> Goal>,
}

impl Project {
    pub fn new(variables: Vec<LTerm>, f: Box<dyn Fn(&[LTerm]) -> Goal>) -> Goal {
        Goal::dynamic(Rc::new(Project { variables, f }))
    }
}

impl Solve for Project {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let resolved: Vec<LTerm> = self
            .variables
            .iter()
            .map(|v| state.smap_ref().walk_star(v))
            .collect();

        if resolved.iter().any(|t| !t.is_ground()) {
            return Stream::empty();
        }

        (self.f)(&resolved).solve(solver, state)
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Project({:?})", self.variables)
    }
}

pub fn project<F>(variables: Vec<LTerm>, f: F) -> Goal
where
    F: Fn(&[LTerm]) -> Goal + 'static,
{
    Project::new(variables, Box::new(f))
}
