use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::solver::Solver;
use crate::state::constraint::types::{TypeConstraint, TypeKind};
use crate::state::constraint::Constraint;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// Type constraint goal: the resolved value of the term must satisfy the
/// kind predicate once bound.
#[derive(Debug)]
struct Typeo {
    u: LTerm,
    kind: TypeKind,
}

impl Solve for Typeo {
    fn solve(&self, _solver: &Solver, state: State) -> Stream {
        let c = TypeConstraint::new(self.u.clone(), self.kind);
        Stream::from_result(c.run(state))
    }
}

fn typeo(u: LTerm, kind: TypeKind) -> Goal {
    Goal::dynamic(Rc::new(Typeo { u, kind }))
}

pub fn numbero(u: LTerm) -> Goal {
    typeo(u, TypeKind::Number)
}

pub fn symbolo(u: LTerm) -> Goal {
    typeo(u, TypeKind::Symbol)
}

pub fn stringo(u: LTerm) -> Goal {
    typeo(u, TypeKind::String)
}

pub fn booleano(u: LTerm) -> Goal {
    typeo(u, TypeKind::Boolean)
}

/// The vector (proper or improper list) type predicate.
pub fn listo(u: LTerm) -> Goal {
    typeo(u, TypeKind::Vector)
}
