use super::{SResult, State};
use crate::lterm::LTerm;
use crate::state::SMap;
use std::any::{Any, TypeId};
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::ptr;
use std::rc::Rc;

pub mod store;

pub mod absent;
pub mod diseq;
pub mod nominal;
pub mod types;

/// The verdict of an attributed constraint against the current bindings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The constraint can never be violated anymore; it may be dropped.
    Satisfied,
    /// The constraint is broken; the state is rejected.
    Violated,
    /// Not decidable yet; the constraint stays attached and re-fires when
    /// bindings change.
    Pending,
}

/// An attributed constraint.
///
/// Constraints live in the store and guard every extension of the
/// substitution: after each unification all constraints are re-run. `check`
/// is the pure verdict against a substitution; `run` applies the verdict to a
/// state and may re-attach a (possibly narrowed) version of the constraint.
pub trait Constraint: Debug + Display + AnyConstraint {
    fn operands(&self) -> Vec<LTerm>;

    /// Local constraints guard only the store they live in; non-local ones
    /// are visible to cooperating solvers through the hybrid store.
    fn is_local(&self) -> bool {
        true
    }

    fn check(&self, smap: &SMap) -> Outcome;

    fn run(self: Rc<Self>, state: State) -> SResult;
}

/// The default `run` for constraints whose `check` needs no narrowing.
pub(crate) fn run_by_check<C>(c: Rc<C>, state: State) -> SResult
where
    C: Constraint + 'static,
{
    match c.check(state.smap_ref()) {
        Outcome::Satisfied => Ok(state),
        Outcome::Violated => Err(()),
        Outcome::Pending => Ok(state.with_constraint(c)),
    }
}

pub trait AnyConstraint: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Constraint> AnyConstraint for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn Constraint {
    #[inline]
    pub fn is<T: Constraint>(&self) -> bool {
        TypeId::of::<T>() == self.type_id()
    }

    #[inline]
    pub fn downcast_ref<T: Any + Constraint>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl Hash for dyn Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        ptr::hash(self as *const Self, state)
    }
}

impl PartialEq for dyn Constraint {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

impl Eq for dyn Constraint {}
