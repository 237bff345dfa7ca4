//! The finite-domain constraint solver.
//!
//! A `Model` collects named integer variables over 1-based bit-set domains
//! and posts propagators for the global constraints; a `Solver` runs the
//! fixed-point propagation engine, backtracking search (sequential or
//! work-stealing parallel), and branch-and-bound optimization over immutable
//! copy-on-write states.

pub mod domain;
pub mod model;
pub mod optimize;
pub(crate) mod parallel;
pub mod propagate;
pub mod propagator;
pub mod search;
pub mod solver;
pub mod state;

pub use domain::Domain;
pub use model::{Heuristic, IntVar, Model, SolverConfig, ValueOrder};
pub use optimize::Optimum;
pub use propagate::{Inconsistency, PResult, Propagate, StateView};
pub use propagator::{Dfa, IneqOp, IntervalOp, Reify};
pub use search::{SearchStatus, SolveResult};
pub use solver::Solver;
pub use state::{Solution, SolverState, VarId};
