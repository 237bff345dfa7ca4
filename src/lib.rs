//! # Minerva
//!
//! A relational and constraint logic programming runtime that unifies three
//! paradigms over a single substitution-and-constraint model:
//!
//! * a miniKanren-style relational core: logic terms, unification with
//!   occurs check, interleaving search streams, and attributed constraints
//!   (disequality, types, absence, nominal freshness, α-equivalence);
//! * a finite-domain constraint solver: bit-set domains, a propagation
//!   graph of global constraints, immutable copy-on-write solver states,
//!   backtracking and parallel search, and branch-and-bound optimization;
//! * an SLG tabling engine with well-founded semantics: memoized subgoals,
//!   dependency-graph SCC fixed points, and stratified negation.
//!
//! The pieces are glued by a hybrid store that carries both logic bindings
//! and FD domains, with pluggable solvers cross-propagating between them.
//!
//! ```rust
//! use minerva::prelude::*;
//!
//! let solutions = run(0, |q| {
//!     membero(q.clone(), LTerm::from_vec(vec![LTerm::from(1), LTerm::from(2)]))
//! });
//! assert_eq!(solutions, vec![LTerm::from(1), LTerm::from(2)]);
//! ```
//!
//! The crate is a library: its surface is the API, there is no wire
//! protocol, persistence, or CLI.

pub mod context;
pub mod error;
pub mod fd;
pub mod goal;
pub mod hybrid;
pub mod lterm;
pub mod lvalue;
pub mod nominal;
pub mod operator;
pub mod query;
pub mod relation;
pub mod slg;
pub mod solver;
pub mod state;
pub mod stream;

pub mod prelude {
    pub use crate::context::Context;
    pub use crate::error::{Error, Result};
    pub use crate::goal::Goal;
    pub use crate::lterm::LTerm;
    pub use crate::lterm_list;
    pub use crate::lvalue::LValue;
    pub use crate::operator::{
        closure, conj, disj, ifa, ifte, matcha, matche, matchu, once, project, soft_cut, Clause,
    };
    pub use crate::query::{run, run_with_context, Query};
    pub use crate::relation::{
        absento, alphaeqo, appendo, booleano, conso, copyterm, eq, firsto, fresho, ground, listo,
        membero, neq, numbero, permuteo, rembero, resto, reverso, stringo, substo, symbolo,
    };
}
