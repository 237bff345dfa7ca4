//! The global-constraint propagator catalogue.
//!
//! Every propagator enforces a domain-monotone consequence through the
//! `StateView`; composites (circuit, stretch, rational sums) are posted by
//! the model builder as combinations of these primitives plus auxiliary
//! variables.

pub mod all_different;
pub mod arith;
pub mod bin_packing;
pub mod count;
pub mod cumulative;
pub mod element;
pub mod inequality;
pub mod interval;
pub mod linear;
pub mod min_max;
pub mod regular;
pub mod reified;
pub mod table;

pub use all_different::AllDifferent;
pub use arith::{Absolute, Arithmetic, Scale, ScaledDivision};
pub use bin_packing::BinPacking;
pub use count::{Among, AtMostNValues, CountValue, NValues};
pub use cumulative::Cumulative;
pub use element::Element;
pub use inequality::{IneqOp, Inequality};
pub use interval::{IntervalArithmetic, IntervalOp};
pub use linear::LinearSum;
pub use min_max::{MaxOf, MinOf};
pub use regular::{Dfa, Regular};
pub use reified::{IfThen, Reified, Reify};
pub use table::Table;

#[cfg(test)]
pub(crate) mod harness {
    use crate::context::Context;
    use crate::error::Result;
    use crate::fd::domain::Domain;
    use crate::fd::propagate::{watchers, Engine, Propagate};
    use crate::fd::state::SolverState;
    use std::sync::Arc;

    /// Runs a propagator set to its fixed point over the given domains.
    pub fn fixpoint(
        propagators: Vec<Arc<dyn Propagate>>,
        domains: Vec<Domain>,
    ) -> Result<Vec<Domain>> {
        let state = SolverState::new(domains.into_iter().map(Arc::new).collect());
        let watchers = watchers(state.var_count(), &propagators);
        let engine = Engine::new(&propagators, &watchers);
        let out = engine.fixpoint(&state, &Context::new(), None)?;
        Ok((0..out.var_count())
            .map(|v| out.domain(v as u32).clone())
            .collect())
    }

    pub fn fixpoint1(p: impl Propagate + 'static, domains: Vec<Domain>) -> Result<Vec<Domain>> {
        fixpoint(vec![Arc::new(p)], domains)
    }
}
