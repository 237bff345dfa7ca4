use super::model::ValueOrder;
use super::parallel;
use super::propagate::{PResult, Propagate, StateView};
use super::search::{Objective, Search, SearchStatus};
use super::solver::Solver;
use super::state::{Solution, VarId};
use crate::context::Context;
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// The transient bound of branch-and-bound, as an ordinary propagator.
///
/// Reads the shared incumbent and prunes the objective's domain to strictly
/// improving values, so bound tightening takes part in propagation and is
/// shared by parallel workers for free.
#[derive(Debug)]
pub(crate) struct IncumbentBound {
    objective: VarId,
    minimize: bool,
    best: Arc<AtomicIsize>,
}

impl Propagate for IncumbentBound {
    fn name(&self) -> &'static str {
        "incumbent_bound"
    }

    fn variables(&self) -> Vec<VarId> {
        vec![self.objective]
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let best = self.best.load(Ordering::SeqCst);
        if best == Objective::sentinel(self.minimize) {
            return Ok(());
        }
        if self.minimize {
            view.remove_above(self.objective, best - 1)
        } else {
            view.remove_below(self.objective, best + 1)
        }
    }
}

/// The outcome of an optimization run.
#[derive(Clone, Debug)]
pub struct Optimum {
    pub solution: Solution,
    pub objective: isize,
    /// True when the search ran to exhaustion, proving optimality; false
    /// for the anytime incumbent returned after a limit or cancellation.
    pub proven: bool,
}

impl Solver {
    /// Branch-and-bound optimization of `objective`.
    ///
    /// Returns the optimal solution when the search completes, the best
    /// incumbent (`proven = false`) after a limit or cancellation, and
    /// errors with `Inconsistent` / `SearchLimitReached` / `Cancelled` when
    /// no solution was found at all.
    pub fn solve_optimal(
        &self,
        ctx: &Context,
        objective: VarId,
        minimize: bool,
    ) -> Result<Optimum> {
        let workers = self.model().config().parallel_workers;
        self.solve_optimal_with_options(ctx, objective, minimize, workers)
    }

    pub fn solve_optimal_with_options(
        &self,
        ctx: &Context,
        objective_var: VarId,
        minimize: bool,
        workers: usize,
    ) -> Result<Optimum> {
        if objective_var as usize >= self.model().var_count() {
            return Err(Error::InvalidArgument(format!(
                "unknown objective variable {}",
                objective_var
            )));
        }

        let best = Arc::new(AtomicIsize::new(Objective::sentinel(minimize)));
        let objective = Objective {
            var: objective_var,
            minimize,
            best: best.clone(),
        };

        // A bounding copy of the model: the incumbent bound propagates like
        // any other constraint. The objective-improving value order is
        // meaningful here, so it is the default for optimization runs.
        let mut model = self.model().clone();
        if model.config().value_order == ValueOrder::Ascending {
            model.config_mut().value_order = ValueOrder::ObjImproving;
        }
        model.post(Arc::new(IncumbentBound {
            objective: objective_var,
            minimize,
            best,
        }));
        let bounded = Solver::new(model);

        let (solutions, status) = if workers > 1 {
            let result = parallel::solve(&bounded, ctx, workers, 0, Some(&objective));
            (result.solutions, result.status)
        } else {
            let root = match bounded.propagate(ctx, &bounded.model().initial_state()) {
                Ok(root) => root,
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(_) => return Err(Error::Inconsistent {
                    propagator: "optimize",
                    variable: objective_var,
                }),
            };
            let mut solutions = vec![];
            let mut search = Search::new(&bounded, ctx, Some(&objective));
            let status = search.run(root, &mut |solution| {
                solutions.push(solution);
                true
            });
            (solutions, status)
        };

        // Every emitted solution improved the bound at its time; the best
        // one is the incumbent.
        let incumbent = solutions.into_iter().min_by_key(|s| {
            let value = s.value(objective_var);
            if minimize {
                value
            } else {
                -value
            }
        });

        debug!(?status, found = incumbent.is_some(), "optimization finished");
        match (incumbent, status) {
            (Some(solution), SearchStatus::Complete) => Ok(Optimum {
                objective: solution.value(objective_var),
                solution,
                proven: true,
            }),
            (Some(solution), _) => Ok(Optimum {
                objective: solution.value(objective_var),
                solution,
                proven: false,
            }),
            (None, SearchStatus::Complete) => Err(Error::Inconsistent {
                propagator: "optimize",
                variable: objective_var,
            }),
            (None, SearchStatus::LimitReached) => Err(Error::SearchLimitReached),
            (None, SearchStatus::Cancelled) => Err(Error::Cancelled),
        }
    }
}
