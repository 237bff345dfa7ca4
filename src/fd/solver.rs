use super::model::Model;
use super::parallel;
use super::propagate::{watchers, Engine};
use super::search::{Search, SearchStatus, SolveResult};
use super::state::{SolverState, VarId};
use crate::context::Context;
use crate::error::Result;
use tracing::debug;

/// A solver instance over a finished model.
///
/// Holds the immutable model plus the derived propagation structures
/// (watcher adjacency, variable degrees); states flow through `propagate`
/// and the search entry points.
pub struct Solver {
    model: Model,
    watchers: Vec<Vec<usize>>,
    degrees: Vec<usize>,
}

impl Solver {
    pub fn new(model: Model) -> Solver {
        let watchers = watchers(model.var_count(), model.propagators());
        let degrees = model.degrees();
        Solver {
            model,
            watchers,
            degrees,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub(crate) fn degrees(&self) -> &[usize] {
        &self.degrees
    }

    /// Runs every propagator to the fixed point over `state`.
    pub fn propagate(&self, ctx: &Context, state: &SolverState) -> Result<SolverState> {
        let engine = Engine::new(self.model.propagators(), &self.watchers);
        engine.fixpoint(state, ctx, None)
    }

    /// Re-propagates after a domain change of `seed` variables only.
    pub(crate) fn propagate_seeded(
        &self,
        ctx: &Context,
        state: &SolverState,
        seed: &[VarId],
    ) -> Result<SolverState> {
        let engine = Engine::new(self.model.propagators(), &self.watchers);
        engine.fixpoint(state, ctx, Some(seed))
    }

    /// Enumerate up to `limit` solutions (`0` = all) with sequential
    /// backtracking search. An unsatisfiable model gives an empty,
    /// `Complete` result.
    pub fn solve(&self, ctx: &Context, limit: usize) -> SolveResult {
        let root = match self.propagate(ctx, &self.model.initial_state()) {
            Ok(root) => root,
            Err(crate::error::Error::Cancelled) => {
                return SolveResult {
                    solutions: vec![],
                    status: SearchStatus::Cancelled,
                }
            }
            Err(cause) => {
                debug!(?cause, "root propagation failed");
                return SolveResult {
                    solutions: vec![],
                    status: SearchStatus::Complete,
                };
            }
        };

        let mut solutions = vec![];
        let mut search = Search::new(self, ctx, None);
        let status = search.run(root, &mut |solution| {
            solutions.push(solution);
            limit == 0 || solutions.len() < limit
        });
        SolveResult { solutions, status }
    }

    /// As `solve`, over a work-stealing pool of `workers` threads. Solution
    /// order is not guaranteed; the solution set matches the sequential
    /// one.
    pub fn solve_parallel(&self, ctx: &Context, workers: usize, limit: usize) -> SolveResult {
        if workers <= 1 {
            return self.solve(ctx, limit);
        }
        parallel::solve(self, ctx, workers, limit, None)
    }
}
