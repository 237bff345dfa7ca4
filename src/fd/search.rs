use super::model::{Heuristic, ValueOrder};
use super::solver::Solver;
use super::state::{Solution, SolverState, VarId};
use crate::context::Context;
use crate::error::Error;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// How a search run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// The tree was exhausted, or the requested solution count was reached.
    Complete,
    /// Node or time limit.
    LimitReached,
    Cancelled,
}

/// Solutions found plus the way the search ended. Unsatisfiable models
/// yield an empty, `Complete` result; limits and cancellation still carry
/// whatever was found before the cut.
#[derive(Clone, Debug)]
pub struct SolveResult {
    pub solutions: Vec<Solution>,
    pub status: SearchStatus,
}

/// Objective context shared between search, value ordering, and the
/// incumbent-bound propagator during branch-and-bound.
#[derive(Clone, Debug)]
pub(crate) struct Objective {
    pub var: VarId,
    pub minimize: bool,
    pub best: Arc<AtomicIsize>,
}

impl Objective {
    pub(crate) fn sentinel(minimize: bool) -> isize {
        if minimize {
            isize::MAX
        } else {
            isize::MIN
        }
    }

    /// Records a solution's objective value if it improves the incumbent.
    pub(crate) fn record(&self, value: isize) {
        let mut current = self.best.load(Ordering::SeqCst);
        loop {
            let improves = if self.minimize {
                value < current
            } else {
                value > current
            };
            if !improves {
                return;
            }
            match self.best.compare_exchange(
                current,
                value,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return,
                Err(seen) => current = seen,
            }
        }
    }
}

/// A search frame: a propagated state, the branching variable, and the
/// values left to try. Stacked frames share domains structurally, so
/// backtracking is dropping the child frame.
#[derive(Clone, Debug)]
pub(crate) struct Frame {
    pub state: SolverState,
    pub var: VarId,
    pub values: VecDeque<isize>,
}

pub(crate) struct Search<'a> {
    solver: &'a Solver,
    ctx: &'a Context,
    objective: Option<&'a Objective>,
    rng: Option<StdRng>,
    impact: HashMap<VarId, f64>,
    nodes: u64,
    started: Instant,
}

impl<'a> Search<'a> {
    pub(crate) fn new(
        solver: &'a Solver,
        ctx: &'a Context,
        objective: Option<&'a Objective>,
    ) -> Search<'a> {
        let rng = match solver.model().config().value_order {
            ValueOrder::Random(seed) => Some(StdRng::seed_from_u64(seed)),
            _ => None,
        };
        Search {
            solver,
            ctx,
            objective,
            rng,
            impact: HashMap::new(),
            nodes: 0,
            started: Instant::now(),
        }
    }

    /// Re-seed the random value order, used to keep parallel workers
    /// deterministic but distinct.
    pub(crate) fn reseed(&mut self, salt: u64) {
        if let ValueOrder::Random(seed) = self.solver.model().config().value_order {
            self.rng = Some(StdRng::seed_from_u64(seed ^ salt));
        }
    }

    /// Selects the branching variable, or None when all domains are
    /// singletons.
    pub(crate) fn select_var(&self, state: &SolverState) -> Option<VarId> {
        let degrees = self.solver.degrees();
        let mut best: Option<(f64, VarId)> = None;
        for v in 0..state.var_count() as VarId {
            let size = state.domain(v).count();
            if size <= 1 {
                continue;
            }
            let score = match self.solver.model().config().heuristic {
                Heuristic::Mrv => size as f64,
                Heuristic::DomDeg => size as f64 / (1.0 + degrees[v as usize] as f64),
                Heuristic::Impact => {
                    size as f64 / (1.0 + self.impact.get(&v).copied().unwrap_or(0.0))
                }
            };
            match best {
                Some((best_score, _)) if best_score <= score => {}
                _ => best = Some((score, v)),
            }
        }
        best.map(|(_, v)| v)
    }

    /// Orders the candidate values of a variable; deterministic for a fixed
    /// seed.
    pub(crate) fn order_values(&mut self, state: &SolverState, var: VarId) -> VecDeque<isize> {
        let mut values = state.domain(var).values();
        match self.solver.model().config().value_order {
            ValueOrder::Ascending => {}
            ValueOrder::ObjImproving => {
                // Small values improve a minimization, large a maximization.
                if let Some(obj) = self.objective {
                    if !obj.minimize {
                        values.reverse();
                    }
                }
            }
            ValueOrder::Random(_) => {
                if let Some(rng) = self.rng.as_mut() {
                    values.shuffle(rng);
                }
            }
        }
        values.into()
    }

    pub(crate) fn frame(&mut self, state: SolverState) -> Option<Frame> {
        let var = self.select_var(&state)?;
        let values = self.order_values(&state, var);
        Some(Frame { state, var, values })
    }

    fn out_of_budget(&self) -> bool {
        let config = self.solver.model().config();
        if config.node_limit > 0 && self.nodes > config.node_limit {
            return true;
        }
        match config.time_limit {
            Some(limit) => self.started.elapsed() >= limit,
            None => false,
        }
    }

    /// Expands one value of the top frame onto `frames`, reporting any
    /// solution through `on_solution` (return false to stop the search).
    /// Returns the search status when the run must end.
    pub(crate) fn expand(
        &mut self,
        frames: &mut Vec<Frame>,
        on_solution: &mut dyn FnMut(Solution) -> bool,
    ) -> Option<SearchStatus> {
        if self.ctx.is_cancelled() {
            return Some(SearchStatus::Cancelled);
        }
        let top = match frames.last_mut() {
            Some(top) => top,
            None => return Some(SearchStatus::Complete),
        };
        let value = match top.values.pop_front() {
            Some(value) => value,
            None => {
                frames.pop();
                return None;
            }
        };

        self.nodes += 1;
        if self.out_of_budget() {
            return Some(SearchStatus::LimitReached);
        }

        let var = top.var;
        let child = match top.state.assign(var, value) {
            Ok(child) => child,
            Err(_) => return None,
        };

        let before: usize = (0..child.var_count() as VarId)
            .map(|v| top.state.domain(v).count())
            .sum();

        // Seed propagation with the assigned variable; under optimization
        // the objective is seeded too so the incumbent bound re-fires at
        // every node.
        let mut seed = vec![var];
        if let Some(obj) = self.objective {
            seed.push(obj.var);
        }
        match self.solver.propagate_seeded(self.ctx, &child, &seed) {
            Ok(state) => {
                let after: usize = (0..state.var_count() as VarId)
                    .map(|v| state.domain(v).count())
                    .sum();
                let reduction = 1.0 - after as f64 / before.max(1) as f64;
                let entry = self.impact.entry(var).or_insert(0.0);
                *entry = 0.9 * *entry + 0.1 * reduction;

                if state.is_solved() {
                    let solution = state.solution().unwrap();
                    if let Some(obj) = self.objective {
                        obj.record(solution.value(obj.var));
                    }
                    debug!(nodes = self.nodes, "solution found");
                    if !on_solution(solution) {
                        return Some(SearchStatus::Complete);
                    }
                } else if let Some(frame) = self.frame(state) {
                    frames.push(frame);
                }
                None
            }
            Err(Error::Cancelled) => Some(SearchStatus::Cancelled),
            Err(_) => None,
        }
    }

    /// Depth-first search from a propagated root.
    pub(crate) fn run(
        &mut self,
        root: SolverState,
        on_solution: &mut dyn FnMut(Solution) -> bool,
    ) -> SearchStatus {
        if root.is_solved() {
            let solution = root.solution().unwrap();
            if let Some(obj) = self.objective {
                obj.record(solution.value(obj.var));
            }
            on_solution(solution);
            return SearchStatus::Complete;
        }
        let mut frames = vec![];
        match self.frame(root) {
            Some(frame) => frames.push(frame),
            None => return SearchStatus::Complete,
        }
        loop {
            if let Some(status) = self.expand(&mut frames, on_solution) {
                return status;
            }
        }
    }
}
