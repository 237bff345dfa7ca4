use super::domain::Domain;
use super::state::{SolverState, VarId};
use crate::context::Context;
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::trace;

/// Failure cause raised by a propagator: which propagator emptied which
/// variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inconsistency {
    pub propagator: &'static str,
    pub variable: VarId,
}

impl From<Inconsistency> for Error {
    fn from(i: Inconsistency) -> Error {
        Error::Inconsistent {
            propagator: i.propagator,
            variable: i.variable,
        }
    }
}

pub type PResult = std::result::Result<(), Inconsistency>;

/// The propagator contract.
///
/// A propagator enforces a domain-monotone consequence: it may only remove
/// values, through the view, and must be idempotent on its input domains.
/// Those two properties make the fixed point confluent regardless of queue
/// order.
pub trait Propagate: Debug + Send + Sync {
    /// Diagnostic name carried into `Inconsistent` causes.
    fn name(&self) -> &'static str;

    /// The variables this propagator watches; it re-enters the queue when any
    /// of them changes.
    fn variables(&self) -> Vec<VarId>;

    fn propagate(&self, view: &mut StateView<'_>) -> PResult;
}

/// Mediated access to the domains during one propagator run.
///
/// All mutation goes through `tighten`, which intersects with the current
/// domain (so propagation is monotone by construction), records the changed
/// variable, and converts an emptied domain into an `Inconsistency` carrying
/// the active propagator's name.
pub struct StateView<'a> {
    domains: &'a mut Vec<Arc<Domain>>,
    changed: &'a mut Vec<VarId>,
    active: &'static str,
}

impl<'a> StateView<'a> {
    pub fn domain(&self, v: VarId) -> &Domain {
        &self.domains[v as usize]
    }

    pub fn var_count(&self) -> usize {
        self.domains.len()
    }

    pub fn min(&self, v: VarId) -> isize {
        // Reachable states never hold empty domains.
        self.domain(v).min().unwrap()
    }

    pub fn max(&self, v: VarId) -> isize {
        self.domain(v).max().unwrap()
    }

    /// Intersect the variable's domain with `domain`.
    pub fn tighten(&mut self, v: VarId, domain: &Domain) -> PResult {
        let current = &self.domains[v as usize];
        let next = current.intersect(domain);
        if next.is_empty() {
            return Err(self.inconsistency(v));
        }
        if next != **current {
            self.domains[v as usize] = Arc::new(next);
            self.changed.push(v);
        }
        Ok(())
    }

    pub fn assign(&mut self, v: VarId, value: isize) -> PResult {
        let cap = self.domain(v).capacity();
        if value < 1 || value as usize > cap {
            return Err(self.inconsistency(v));
        }
        let singleton = Domain::empty(cap).with(value);
        self.tighten(v, &singleton)
    }

    pub fn remove(&mut self, v: VarId, value: isize) -> PResult {
        let next = self.domain(v).remove(value);
        if next.is_empty() {
            return Err(self.inconsistency(v));
        }
        if next != *self.domain(v) {
            self.domains[v as usize] = Arc::new(next);
            self.changed.push(v);
        }
        Ok(())
    }

    pub fn remove_below(&mut self, v: VarId, bound: isize) -> PResult {
        let next = self.domain(v).remove_below(bound);
        self.replace(v, next)
    }

    pub fn remove_above(&mut self, v: VarId, bound: isize) -> PResult {
        let next = self.domain(v).remove_above(bound);
        self.replace(v, next)
    }

    fn replace(&mut self, v: VarId, next: Domain) -> PResult {
        if next.is_empty() {
            return Err(self.inconsistency(v));
        }
        if next != *self.domain(v) {
            self.domains[v as usize] = Arc::new(next);
            self.changed.push(v);
        }
        Ok(())
    }

    pub fn inconsistency(&self, v: VarId) -> Inconsistency {
        Inconsistency {
            propagator: self.active,
            variable: v,
        }
    }
}

/// The fixed-point propagation engine.
///
/// Keeps a FIFO queue of propagator indices with an in-queue bit per
/// propagator: a propagator re-enters the queue only on a domain change of a
/// watched variable, never twice concurrently. The queue drains to a
/// consistent fixed point or stops at the first `Inconsistency`.
pub struct Engine<'a> {
    propagators: &'a [Arc<dyn Propagate>],
    watchers: &'a [Vec<usize>],
}

impl<'a> Engine<'a> {
    pub fn new(propagators: &'a [Arc<dyn Propagate>], watchers: &'a [Vec<usize>]) -> Engine<'a> {
        Engine {
            propagators,
            watchers,
        }
    }

    /// Runs propagation to a fixed point from `state`.
    ///
    /// With `seed = None` every propagator is queued once; with
    /// `seed = Some(vars)` only the watchers of those variables are. The
    /// result state's changed-set is the union of all domain changes.
    pub fn fixpoint(
        &self,
        state: &SolverState,
        ctx: &Context,
        seed: Option<&[VarId]>,
    ) -> Result<SolverState> {
        let mut domains = state.domains.clone();
        let mut queue: VecDeque<usize> = VecDeque::new();
        let mut in_queue = vec![false; self.propagators.len()];

        match seed {
            None => {
                for i in 0..self.propagators.len() {
                    queue.push_back(i);
                    in_queue[i] = true;
                }
            }
            Some(vars) => {
                for &v in vars {
                    for &w in &self.watchers[v as usize] {
                        if !in_queue[w] {
                            in_queue[w] = true;
                            queue.push_back(w);
                        }
                    }
                }
            }
        }

        let mut all_changed: Vec<VarId> = vec![];
        let mut local_changed: Vec<VarId> = vec![];

        while let Some(i) = queue.pop_front() {
            ctx.checkpoint()?;
            in_queue[i] = false;

            let propagator = &self.propagators[i];
            {
                let mut view = StateView {
                    domains: &mut domains,
                    changed: &mut local_changed,
                    active: propagator.name(),
                };
                propagator.propagate(&mut view).map_err(Error::from)?;
            }

            for v in local_changed.drain(..) {
                trace!(propagator = propagator.name(), variable = v, "pruned");
                if !all_changed.contains(&v) {
                    all_changed.push(v);
                }
                for &w in &self.watchers[v as usize] {
                    if !in_queue[w] {
                        in_queue[w] = true;
                        queue.push_back(w);
                    }
                }
            }
        }

        Ok(SolverState {
            domains,
            changed: all_changed,
        })
    }
}

/// Computes the var → watching-propagators adjacency for a propagator list.
pub fn watchers(var_count: usize, propagators: &[Arc<dyn Propagate>]) -> Vec<Vec<usize>> {
    let mut watchers = vec![vec![]; var_count];
    for (i, p) in propagators.iter().enumerate() {
        for v in p.variables() {
            let bucket = &mut watchers[v as usize];
            if !bucket.contains(&i) {
                bucket.push(i);
            }
        }
    }
    watchers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fd::propagator::{Arithmetic, IneqOp, Inequality};

    fn state(caps: &[usize]) -> SolverState {
        SolverState::new(caps.iter().map(|&c| Arc::new(Domain::full(c))).collect())
    }

    fn fixpoint_of(props: Vec<Arc<dyn Propagate>>, state: &SolverState) -> Result<SolverState> {
        let watchers = watchers(state.var_count(), &props);
        Engine::new(&props, &watchers).fixpoint(state, &Context::new(), None)
    }

    #[test]
    fn test_fixpoint_confluence() {
        // The reached fixed point is identical for any initial queue
        // permutation: monotone, idempotent propagators are confluent.
        let a: Arc<dyn Propagate> = Arc::new(Arithmetic::new(0, 1, 2));
        let b: Arc<dyn Propagate> = Arc::new(Inequality::new(1, IneqOp::Lt, 2));
        let c: Arc<dyn Propagate> = Arc::new(Inequality::new(2, IneqOp::Le, 0));
        let root = state(&[9, 9, 9]);

        let forward = fixpoint_of(vec![a.clone(), b.clone(), c.clone()], &root).unwrap();
        let reversed = fixpoint_of(vec![c, b, a], &root).unwrap();
        for v in 0..3 {
            assert_eq!(forward.domain(v), reversed.domain(v));
        }
    }

    #[test]
    fn test_fixpoint_inconsistency_cause() {
        // y = x + 10 over 1..9 is empty; the error names the propagator.
        let p: Arc<dyn Propagate> = Arc::new(Arithmetic::new(0, 1, 10));
        match fixpoint_of(vec![p], &state(&[9, 9])) {
            Err(Error::Inconsistent { propagator, .. }) => {
                assert_eq!(propagator, "arithmetic")
            }
            other => panic!("expected inconsistency, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_fixpoint_cancellation() {
        let p: Arc<dyn Propagate> = Arc::new(Arithmetic::new(0, 1, 1));
        let props = vec![p];
        let root = state(&[9, 9]);
        let watchers = watchers(2, &props);
        let ctx = Context::new();
        ctx.cancel();
        let result = Engine::new(&props, &watchers).fixpoint(&root, &ctx, None);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_fixpoint_changed_set() {
        let p: Arc<dyn Propagate> = Arc::new(Inequality::new(0, IneqOp::Lt, 1));
        let root = state(&[5, 5]);
        let out = fixpoint_of(vec![p], &root).unwrap();
        // Both bounds moved; both variables are reported changed.
        let mut changed = out.changed_vars().to_vec();
        changed.sort_unstable();
        assert_eq!(changed, vec![0, 1]);
    }
}
