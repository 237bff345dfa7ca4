use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

/// `result = min(vars)`: bound propagation both ways. The structural lower
/// bound `min_i min(dom(xᵢ))` used by branch-and-bound is exactly this
/// propagator's pruning of `result`.
#[derive(Debug)]
pub struct MinOf {
    vars: Vec<VarId>,
    result: VarId,
}

impl MinOf {
    pub fn new(vars: Vec<VarId>, result: VarId) -> MinOf {
        MinOf { vars, result }
    }
}

impl Propagate for MinOf {
    fn name(&self) -> &'static str {
        "min"
    }

    fn variables(&self) -> Vec<VarId> {
        let mut vars = self.vars.clone();
        vars.push(self.result);
        vars
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let lo = self.vars.iter().map(|&x| view.min(x)).min().unwrap();
        let hi = self.vars.iter().map(|&x| view.max(x)).min().unwrap();
        view.remove_below(self.result, lo)?;
        view.remove_above(self.result, hi)?;

        // Every variable is at least the minimum.
        let result_lo = view.min(self.result);
        for &x in &self.vars {
            view.remove_below(x, result_lo)?;
        }

        // Some variable must realize the minimum: if only one can reach down
        // to the result's upper bound, clamp it.
        let result_hi = view.max(self.result);
        let candidates: Vec<VarId> = self
            .vars
            .iter()
            .copied()
            .filter(|&x| view.min(x) <= result_hi)
            .collect();
        match candidates.len() {
            0 => Err(view.inconsistency(self.result)),
            1 => view.remove_above(candidates[0], result_hi),
            _ => Ok(()),
        }
    }
}

/// `result = max(vars)`: the dual of `MinOf`.
#[derive(Debug)]
pub struct MaxOf {
    vars: Vec<VarId>,
    result: VarId,
}

impl MaxOf {
    pub fn new(vars: Vec<VarId>, result: VarId) -> MaxOf {
        MaxOf { vars, result }
    }
}

impl Propagate for MaxOf {
    fn name(&self) -> &'static str {
        "max"
    }

    fn variables(&self) -> Vec<VarId> {
        let mut vars = self.vars.clone();
        vars.push(self.result);
        vars
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let lo = self.vars.iter().map(|&x| view.min(x)).max().unwrap();
        let hi = self.vars.iter().map(|&x| view.max(x)).max().unwrap();
        view.remove_below(self.result, lo)?;
        view.remove_above(self.result, hi)?;

        let result_hi = view.max(self.result);
        for &x in &self.vars {
            view.remove_above(x, result_hi)?;
        }

        let result_lo = view.min(self.result);
        let candidates: Vec<VarId> = self
            .vars
            .iter()
            .copied()
            .filter(|&x| view.max(x) >= result_lo)
            .collect();
        match candidates.len() {
            0 => Err(view.inconsistency(self.result)),
            1 => view.remove_below(candidates[0], result_lo),
            _ => Ok(()),
        }
    }
}
