use crate::fd::domain::Domain;
use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

/// `Among(vars, value-set, count)`: the number of variables taking a value
/// from the set equals the count variable.
///
/// Bit-set domains are 1-based, so the count variable uses the count+1
/// encoding: a count of k is stored as domain value k + 1.
#[derive(Debug)]
pub struct Among {
    vars: Vec<VarId>,
    values: Vec<isize>,
    count: VarId,
}

impl Among {
    pub fn new(vars: Vec<VarId>, values: Vec<isize>, count: VarId) -> Among {
        Among {
            vars,
            values,
            count,
        }
    }

    fn in_set(&self, domain: &Domain) -> (bool, bool) {
        // (must take a set value, can take a set value)
        let can = domain.iter().any(|v| self.values.contains(&v));
        let must = can && domain.iter().all(|v| self.values.contains(&v));
        (must, can)
    }
}

impl Propagate for Among {
    fn name(&self) -> &'static str {
        "among"
    }

    fn variables(&self) -> Vec<VarId> {
        let mut vars = self.vars.clone();
        vars.push(self.count);
        vars
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let mut forced = 0isize;
        let mut possible = 0isize;
        for &x in &self.vars {
            let (must, can) = self.in_set(view.domain(x));
            if must {
                forced += 1;
            }
            if can {
                possible += 1;
            }
        }

        // count + 1 encoding.
        view.remove_below(self.count, forced + 1)?;
        view.remove_above(self.count, possible + 1)?;

        let count_lo = view.min(self.count) - 1;
        let count_hi = view.max(self.count) - 1;

        if count_hi == forced {
            // No further variable may take a set value.
            for &x in &self.vars {
                let (must, can) = self.in_set(view.domain(x));
                if can && !must {
                    let keep = view
                        .domain(x)
                        .mapped(|v| if self.values.contains(&v) { None } else { Some(v) });
                    view.tighten(x, &keep)?;
                }
            }
        } else if count_lo == possible {
            // Every variable that can take a set value must.
            for &x in &self.vars {
                let (must, can) = self.in_set(view.domain(x));
                if can && !must {
                    let keep = view
                        .domain(x)
                        .mapped(|v| if self.values.contains(&v) { Some(v) } else { None });
                    view.tighten(x, &keep)?;
                }
            }
        }

        Ok(())
    }
}

/// `Count(vars, value, count)`: occurrences of a single value; the count
/// variable uses the count+1 encoding.
pub struct CountValue;

impl CountValue {
    pub fn new(vars: Vec<VarId>, value: isize, count: VarId) -> Among {
        Among::new(vars, vec![value], count)
    }
}

/// `NValues(vars, n)`: the number of distinct values taken. The count is at
/// least 1 for a non-empty sequence, so it is stored directly (no offset).
#[derive(Debug)]
pub struct NValues {
    vars: Vec<VarId>,
    n: VarId,
}

impl NValues {
    pub fn new(vars: Vec<VarId>, n: VarId) -> NValues {
        NValues { vars, n }
    }
}

impl Propagate for NValues {
    fn name(&self) -> &'static str {
        "nvalues"
    }

    fn variables(&self) -> Vec<VarId> {
        let mut vars = self.vars.clone();
        vars.push(self.n);
        vars
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let mut singles: Vec<isize> = vec![];
        let mut union: Vec<isize> = vec![];
        for &x in &self.vars {
            for v in view.domain(x).iter() {
                if !union.contains(&v) {
                    union.push(v);
                }
            }
            if let Some(v) = view.domain(x).singleton_value() {
                if !singles.contains(&v) {
                    singles.push(v);
                }
            }
        }

        let lb = singles.len().max(1) as isize;
        let ub = union.len().min(self.vars.len()) as isize;
        view.remove_below(self.n, lb)?;
        view.remove_above(self.n, ub)?;

        // At the cap, the undecided variables must reuse already-used values.
        if view.max(self.n) as usize == singles.len() && !singles.is_empty() {
            for &x in &self.vars {
                if !view.domain(x).is_singleton() {
                    let keep = view
                        .domain(x)
                        .mapped(|v| if singles.contains(&v) { Some(v) } else { None });
                    view.tighten(x, &keep)?;
                }
            }
        }

        Ok(())
    }
}

/// `AtMostNValues(vars, k)` for a constant bound `k`.
#[derive(Debug)]
pub struct AtMostNValues {
    vars: Vec<VarId>,
    k: isize,
}

impl AtMostNValues {
    pub fn new(vars: Vec<VarId>, k: isize) -> AtMostNValues {
        AtMostNValues { vars, k }
    }
}

impl Propagate for AtMostNValues {
    fn name(&self) -> &'static str {
        "at_most_nvalues"
    }

    fn variables(&self) -> Vec<VarId> {
        self.vars.clone()
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let mut singles: Vec<isize> = vec![];
        for &x in &self.vars {
            if let Some(v) = view.domain(x).singleton_value() {
                if !singles.contains(&v) {
                    singles.push(v);
                }
            }
        }
        if singles.len() as isize > self.k {
            return Err(view.inconsistency(self.vars[0]));
        }
        if singles.len() as isize == self.k {
            for &x in &self.vars {
                if !view.domain(x).is_singleton() {
                    let keep = view
                        .domain(x)
                        .mapped(|v| if singles.contains(&v) { Some(v) } else { None });
                    view.tighten(x, &keep)?;
                }
            }
        }
        Ok(())
    }
}
