use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

/// `y = x + k`: domain-image intersection in both directions.
#[derive(Debug)]
pub struct Arithmetic {
    x: VarId,
    y: VarId,
    k: isize,
}

impl Arithmetic {
    pub fn new(x: VarId, y: VarId, k: isize) -> Arithmetic {
        Arithmetic { x, y, k }
    }
}

impl Propagate for Arithmetic {
    fn name(&self) -> &'static str {
        "arithmetic"
    }

    fn variables(&self) -> Vec<VarId> {
        vec![self.x, self.y]
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let image = view.domain(self.x).shifted(self.k);
        view.tighten(self.y, &image)?;
        let image = view.domain(self.y).shifted(-self.k);
        view.tighten(self.x, &image)
    }
}

/// `result = k · x` for constant `k ≥ 1`; both directions prune to exact
/// multiples.
#[derive(Debug)]
pub struct Scale {
    x: VarId,
    k: isize,
    result: VarId,
}

impl Scale {
    pub fn new(x: VarId, k: isize, result: VarId) -> Scale {
        Scale { x, k, result }
    }
}

impl Propagate for Scale {
    fn name(&self) -> &'static str {
        "scale"
    }

    fn variables(&self) -> Vec<VarId> {
        vec![self.x, self.result]
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let k = self.k;
        let image = view.domain(self.x).mapped(|v| v.checked_mul(k));
        view.tighten(self.result, &image)?;
        let image = view
            .domain(self.result)
            .mapped(|v| if v % k == 0 { Some(v / k) } else { None });
        view.tighten(self.x, &image)
    }
}

/// `quotient = dividend div k` (integer truncation) for constant `k ≥ 1`.
/// Backward propagation keeps only dividends whose truncated quotient is
/// still possible, i.e. restricts them to `[k·q, k·q + k − 1]` windows.
#[derive(Debug)]
pub struct ScaledDivision {
    dividend: VarId,
    k: isize,
    quotient: VarId,
}

impl ScaledDivision {
    pub fn new(dividend: VarId, k: isize, quotient: VarId) -> ScaledDivision {
        ScaledDivision {
            dividend,
            k,
            quotient,
        }
    }
}

impl Propagate for ScaledDivision {
    fn name(&self) -> &'static str {
        "scaled_division"
    }

    fn variables(&self) -> Vec<VarId> {
        vec![self.dividend, self.quotient]
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let k = self.k;
        let image = view.domain(self.dividend).mapped(|v| Some(v / k));
        view.tighten(self.quotient, &image)?;
        let quotients = view.domain(self.quotient).clone();
        let image = view
            .domain(self.dividend)
            .mapped(|v| if quotients.has(v / k) { Some(v) } else { None });
        view.tighten(self.dividend, &image)
    }
}

/// `abs = |x − offset|` via value mapping. When `x` and `abs` alias the
/// relation collapses to `x ≥ offset`.
#[derive(Debug)]
pub struct Absolute {
    x: VarId,
    offset: isize,
    abs: VarId,
}

impl Absolute {
    pub fn new(x: VarId, offset: isize, abs: VarId) -> Absolute {
        Absolute { x, offset, abs }
    }
}

impl Propagate for Absolute {
    fn name(&self) -> &'static str {
        "absolute"
    }

    fn variables(&self) -> Vec<VarId> {
        vec![self.x, self.abs]
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        if self.x == self.abs {
            return view.remove_below(self.x, self.offset);
        }
        let offset = self.offset;
        let image = view.domain(self.x).mapped(|v| Some((v - offset).abs()));
        view.tighten(self.abs, &image)?;
        let abs_domain = view.domain(self.abs).clone();
        let image = view.domain(self.x).mapped(|v| {
            if abs_domain.has((v - offset).abs()) {
                Some(v)
            } else {
                None
            }
        });
        view.tighten(self.x, &image)
    }
}
