use crate::fd::domain::Domain;
use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntervalOp {
    /// `x ∈ [lo, hi]` and `result = x`.
    Containment,
    /// `dom(result) ⊆ dom(x) ∩ [lo, hi]`.
    Intersection,
    /// `dom(result) ⊆ dom(x) ∪ [lo, hi]`.
    Union,
    /// `result = x + v` for some `v ∈ [lo, hi]`.
    Sum,
    /// `result = x − v` for some `v ∈ [lo, hi]`.
    Difference,
}

/// Interval arithmetic against the constant interval `[lo, hi]`.
#[derive(Debug)]
pub struct IntervalArithmetic {
    x: VarId,
    lo: isize,
    hi: isize,
    op: IntervalOp,
    result: VarId,
}

impl IntervalArithmetic {
    pub fn new(x: VarId, lo: isize, hi: isize, op: IntervalOp, result: VarId) -> IntervalArithmetic {
        IntervalArithmetic {
            x,
            lo,
            hi,
            op,
            result,
        }
    }

    fn interval_domain(&self, capacity: usize) -> Domain {
        let lo = self.lo.max(1);
        let hi = self.hi.min(capacity as isize);
        if lo > hi {
            Domain::empty(capacity)
        } else {
            Domain::range(capacity, lo, hi).unwrap()
        }
    }

    fn shifted_union(&self, base: &Domain, negate: bool) -> Domain {
        let mut image = Domain::empty(base.capacity());
        for k in self.lo..=self.hi {
            let k = if negate { -k } else { k };
            image = image.union(&base.shifted(k));
        }
        image
    }
}

impl Propagate for IntervalArithmetic {
    fn name(&self) -> &'static str {
        "interval"
    }

    fn variables(&self) -> Vec<VarId> {
        vec![self.x, self.result]
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        match self.op {
            IntervalOp::Containment => {
                let interval = self.interval_domain(view.domain(self.x).capacity());
                view.tighten(self.x, &interval)?;
                let x = view.domain(self.x).clone();
                view.tighten(self.result, &x)?;
                let r = view.domain(self.result).clone();
                view.tighten(self.x, &r)
            }
            IntervalOp::Intersection => {
                let interval = self.interval_domain(view.domain(self.result).capacity());
                let narrowed = view.domain(self.x).intersect(&interval);
                view.tighten(self.result, &narrowed)
            }
            IntervalOp::Union => {
                let interval = self.interval_domain(view.domain(self.result).capacity());
                let widened = view.domain(self.x).union(&interval);
                view.tighten(self.result, &widened)
            }
            IntervalOp::Sum => {
                let image = self.shifted_union(view.domain(self.x), false);
                view.tighten(self.result, &image)?;
                let image = self.shifted_union(view.domain(self.result), true);
                view.tighten(self.x, &image)
            }
            IntervalOp::Difference => {
                let image = self.shifted_union(view.domain(self.x), true);
                view.tighten(self.result, &image)?;
                let image = self.shifted_union(view.domain(self.result), false);
                view.tighten(self.x, &image)
            }
        }
    }
}
