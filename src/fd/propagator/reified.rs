use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

/// Boolean encoding on 2-value domains: 1 = false, 2 = true.
pub const FALSE: isize = 1;
pub const TRUE: isize = 2;

/// The reifiable sub-constraints.
#[derive(Clone, Debug)]
pub enum Reify {
    /// `x = c`
    EqConst(VarId, isize),
    /// `x = y`
    EqVar(VarId, VarId),
    /// `x ≤ c`
    LeConst(VarId, isize),
    /// `y = x + k`
    Offset(VarId, VarId, isize),
}

impl Reify {
    fn variables(&self) -> Vec<VarId> {
        match *self {
            Reify::EqConst(x, _) | Reify::LeConst(x, _) => vec![x],
            Reify::EqVar(x, y) | Reify::Offset(x, y, _) => vec![x, y],
        }
    }

    /// Entailment against the current domains: `Some(true)` when the
    /// sub-constraint must hold, `Some(false)` when it cannot, `None` while
    /// undecided.
    fn decide(&self, view: &StateView<'_>) -> Option<bool> {
        match *self {
            Reify::EqConst(x, c) => {
                if !view.domain(x).has(c) {
                    Some(false)
                } else if view.domain(x).is_singleton() {
                    Some(true)
                } else {
                    None
                }
            }
            Reify::LeConst(x, c) => {
                if view.max(x) <= c {
                    Some(true)
                } else if view.min(x) > c {
                    Some(false)
                } else {
                    None
                }
            }
            Reify::EqVar(x, y) => {
                if view.domain(x).is_disjoint(view.domain(y)) {
                    Some(false)
                } else {
                    match (
                        view.domain(x).singleton_value(),
                        view.domain(y).singleton_value(),
                    ) {
                        (Some(a), Some(b)) => Some(a == b),
                        _ => None,
                    }
                }
            }
            Reify::Offset(x, y, k) => {
                let image = view.domain(x).shifted(k);
                if image.is_disjoint(view.domain(y)) {
                    Some(false)
                } else {
                    match (
                        view.domain(x).singleton_value(),
                        view.domain(y).singleton_value(),
                    ) {
                        (Some(a), Some(b)) => Some(a + k == b),
                        _ => None,
                    }
                }
            }
        }
    }

    fn enforce(&self, view: &mut StateView<'_>) -> PResult {
        match *self {
            Reify::EqConst(x, c) => view.assign(x, c),
            Reify::LeConst(x, c) => view.remove_above(x, c),
            Reify::EqVar(x, y) => {
                let dx = view.domain(x).clone();
                view.tighten(y, &dx)?;
                let dy = view.domain(y).clone();
                view.tighten(x, &dy)
            }
            Reify::Offset(x, y, k) => {
                let image = view.domain(x).shifted(k);
                view.tighten(y, &image)?;
                let image = view.domain(y).shifted(-k);
                view.tighten(x, &image)
            }
        }
    }

    fn enforce_negation(&self, view: &mut StateView<'_>) -> PResult {
        match *self {
            Reify::EqConst(x, c) => view.remove(x, c),
            Reify::LeConst(x, c) => view.remove_below(x, c + 1),
            Reify::EqVar(x, y) => {
                if let Some(value) = view.domain(x).singleton_value() {
                    view.remove(y, value)?;
                }
                if let Some(value) = view.domain(y).singleton_value() {
                    view.remove(x, value)?;
                }
                Ok(())
            }
            Reify::Offset(x, y, k) => {
                if let Some(value) = view.domain(x).singleton_value() {
                    view.remove(y, value + k)?;
                }
                if let Some(value) = view.domain(y).singleton_value() {
                    view.remove(x, value - k)?;
                }
                Ok(())
            }
        }
    }
}

/// `b ↔ sub`: a forced boolean posts the sub-constraint or its negation; an
/// undecided boolean is set as soon as the sub-constraint becomes entailed
/// or dis-entailed.
#[derive(Debug)]
pub struct Reified {
    sub: Reify,
    b: VarId,
}

impl Reified {
    pub fn new(sub: Reify, b: VarId) -> Reified {
        Reified { sub, b }
    }
}

impl Propagate for Reified {
    fn name(&self) -> &'static str {
        "reified"
    }

    fn variables(&self) -> Vec<VarId> {
        let mut vars = self.sub.variables();
        vars.push(self.b);
        vars
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        match view.domain(self.b).singleton_value() {
            Some(TRUE) => self.sub.enforce(view),
            Some(FALSE) => self.sub.enforce_negation(view),
            _ => match self.sub.decide(view) {
                Some(true) => view.assign(self.b, TRUE),
                Some(false) => view.assign(self.b, FALSE),
                None => Ok(()),
            },
        }
    }
}

/// Half-reification `b → sub`: a forced-true boolean posts the
/// sub-constraint, and a dis-entailed sub-constraint forces the boolean
/// false. Nothing is concluded from `b = false`.
#[derive(Debug)]
pub struct IfThen {
    cond: VarId,
    sub: Reify,
}

impl IfThen {
    pub fn new(cond: VarId, sub: Reify) -> IfThen {
        IfThen { cond, sub }
    }
}

impl Propagate for IfThen {
    fn name(&self) -> &'static str {
        "if_then"
    }

    fn variables(&self) -> Vec<VarId> {
        let mut vars = self.sub.variables();
        vars.push(self.cond);
        vars
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        match view.domain(self.cond).singleton_value() {
            Some(TRUE) => self.sub.enforce(view),
            Some(FALSE) => Ok(()),
            _ => {
                if self.sub.decide(view) == Some(false) {
                    view.assign(self.cond, FALSE)
                } else {
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fd::domain::Domain;
    use crate::fd::propagator::harness::fixpoint1;

    fn bool_domain() -> Domain {
        Domain::range(9, 1, 2).unwrap()
    }

    #[test]
    fn test_reified_forced_true() {
        let domains = vec![Domain::full(9), Domain::singleton(9, TRUE).unwrap()];
        let p = Reified::new(Reify::EqConst(0, 4), 1);
        let out = fixpoint1(p, domains).unwrap();
        assert_eq!(out[0].singleton_value(), Some(4));
    }

    #[test]
    fn test_reified_forced_false() {
        let domains = vec![Domain::full(9), Domain::singleton(9, FALSE).unwrap()];
        let p = Reified::new(Reify::EqConst(0, 4), 1);
        let out = fixpoint1(p, domains).unwrap();
        assert!(!out[0].has(4));
    }

    #[test]
    fn test_reified_entailment_sets_bool() {
        let domains = vec![Domain::singleton(9, 4).unwrap(), bool_domain()];
        let p = Reified::new(Reify::EqConst(0, 4), 1);
        let out = fixpoint1(p, domains).unwrap();
        assert_eq!(out[1].singleton_value(), Some(TRUE));

        let domains = vec![Domain::singleton(9, 5).unwrap(), bool_domain()];
        let p = Reified::new(Reify::EqConst(0, 4), 1);
        let out = fixpoint1(p, domains).unwrap();
        assert_eq!(out[1].singleton_value(), Some(FALSE));
    }

    #[test]
    fn test_reified_offset() {
        // b ↔ (y = x + 1) with disjoint image: b = false.
        let domains = vec![
            Domain::range(9, 1, 2).unwrap(),
            Domain::range(9, 7, 9).unwrap(),
            bool_domain(),
        ];
        let p = Reified::new(Reify::Offset(0, 1, 1), 2);
        let out = fixpoint1(p, domains).unwrap();
        assert_eq!(out[2].singleton_value(), Some(FALSE));
    }

    #[test]
    fn test_reified_le() {
        let domains = vec![Domain::range(9, 1, 3).unwrap(), bool_domain()];
        let p = Reified::new(Reify::LeConst(0, 5), 1);
        let out = fixpoint1(p, domains).unwrap();
        assert_eq!(out[1].singleton_value(), Some(TRUE));
    }
}
