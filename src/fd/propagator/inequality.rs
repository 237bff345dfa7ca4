use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IneqOp {
    Lt,
    Le,
    Gt,
    Ge,
    Ne,
}

/// Pairwise inequality `x op y` with bound pruning; `Ne` prunes only on
/// singletons.
#[derive(Debug)]
pub struct Inequality {
    x: VarId,
    op: IneqOp,
    y: VarId,
}

impl Inequality {
    pub fn new(x: VarId, op: IneqOp, y: VarId) -> Inequality {
        Inequality { x, op, y }
    }
}

impl Propagate for Inequality {
    fn name(&self) -> &'static str {
        "inequality"
    }

    fn variables(&self) -> Vec<VarId> {
        vec![self.x, self.y]
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let (x, y) = (self.x, self.y);
        match self.op {
            IneqOp::Lt => {
                view.remove_above(x, view.max(y) - 1)?;
                view.remove_below(y, view.min(x) + 1)
            }
            IneqOp::Le => {
                view.remove_above(x, view.max(y))?;
                view.remove_below(y, view.min(x))
            }
            IneqOp::Gt => {
                view.remove_below(x, view.min(y) + 1)?;
                view.remove_above(y, view.max(x) - 1)
            }
            IneqOp::Ge => {
                view.remove_below(x, view.min(y))?;
                view.remove_above(y, view.max(x))
            }
            IneqOp::Ne => {
                if let Some(value) = view.domain(x).singleton_value() {
                    view.remove(y, value)?;
                }
                if let Some(value) = view.domain(y).singleton_value() {
                    view.remove(x, value)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fd::domain::Domain;
    use crate::fd::propagator::harness::fixpoint1;

    #[test]
    fn test_lt() {
        let domains = vec![Domain::full(9), Domain::range(9, 1, 5).unwrap()];
        let out = fixpoint1(Inequality::new(0, IneqOp::Lt, 1), domains).unwrap();
        assert_eq!(out[0].max(), Some(4));
        assert_eq!(out[1].min(), Some(2));
    }

    #[test]
    fn test_le_ge() {
        let domains = vec![Domain::range(9, 4, 9).unwrap(), Domain::range(9, 1, 6).unwrap()];
        let out = fixpoint1(Inequality::new(0, IneqOp::Le, 1), domains).unwrap();
        assert_eq!(out[0].values(), vec![4, 5, 6]);
        assert_eq!(out[1].values(), vec![4, 5, 6]);

        let domains = vec![Domain::range(9, 1, 6).unwrap(), Domain::range(9, 4, 9).unwrap()];
        let out = fixpoint1(Inequality::new(0, IneqOp::Ge, 1), domains).unwrap();
        assert_eq!(out[0].values(), vec![4, 5, 6]);
        assert_eq!(out[1].values(), vec![4, 5, 6]);
    }

    #[test]
    fn test_ne() {
        let domains = vec![Domain::singleton(5, 3).unwrap(), Domain::full(5)];
        let out = fixpoint1(Inequality::new(0, IneqOp::Ne, 1), domains).unwrap();
        assert_eq!(out[1].values(), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_lt_unsat() {
        let domains = vec![
            Domain::range(9, 5, 9).unwrap(),
            Domain::range(9, 1, 5).unwrap(),
        ];
        assert!(fixpoint1(Inequality::new(0, IneqOp::Lt, 1), domains).is_err());
    }
}
