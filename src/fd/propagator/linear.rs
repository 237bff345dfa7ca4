use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

fn div_floor(a: isize, b: isize) -> isize {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn div_ceil(a: isize, b: isize) -> isize {
    let q = a / b;
    if a % b != 0 && (a < 0) == (b < 0) {
        q + 1
    } else {
        q
    }
}

/// `Σ cᵢ·xᵢ = constant` with bounds-consistency filtering.
///
/// The variable form `Σ cᵢ·xᵢ = total` is posted as a term `(-1, total)`
/// with constant 0; boolean sums come through the model builder with the
/// count+1 offset folded into the constant. Bounds on each variable follow
/// from the extrema of the other terms, and vice versa.
#[derive(Debug)]
pub struct LinearSum {
    name: &'static str,
    terms: Vec<(isize, VarId)>,
    constant: isize,
}

impl LinearSum {
    pub fn new(terms: Vec<(isize, VarId)>, constant: isize) -> LinearSum {
        LinearSum {
            name: "linear_sum",
            terms,
            constant,
        }
    }

    pub fn named(name: &'static str, terms: Vec<(isize, VarId)>, constant: isize) -> LinearSum {
        LinearSum {
            name,
            terms,
            constant,
        }
    }
}

impl Propagate for LinearSum {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variables(&self) -> Vec<VarId> {
        self.terms.iter().map(|&(_, v)| v).collect()
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        // Contribution bounds of each term.
        let bounds: Vec<(isize, isize)> = self
            .terms
            .iter()
            .map(|&(c, x)| {
                let (lo, hi) = (view.min(x), view.max(x));
                if c >= 0 {
                    (c * lo, c * hi)
                } else {
                    (c * hi, c * lo)
                }
            })
            .collect();
        let sum_lo: isize = bounds.iter().map(|b| b.0).sum();
        let sum_hi: isize = bounds.iter().map(|b| b.1).sum();

        if self.constant < sum_lo || self.constant > sum_hi {
            return Err(view.inconsistency(self.terms[0].1));
        }

        for (j, &(c, x)) in self.terms.iter().enumerate() {
            if c == 0 {
                continue;
            }
            let rest_lo = sum_lo - bounds[j].0;
            let rest_hi = sum_hi - bounds[j].1;
            // c·x must land in [constant − rest_hi, constant − rest_lo].
            let term_lo = self.constant - rest_hi;
            let term_hi = self.constant - rest_lo;
            let (x_lo, x_hi) = if c > 0 {
                (div_ceil(term_lo, c), div_floor(term_hi, c))
            } else {
                (div_ceil(term_hi, c), div_floor(term_lo, c))
            };
            view.remove_below(x, x_lo)?;
            view.remove_above(x, x_hi)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fd::domain::Domain;
    use crate::fd::propagator::harness::fixpoint1;

    #[test]
    fn test_div_round() {
        assert_eq!(div_floor(7, 2), 3);
        assert_eq!(div_floor(-7, 2), -4);
        assert_eq!(div_ceil(7, 2), 4);
        assert_eq!(div_ceil(-7, 2), -3);
        assert_eq!(div_floor(7, -2), -4);
        assert_eq!(div_ceil(7, -2), -3);
    }

    #[test]
    fn test_linear_sum_total_bounds() {
        // x + 2y = t; x, y ∈ 1..3, t ∈ 1..20.
        let domains = vec![
            Domain::range(20, 1, 3).unwrap(),
            Domain::range(20, 1, 3).unwrap(),
            Domain::full(20),
        ];
        let p = LinearSum::new(vec![(1, 0), (2, 1), (-1, 2)], 0);
        let out = fixpoint1(p, domains).unwrap();
        // t ∈ [1+2, 3+6] = [3, 9]
        assert_eq!(out[2].min(), Some(3));
        assert_eq!(out[2].max(), Some(9));
    }

    #[test]
    fn test_linear_sum_backward() {
        // x + y = 5 with y ∈ {4, 5} forces x = 1 at the bounds level.
        let domains = vec![
            Domain::range(9, 1, 9).unwrap(),
            Domain::range(9, 4, 5).unwrap(),
        ];
        let p = LinearSum::new(vec![(1, 0), (1, 1)], 5);
        let out = fixpoint1(p, domains).unwrap();
        assert_eq!(out[0].singleton_value(), Some(1));
        assert_eq!(out[1].singleton_value(), Some(4));
    }

    #[test]
    fn test_linear_sum_unsat() {
        // x + y = 20 over 1..5 is infeasible.
        let domains = vec![
            Domain::range(9, 1, 5).unwrap(),
            Domain::range(9, 1, 5).unwrap(),
        ];
        let p = LinearSum::new(vec![(1, 0), (1, 1)], 20);
        assert!(fixpoint1(p, domains).is_err());
    }

    #[test]
    fn test_linear_sum_assigned_check() {
        // All singletons that do not satisfy the equation fail.
        let domains = vec![
            Domain::singleton(9, 2).unwrap(),
            Domain::singleton(9, 2).unwrap(),
        ];
        let p = LinearSum::new(vec![(1, 0), (1, 1)], 5);
        assert!(fixpoint1(p, domains).is_err());

        let domains = vec![
            Domain::singleton(9, 2).unwrap(),
            Domain::singleton(9, 3).unwrap(),
        ];
        let p = LinearSum::new(vec![(1, 0), (1, 1)], 5);
        assert!(fixpoint1(p, domains).is_ok());
    }
}
