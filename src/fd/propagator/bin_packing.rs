use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

/// Bin packing: item i of size `sizes[i]` goes to bin `bins[i]` (values
/// 1-based), and each bin's load stays within its capacity.
///
/// Propagates bin assignments against committed loads and checks capacity
/// saturation across the remaining items.
#[derive(Debug)]
pub struct BinPacking {
    bins: Vec<VarId>,
    sizes: Vec<isize>,
    capacities: Vec<isize>,
}

impl BinPacking {
    pub fn new(bins: Vec<VarId>, sizes: Vec<isize>, capacities: Vec<isize>) -> BinPacking {
        BinPacking {
            bins,
            sizes,
            capacities,
        }
    }
}

impl Propagate for BinPacking {
    fn name(&self) -> &'static str {
        "bin_packing"
    }

    fn variables(&self) -> Vec<VarId> {
        self.bins.clone()
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let n = self.bins.len();
        let m = self.capacities.len();

        // Keep bin values within 1..=m.
        for &x in &self.bins {
            view.remove_below(x, 1)?;
            view.remove_above(x, m as isize)?;
        }

        // Committed load per bin.
        let mut committed = vec![0isize; m + 1];
        for i in 0..n {
            if let Some(b) = view.domain(self.bins[i]).singleton_value() {
                committed[b as usize] += self.sizes[i];
            }
        }
        for b in 1..=m {
            if committed[b] > self.capacities[b - 1] {
                return Err(view.inconsistency(self.bins[0]));
            }
        }

        // An unassigned item cannot go where it would overflow.
        for i in 0..n {
            if view.domain(self.bins[i]).is_singleton() {
                continue;
            }
            let size = self.sizes[i];
            let committed = &committed;
            let keep = view.domain(self.bins[i]).mapped(|b| {
                if committed[b as usize] + size > self.capacities[(b - 1) as usize] {
                    None
                } else {
                    Some(b)
                }
            });
            view.tighten(self.bins[i], &keep)?;
        }

        // Saturation: the reachable capacity must cover the total size.
        let total_size: isize = self.sizes.iter().sum();
        let mut reachable = 0isize;
        for b in 1..=m {
            let usable = self.bins.iter().any(|&x| view.domain(x).has(b as isize));
            if usable {
                reachable += self.capacities[b - 1];
            }
        }
        if reachable < total_size {
            return Err(view.inconsistency(self.bins[0]));
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
    fn test_bin_packing_overflow_prune() {
        // Bin 1 already holds size 3 of 4; the size-2 item must go to bin 2.
        let domains = vec![Domain::singleton(2, 1).unwrap(), Domain::full(2)];
        let p = BinPacking::new(vec![0, 1], vec![3, 2], vec![4, 4]);
        let out = fixpoint1(p, domains).unwrap();
        assert_eq!(out[1].singleton_value(), Some(2));
    }

    #[test]
    fn test_bin_packing_committed_overflow() {
        let domains = vec![
            Domain::singleton(2, 1).unwrap(),
            Domain::singleton(2, 1).unwrap(),
        ];
        let p = BinPacking::new(vec![0, 1], vec![3, 2], vec![4, 4]);
        assert!(fixpoint1(p, domains).is_err());
    }

    #[test]
    fn test_bin_packing_saturation() {
        // Total size 9 over capacities 4 + 4 cannot fit.
        let domains = vec![Domain::full(2), Domain::full(2), Domain::full(2)];
        let p = BinPacking::new(vec![0, 1, 2], vec![3, 3, 3], vec![4, 4]);
        assert!(fixpoint1(p, domains).is_err());
    }

    #[test]
    fn test_bin_packing_feasible() {
        let domains = vec![Domain::full(2), Domain::full(2)];
        let p = BinPacking::new(vec![0, 1], vec![3, 3], vec![4, 4]);
        assert!(fixpoint1(p, domains).is_ok());
    }
}
