use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

/// Cumulative scheduling: at every time point the demands of the running
/// tasks may not exceed the capacity. Start times are domain values; a task
/// started at `s` runs over `[s, s + duration)`.
///
/// Filtering combines the timetable of compulsory parts with an
/// energetic-reasoning overload check over est/lct windows.
#[derive(Debug)]
pub struct Cumulative {
    starts: Vec<VarId>,
    durations: Vec<isize>,
    demands: Vec<isize>,
    capacity: isize,
}

impl Cumulative {
    pub fn new(
        starts: Vec<VarId>,
        durations: Vec<isize>,
        demands: Vec<isize>,
        capacity: isize,
    ) -> Cumulative {
        Cumulative {
            starts,
            durations,
            demands,
            capacity,
        }
    }

    /// The compulsory part of task i: `[lst, ect)` when non-empty.
    fn compulsory(&self, view: &StateView<'_>, i: usize) -> Option<(isize, isize)> {
        let lst = view.max(self.starts[i]);
        let ect = view.min(self.starts[i]) + self.durations[i];
        if lst < ect {
            Some((lst, ect))
        } else {
            None
        }
    }
}

impl Propagate for Cumulative {
    fn name(&self) -> &'static str {
        "cumulative"
    }

    fn variables(&self) -> Vec<VarId> {
        self.starts.clone()
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let n = self.starts.len();
        let horizon = self
            .starts
            .iter()
            .zip(self.durations.iter())
            .map(|(&s, &d)| view.max(s) + d)
            .max()
            .unwrap_or(0);

        // Timetable of compulsory parts.
        let mut profile = vec![0isize; (horizon + 1) as usize];
        for i in 0..n {
            if let Some((lo, hi)) = self.compulsory(view, i) {
                for t in lo..hi {
                    profile[t as usize] += self.demands[i];
                }
            }
        }
        for t in 0..=horizon {
            if profile[t as usize] > self.capacity {
                return Err(view.inconsistency(self.starts[0]));
            }
        }

        // Prune start values that would overload some time point, with the
        // task's own compulsory contribution taken out of the profile.
        for i in 0..n {
            let compulsory = self.compulsory(view, i);
            let duration = self.durations[i];
            let demand = self.demands[i];
            let keep = view.domain(self.starts[i]).mapped(|s| {
                for t in s..s + duration {
                    if t > horizon {
                        break;
                    }
                    let mut load = profile[t as usize];
                    if let Some((lo, hi)) = compulsory {
                        if t >= lo && t < hi {
                            load -= demand;
                        }
                    }
                    if load + demand > self.capacity {
                        return None;
                    }
                }
                Some(s)
            });
            view.tighten(self.starts[i], &keep)?;
        }

        // Energetic overload check over [est_i, lct_j) windows.
        let est: Vec<isize> = self.starts.iter().map(|&s| view.min(s)).collect();
        let lct: Vec<isize> = self
            .starts
            .iter()
            .zip(self.durations.iter())
            .map(|(&s, &d)| view.max(s) + d)
            .collect();
        for i in 0..n {
            for j in 0..n {
                let (w_lo, w_hi) = (est[i], lct[j]);
                if w_lo >= w_hi {
                    continue;
                }
                let mut energy = 0isize;
                for k in 0..n {
                    if est[k] >= w_lo && lct[k] <= w_hi {
                        energy += self.durations[k] * self.demands[k];
                    }
                }
                if energy > self.capacity * (w_hi - w_lo) {
                    return Err(view.inconsistency(self.starts[i]));
                }
            }
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
    fn test_cumulative_timetable_prune() {
        // Task 0 fixed at t=1, duration 2, demand 2; capacity 3. Task 1
        // (demand 2, duration 2) cannot overlap it.
        let domains = vec![Domain::singleton(6, 1).unwrap(), Domain::full(6)];
        let p = Cumulative::new(vec![0, 1], vec![2, 2], vec![2, 2], 3);
        let out = fixpoint1(p, domains).unwrap();
        // Overlap at times 1..3 is forbidden: start 1 and 2 are gone; a start
        // of 3 runs over [3, 5) which is clear.
        assert_eq!(out[1].values(), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_cumulative_parallel_ok() {
        // Capacity 4 admits both demand-2 tasks in parallel: no pruning.
        let domains = vec![Domain::singleton(6, 1).unwrap(), Domain::full(6)];
        let p = Cumulative::new(vec![0, 1], vec![2, 2], vec![2, 2], 4);
        let out = fixpoint1(p, domains).unwrap();
        assert_eq!(out[1].count(), 6);
    }

    #[test]
    fn test_cumulative_overload() {
        // Two compulsory demand-2 tasks at the same time over capacity 3.
        let domains = vec![
            Domain::singleton(6, 2).unwrap(),
            Domain::singleton(6, 2).unwrap(),
        ];
        let p = Cumulative::new(vec![0, 1], vec![2, 2], vec![2, 2], 3);
        assert!(fixpoint1(p, domains).is_err());
    }

    #[test]
    fn test_cumulative_energetic() {
        // Three unit-demand length-2 tasks in a window of 4 time units with
        // capacity 1: energy 6 > 4.
        let domains = vec![
            Domain::range(6, 1, 3).unwrap(),
            Domain::range(6, 1, 3).unwrap(),
            Domain::range(6, 1, 3).unwrap(),
        ];
        let p = Cumulative::new(vec![0, 1, 2], vec![2, 2, 2], vec![1, 1, 1], 1);
        assert!(fixpoint1(p, domains).is_err());
    }
}
