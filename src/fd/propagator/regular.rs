use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

/// A deterministic finite automaton over domain values 1-based.
#[derive(Clone, Debug)]
pub struct Dfa {
    states: usize,
    start: usize,
    accepting: Vec<bool>,
    /// transitions[state][symbol - 1]
    transitions: Vec<Vec<Option<usize>>>,
}

impl Dfa {
    pub fn new(states: usize, start: usize, symbols: usize) -> Dfa {
        Dfa {
            states,
            start,
            accepting: vec![false; states],
            transitions: vec![vec![None; symbols]; states],
        }
    }

    pub fn accept(&mut self, state: usize) {
        self.accepting[state] = true;
    }

    pub fn transition(&mut self, from: usize, symbol: isize, to: usize) {
        self.transitions[from][(symbol - 1) as usize] = Some(to);
    }

    fn step(&self, state: usize, symbol: isize) -> Option<usize> {
        let idx = (symbol - 1) as usize;
        if idx < self.transitions[state].len() {
            self.transitions[state][idx]
        } else {
            None
        }
    }

    /// The run-length automaton behind the Stretch constraint: one state per
    /// `(value, run-counter)` pair. Within a run the counter advances up to
    /// the value's maximum length; switching values (or accepting) requires
    /// the minimum length to be reached.
    pub fn stretch(specs: &[(isize, usize, usize)], symbols: usize) -> Dfa {
        // State 0 is the start; state of (spec i, run r) follows.
        let mut offsets = Vec::with_capacity(specs.len());
        let mut total = 1;
        for &(_, _, max_len) in specs {
            offsets.push(total);
            total += max_len;
        }
        let mut dfa = Dfa::new(total, 0, symbols);
        let state_of = |i: usize, r: usize| offsets[i] + r - 1;

        for (i, &(value, _, max_len)) in specs.iter().enumerate() {
            dfa.transition(0, value, state_of(i, 1));
            for r in 1..=max_len {
                let here = state_of(i, r);
                if r + 1 <= max_len {
                    dfa.transition(here, value, state_of(i, r + 1));
                }
            }
        }
        for (i, &(_, min_len, max_len)) in specs.iter().enumerate() {
            for r in min_len..=max_len {
                let here = state_of(i, r);
                dfa.accepting[here] = true;
                for (j, &(other_value, _, _)) in specs.iter().enumerate() {
                    if i != j {
                        dfa.transition(here, other_value, state_of(j, 1));
                    }
                }
            }
        }
        dfa
    }
}

/// The variable sequence spells a word accepted by the DFA. Filtering is by
/// forward/backward reachability over the layered state graph: a value
/// survives at position i only if it lies on some start-to-accept path.
#[derive(Debug)]
pub struct Regular {
    vars: Vec<VarId>,
    dfa: Dfa,
}

impl Regular {
    pub fn new(vars: Vec<VarId>, dfa: Dfa) -> Regular {
        Regular { vars, dfa }
    }
}

impl Propagate for Regular {
    fn name(&self) -> &'static str {
        "regular"
    }

    fn variables(&self) -> Vec<VarId> {
        self.vars.clone()
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let n = self.vars.len();
        let s = self.dfa.states;

        // Forward-reachable state layers.
        let mut forward = vec![vec![false; s]; n + 1];
        forward[0][self.dfa.start] = true;
        for i in 0..n {
            for state in 0..s {
                if !forward[i][state] {
                    continue;
                }
                for value in view.domain(self.vars[i]).iter() {
                    if let Some(next) = self.dfa.step(state, value) {
                        forward[i + 1][next] = true;
                    }
                }
            }
        }

        // Backward-live state layers.
        let mut backward = vec![vec![false; s]; n + 1];
        backward[n] = self.dfa.accepting.clone();
        for i in (0..n).rev() {
            for state in 0..s {
                for value in view.domain(self.vars[i]).iter() {
                    if let Some(next) = self.dfa.step(state, value) {
                        if backward[i + 1][next] {
                            backward[i][state] = true;
                        }
                    }
                }
            }
        }

        // A value needs a forward-reachable source whose successor is
        // backward-live.
        for i in 0..n {
            let keep = view.domain(self.vars[i]).mapped(|value| {
                for state in 0..s {
                    if forward[i][state] {
                        if let Some(next) = self.dfa.step(state, value) {
                            if backward[i + 1][next] {
                                return Some(value);
                            }
                        }
                    }
                }
                None
            });
            view.tighten(self.vars[i], &keep)?;
        }

        Ok(())
    }
}
