use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::VecDeque;

/// AllDifferent with Régin-style filtering.
///
/// After the cheap singleton sweep, a maximum matching of the variable/value
/// bipartite graph is computed with augmenting paths; a value survives in a
/// variable's domain only if its edge is in the matching, lies inside a
/// strongly connected component of the residual graph, or sits on an
/// alternating path from a free value. Everything else is in no maximum
/// matching and is removed.
#[derive(Debug)]
pub struct AllDifferent {
    vars: Vec<VarId>,
}

impl AllDifferent {
    pub fn new(vars: Vec<VarId>) -> AllDifferent {
        AllDifferent { vars }
    }
}

impl Propagate for AllDifferent {
    fn name(&self) -> &'static str {
        "all_different"
    }

    fn variables(&self) -> Vec<VarId> {
        self.vars.clone()
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let n = self.vars.len();

        // Singleton sweep: an assigned value is gone from every other domain.
        for i in 0..n {
            if let Some(value) = view.domain(self.vars[i]).singleton_value() {
                for j in 0..n {
                    if j != i {
                        view.remove(self.vars[j], value)?;
                    }
                }
            }
        }

        // Value universe of the current domains.
        let mut values: Vec<isize> = vec![];
        for &x in &self.vars {
            for v in view.domain(x).iter() {
                if !values.contains(&v) {
                    values.push(v);
                }
            }
        }
        values.sort_unstable();
        let m = values.len();
        if m < n {
            return Err(view.inconsistency(self.vars[0]));
        }
        let val_index = |v: isize| values.binary_search(&v).unwrap();

        // Variable adjacency over value indices.
        let adj: Vec<Vec<usize>> = self
            .vars
            .iter()
            .map(|&x| view.domain(x).iter().map(val_index).collect())
            .collect();

        // Maximum matching by augmenting paths.
        let mut match_of_var: Vec<Option<usize>> = vec![None; n];
        let mut match_of_val: Vec<Option<usize>> = vec![None; m];
        for i in 0..n {
            let mut seen = vec![false; m];
            if !augment(i, &adj, &mut seen, &mut match_of_var, &mut match_of_val) {
                return Err(view.inconsistency(self.vars[i]));
            }
        }

        // Residual orientation: matched edges var→val, unmatched val→var.
        // Alternating paths from free values then follow the arcs.
        let mut graph = DiGraph::<(), ()>::new();
        let nodes: Vec<NodeIndex> = (0..n + m).map(|_| graph.add_node(())).collect();
        for (i, vals) in adj.iter().enumerate() {
            for &j in vals {
                if match_of_var[i] == Some(j) {
                    graph.add_edge(nodes[i], nodes[n + j], ());
                } else {
                    graph.add_edge(nodes[n + j], nodes[i], ());
                }
            }
        }

        let mut component = vec![0usize; n + m];
        for (c, scc) in tarjan_scc(&graph).into_iter().enumerate() {
            for node in scc {
                component[node.index()] = c;
            }
        }

        // Nodes reachable from free values along alternating paths.
        let mut reached = vec![false; n + m];
        let mut queue: VecDeque<usize> = (0..m)
            .filter(|&j| match_of_val[j].is_none())
            .map(|j| n + j)
            .collect();
        for &start in queue.iter() {
            reached[start] = true;
        }
        while let Some(node) = queue.pop_front() {
            for next in graph.neighbors(nodes[node]) {
                if !reached[next.index()] {
                    reached[next.index()] = true;
                    queue.push_back(next.index());
                }
            }
        }

        // Filter: keep matched edges, SCC-internal edges, and edges whose
        // value end is alternating-reachable from a free value.
        for i in 0..n {
            let mut pruned = view.domain(self.vars[i]).clone();
            for &j in &adj[i] {
                if match_of_var[i] == Some(j) {
                    continue;
                }
                if component[i] == component[n + j] {
                    continue;
                }
                if reached[n + j] {
                    continue;
                }
                pruned = pruned.remove(values[j]);
            }
            view.tighten(self.vars[i], &pruned)?;
        }

        Ok(())
    }
}

fn augment(
    i: usize,
    adj: &[Vec<usize>],
    seen: &mut [bool],
    match_of_var: &mut [Option<usize>],
    match_of_val: &mut [Option<usize>],
) -> bool {
    for &j in &adj[i] {
        if seen[j] {
            continue;
        }
        seen[j] = true;
        let free = match match_of_val[j] {
            None => true,
            Some(owner) => augment(owner, adj, seen, match_of_var, match_of_val),
        };
        if free {
            match_of_var[i] = Some(j);
            match_of_val[j] = Some(i);
            return true;
        }
    }
    false
}
