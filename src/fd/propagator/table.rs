use crate::fd::domain::Domain;
use crate::fd::propagate::{PResult, Propagate, StateView};
use crate::fd::state::VarId;

/// `(x₁, ..., xₙ) ∈ rows`: generalized arc consistency by hit-set pruning.
/// A value survives only if some row compatible with all current domains
/// supports it.
#[derive(Debug)]
pub struct Table {
    vars: Vec<VarId>,
    rows: Vec<Vec<isize>>,
}

impl Table {
    pub fn new(vars: Vec<VarId>, rows: Vec<Vec<isize>>) -> Table {
        Table { vars, rows }
    }
}

impl Propagate for Table {
    fn name(&self) -> &'static str {
        "table"
    }

    fn variables(&self) -> Vec<VarId> {
        self.vars.clone()
    }

    fn propagate(&self, view: &mut StateView<'_>) -> PResult {
        let mut supported: Vec<Domain> = self
            .vars
            .iter()
            .map(|&x| Domain::empty(view.domain(x).capacity()))
            .collect();

        for row in &self.rows {
            let live = row
                .iter()
                .zip(self.vars.iter())
                .all(|(&value, &x)| view.domain(x).has(value));
            if live {
                for (j, &value) in row.iter().enumerate() {
                    supported[j] = supported[j].with(value);
                }
            }
        }

        for (j, &x) in self.vars.iter().enumerate() {
            view.tighten(x, &supported[j])?;
        }
        Ok(())
    }
}
