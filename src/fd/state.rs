use super::domain::Domain;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Dense per-model variable index.
pub type VarId = u32;

/// Immutable solver state: the effective domain of every model variable.
///
/// Domains are `Arc`-shared, so cloning a state for a branch copies only a
/// vector of pointers and the parent stays valid for backtracking. `changed`
/// lists the variables whose domains differ from the state this one was
/// derived from; the propagation engine uses it to prime its queue.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverState {
    pub(crate) domains: Vec<Arc<Domain>>,
    pub(crate) changed: Vec<VarId>,
}

impl SolverState {
    pub(crate) fn new(domains: Vec<Arc<Domain>>) -> SolverState {
        SolverState {
            domains,
            changed: vec![],
        }
    }

    pub fn var_count(&self) -> usize {
        self.domains.len()
    }

    pub fn domain(&self, v: VarId) -> &Domain {
        &self.domains[v as usize]
    }

    /// The variables whose domains differ from the parent state.
    pub fn changed_vars(&self) -> &[VarId] {
        &self.changed
    }

    /// Returns a child state with the variable's domain replaced. An
    /// identical domain returns an unchanged clone; an empty domain is an
    /// error rather than a state.
    pub fn set_domain(&self, v: VarId, domain: Domain) -> Result<SolverState> {
        if domain.is_empty() {
            return Err(Error::DomainEmpty { variable: v });
        }
        if *self.domains[v as usize] == domain {
            return Ok(SolverState {
                domains: self.domains.clone(),
                changed: vec![],
            });
        }
        let mut domains = self.domains.clone();
        domains[v as usize] = Arc::new(domain);
        Ok(SolverState {
            domains,
            changed: vec![v],
        })
    }

    /// Narrow a variable to a single value.
    pub fn assign(&self, v: VarId, value: isize) -> Result<SolverState> {
        let current = self.domain(v);
        if !current.has(value) {
            return Err(Error::DomainEmpty { variable: v });
        }
        let singleton = Domain::singleton(current.capacity(), value)?;
        self.set_domain(v, singleton)
    }

    pub fn is_solved(&self) -> bool {
        self.domains.iter().all(|d| d.is_singleton())
    }

    /// Extracts the solution when every domain is a singleton.
    pub fn solution(&self) -> Option<Solution> {
        let mut values = Vec::with_capacity(self.domains.len());
        for d in self.domains.iter() {
            values.push(d.singleton_value()?);
        }
        Some(Solution { values })
    }
}

/// A total assignment of model variables.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Solution {
    values: Vec<isize>,
}

impl Solution {
    pub fn value(&self, v: VarId) -> isize {
        self.values[v as usize]
    }

    pub fn values(&self) -> &[isize] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(caps: &[usize]) -> SolverState {
        SolverState::new(caps.iter().map(|&c| Arc::new(Domain::full(c))).collect())
    }

    #[test]
    fn test_state_set_domain() {
        let s = state(&[4, 4]);
        let s2 = s.set_domain(0, Domain::range(4, 2, 3).unwrap()).unwrap();
        assert_eq!(s2.changed_vars(), &[0]);
        assert_eq!(s2.domain(0).values(), vec![2, 3]);
        // Parent untouched.
        assert_eq!(s.domain(0).count(), 4);
    }

    #[test]
    fn test_state_set_identical_domain() {
        let s = state(&[4]);
        let s2 = s.set_domain(0, Domain::full(4)).unwrap();
        assert!(s2.changed_vars().is_empty());
    }

    #[test]
    fn test_state_set_empty_domain() {
        let s = state(&[4]);
        assert_eq!(
            s.set_domain(0, Domain::empty(4)),
            Err(Error::DomainEmpty { variable: 0 })
        );
    }

    #[test]
    fn test_state_solution() {
        let s = state(&[3, 3]);
        assert!(!s.is_solved());
        assert!(s.solution().is_none());

        let s = s.assign(0, 1).unwrap();
        let s = s.assign(1, 3).unwrap();
        assert!(s.is_solved());
        let sol = s.solution().unwrap();
        assert_eq!(sol.value(0), 1);
        assert_eq!(sol.value(1), 3);
    }

    #[test]
    fn test_state_assign_outside_domain() {
        let s = state(&[3]);
        let s = s.set_domain(0, Domain::range(3, 1, 2).unwrap()).unwrap();
        assert!(s.assign(0, 3).is_err());
    }
}
