use crate::lterm::LTerm;
use std::rc::Rc;

mod substitution;
pub use substitution::SMap;

pub(crate) mod unification;
pub use unification::unify_rec;

pub mod constraint;
pub use constraint::{Constraint, Outcome};

mod reification;
pub use reification::reify;

use constraint::diseq::DisequalityConstraint;
use constraint::store::ConstraintStore;

pub type SResult = Result<State, ()>;

/// Logic program state
///
/// The `State` structure represents a state of the search. A logic program consists of goals,
/// which when applied to states, produce streams of states. Each state is a solution to a
/// (part of) logic program. The `State` can be cloned and each clone can be modified
/// independently of each other; the data structures within `State` are clone-on-write.
///
/// A state has two clone-on-write data storages: the current substitution of
/// terms and the attributed-constraint store. A generation counter tracks
/// substitution extensions so that cooperating solvers can detect change
/// cheaply.
#[derive(Clone, Debug)]
pub struct State {
    /// The substitution map
    smap: Rc<SMap>,

    /// The constraint store
    cstore: Rc<ConstraintStore>,

    generation: u64,

    occurs_check: bool,
}

impl State {
    pub fn new() -> State {
        State {
            smap: Rc::new(SMap::new()),
            cstore: Rc::new(ConstraintStore::new()),
            generation: 0,
            occurs_check: true,
        }
    }

    /// Disable the occurs check for callers that can prove acyclicity.
    /// On by default; required for soundness otherwise.
    pub fn without_occurs_check(mut self) -> State {
        self.occurs_check = false;
        self
    }

    pub fn occurs_check_enabled(&self) -> bool {
        self.occurs_check
    }

    /// The number of substitution extensions this state has seen.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Return a reference to the substitution map of the state
    pub fn smap_ref(&self) -> &SMap {
        self.smap.as_ref()
    }

    pub fn smap_to_mut(&mut self) -> &mut SMap {
        Rc::make_mut(&mut self.smap)
    }

    /// Returns the state with replaced substitution map
    pub fn with_smap(self, smap: SMap) -> State {
        State {
            smap: Rc::new(smap),
            ..self
        }
    }

    /// Get a cloned reference to the substitution map of the state
    pub fn get_smap(&self) -> Rc<SMap> {
        Rc::clone(&self.smap)
    }

    /// Return a reference to the constraint store of the state
    pub fn cstore_ref(&self) -> &ConstraintStore {
        self.cstore.as_ref()
    }

    pub fn cstore_to_mut(&mut self) -> &mut ConstraintStore {
        Rc::make_mut(&mut self.cstore)
    }

    /// Return the state with a new constraint
    pub fn with_constraint(mut self, constraint: Rc<dyn Constraint>) -> State {
        self.cstore_to_mut().push_and_normalize(constraint);
        self
    }

    pub fn take_constraint(
        mut self,
        constraint: &Rc<dyn Constraint>,
    ) -> (State, Option<Rc<dyn Constraint>>) {
        match self.cstore_to_mut().take(constraint) {
            Some(constraint) => (self, Some(constraint)),
            None => (self, None),
        }
    }

    /// Runs all constraints from the constraint store on the current state. If any of the
    /// constraints is violated, `Err` is returned. Otherwise the state is returned with an
    /// updated constraint store.
    pub fn run_constraints(mut self) -> SResult {
        let constraints = self
            .cstore
            .iter()
            .cloned()
            .collect::<Vec<Rc<dyn Constraint>>>();

        // Each constraint is first removed from the store and then run against the state.
        // If the constraint does not want to be removed from the store, it adds itself
        // back when it is run.
        for constraint in constraints {
            self = match self.take_constraint(&constraint) {
                (unconstrained_state, Some(constraint)) => constraint.run(unconstrained_state)?,
                (constrained_state, None) => constrained_state, /* Constraint has removed itself. */
            };
        }

        Ok(self)
    }

    pub fn unify(self, u: &LTerm, v: &LTerm) -> SResult {
        // Extension will contain all substitutions added in the recursive unification of the terms
        let mut extension = SMap::new();
        let mut state = unify_rec(self, &mut extension, u, v)?;
        if extension.is_empty() {
            Ok(state)
        } else {
            // The substitution has been extended: bump the generation and
            // re-verify the attributed constraints.
            state.generation += 1;
            state.run_constraints()
        }
    }

    /// Add disequality constraint
    pub fn disunify(self, u: &LTerm, v: &LTerm) -> SResult {
        // Disunification is implemented in terms of unification
        let mut extension = SMap::new();
        match unify_rec(self.clone(), &mut extension, u, v) {
            Ok(_) => {
                if extension.is_empty() {
                    // Unification succeeded without extending the current substitution, therefore
                    // disequality constraint fails.
                    Err(())
                } else {
                    // Unification succeeded with extended substitution map. Instead of adding the
                    // substitutions to the state, we add corresponding constraint to disequality
                    // constraint store, against which later unifications will be verified.
                    let c = DisequalityConstraint::new(extension);
                    Ok(self.with_constraint(c))
                }
            }
            Err(_) => Ok(self),
        }
    }
}

impl Default for State {
    fn default() -> Self {
        State::new()
    }
}
