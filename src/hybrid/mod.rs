//! The hybrid store and cross-solver propagation.
//!
//! A `UnifiedStore` carries relational bindings and finite domains side by
//! side; pluggable solvers run over it to a joint fixed point. The
//! relational plugin checks attributed constraints and moves information
//! across the seam (singleton promotion, binding projection); the FD plugin
//! runs the propagation engine of an attached model. The loop terminates
//! because every step either adds a binding or strictly shrinks a domain,
//! observed through the store's generation counter.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::fd::{Domain, Model, Solver as FdSolver, SolverState, VarId};
use crate::lterm::LTerm;
use crate::state::{Constraint, Outcome, SMap};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

/// A store holding both relational bindings and FD domains, plus the
/// heterogeneous constraints guarding them. Logically immutable: branching
/// clones a child (`child`), mutation is by replacement, and the generation
/// counter advances on every real change.
#[derive(Clone, Default)]
pub struct UnifiedStore {
    bindings: SMap,
    domains: HashMap<VarId, Domain>,
    attached: Vec<(LTerm, VarId)>,
    constraints: Vec<Rc<dyn Constraint>>,
    depth: usize,
    generation: u64,
}

impl UnifiedStore {
    pub fn new() -> UnifiedStore {
        UnifiedStore::default()
    }

    /// A clone one search level deeper.
    pub fn child(&self) -> UnifiedStore {
        let mut child = self.clone();
        child.depth += 1;
        child
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bindings(&self) -> &SMap {
        &self.bindings
    }

    pub fn domain(&self, v: VarId) -> Option<&Domain> {
        self.domains.get(&v)
    }

    pub fn attached(&self) -> &[(LTerm, VarId)] {
        &self.attached
    }

    /// Associates a relational variable with an FD variable and its initial
    /// domain.
    pub fn attach(&mut self, var: LTerm, fd_var: VarId, domain: Domain) -> Result<()> {
        if !var.is_var() {
            return Err(Error::InvalidArgument(
                "only variables can carry a finite domain".into(),
            ));
        }
        self.attached.push((var, fd_var));
        self.set_domain(fd_var, domain)
    }

    /// Binds a relational variable. Binding an already-bound variable to a
    /// different value is an inconsistency.
    pub fn add_binding(&mut self, var: LTerm, term: LTerm) -> Result<()> {
        let walked = self.bindings.walk(&var).clone();
        if walked.is_var() {
            self.bindings.extend(walked, term);
            self.generation += 1;
            Ok(())
        } else if walked == term {
            Ok(())
        } else {
            Err(Error::Inconsistent {
                propagator: "unified_store",
                variable: 0,
            })
        }
    }

    pub fn set_domain(&mut self, v: VarId, domain: Domain) -> Result<()> {
        if domain.is_empty() {
            return Err(Error::DomainEmpty { variable: v });
        }
        match self.domains.get(&v) {
            Some(current) if *current == domain => Ok(()),
            _ => {
                self.domains.insert(v, domain);
                self.generation += 1;
                Ok(())
            }
        }
    }

    pub fn add_constraint(&mut self, constraint: Rc<dyn Constraint>) {
        self.constraints.push(constraint);
        self.generation += 1;
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

impl std::fmt::Debug for UnifiedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("UnifiedStore")
            .field("bindings", &self.bindings.len())
            .field("domains", &self.domains)
            .field("constraints", &self.constraints.len())
            .field("depth", &self.depth)
            .field("generation", &self.generation)
            .finish()
    }
}

/// A solver cooperating over the unified store.
pub trait SolverPlugin {
    fn name(&self) -> &'static str;

    fn propagate(&self, store: &mut UnifiedStore, ctx: &Context) -> Result<()>;
}

/// The relational half: attributed-constraint checking plus the two
/// cross-solver rules.
///
/// - Binding projection: a variable bound to integer v prunes its attached
///   domain to `{v}`; a non-integer binding over an FD-attached variable is
///   a `TypeMismatch`.
/// - Singleton promotion: a singleton domain `{v}` on an unbound variable
///   adds the binding to the integer atom v.
#[derive(Debug, Default)]
pub struct RelationalPlugin;

impl RelationalPlugin {
    pub fn new() -> RelationalPlugin {
        RelationalPlugin
    }
}

impl SolverPlugin for RelationalPlugin {
    fn name(&self) -> &'static str {
        "relational"
    }

    fn propagate(&self, store: &mut UnifiedStore, ctx: &Context) -> Result<()> {
        ctx.checkpoint()?;

        // Attributed constraints against the current bindings; satisfied
        // ones retire, violated ones reject the store.
        let mut pending = Vec::with_capacity(store.constraints.len());
        for constraint in store.constraints.drain(..).collect::<Vec<_>>() {
            match constraint.check(&store.bindings) {
                Outcome::Satisfied => {}
                Outcome::Pending => pending.push(constraint),
                Outcome::Violated => {
                    return Err(Error::Inconsistent {
                        propagator: "relational",
                        variable: 0,
                    })
                }
            }
        }
        store.constraints = pending;

        for (var, fd_var) in store.attached.clone() {
            let walked = store.bindings.walk(&var).clone();
            if walked.is_var() {
                // Singleton promotion.
                if let Some(value) = store.domain(fd_var).and_then(|d| d.singleton_value()) {
                    debug!(fd_var, value, "promoting singleton to binding");
                    store.add_binding(walked, LTerm::from(value))?;
                }
            } else if let Some(value) = walked.get_number() {
                // Binding projection.
                if let Some(domain) = store.domain(fd_var) {
                    if !domain.has(value) {
                        return Err(Error::Inconsistent {
                            propagator: "binding_projection",
                            variable: fd_var,
                        });
                    }
                    let capacity = domain.capacity();
                    store.set_domain(fd_var, Domain::singleton(capacity, value)?)?;
                }
            } else if store.domain(fd_var).is_some() {
                return Err(Error::TypeMismatch {
                    variable: format!("{}", var),
                });
            }
        }
        Ok(())
    }
}

/// The FD half: runs the propagation engine of the attached model over the
/// store's domains and writes the pruned domains back.
pub struct FdPlugin {
    solver: FdSolver,
}

impl FdPlugin {
    /// The model's variable ids are the store's FD ids.
    pub fn new(model: Model) -> FdPlugin {
        FdPlugin {
            solver: FdSolver::new(model),
        }
    }
}

impl SolverPlugin for FdPlugin {
    fn name(&self) -> &'static str {
        "fd"
    }

    fn propagate(&self, store: &mut UnifiedStore, ctx: &Context) -> Result<()> {
        let model = self.solver.model();
        let mut domains = Vec::with_capacity(model.var_count());
        for v in 0..model.var_count() as VarId {
            let domain = store
                .domain(v)
                .cloned()
                .unwrap_or_else(|| model.var(v).domain.clone());
            domains.push(Arc::new(domain));
        }

        let state = self.solver.propagate(ctx, &SolverState::new(domains))?;
        for v in 0..model.var_count() as VarId {
            store.set_domain(v, state.domain(v).clone())?;
        }
        Ok(())
    }
}

/// Runs the plugins round-robin until a full round leaves the generation
/// counter untouched.
pub struct HybridSolver {
    plugins: Vec<Box<dyn SolverPlugin>>,
}

impl HybridSolver {
    pub fn new(relational: RelationalPlugin, fd: FdPlugin) -> HybridSolver {
        HybridSolver {
            plugins: vec![Box::new(relational), Box::new(fd)],
        }
    }

    pub fn with_plugins(plugins: Vec<Box<dyn SolverPlugin>>) -> HybridSolver {
        HybridSolver { plugins }
    }

    pub fn propagate(&self, ctx: &Context, store: &mut UnifiedStore) -> Result<()> {
        loop {
            let generation = store.generation();
            for plugin in &self.plugins {
                ctx.checkpoint()?;
                plugin.propagate(store, ctx)?;
            }
            if store.generation() == generation {
                debug!(generation, "hybrid fixed point");
                return Ok(());
            }
        }
    }
}
