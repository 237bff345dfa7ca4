use crate::lterm::{LTerm, LTermInner};
use std::collections::HashMap;
use std::ops::Deref;

/// Substitution Map
///
/// Substitution maps track the binding of variables to terms. The map is
/// persistent in the copy-on-write sense: a `State` shares it behind an `Rc`
/// and clones it before extending.
#[derive(Clone, Debug, Default)]
pub struct SMap(HashMap<LTerm, LTerm>);

impl SMap {
    /// Construct an an empty substitution map with no substitutions
    pub fn new() -> SMap {
        SMap(HashMap::new())
    }

    /// Extend substitution map with a new substitution
    pub fn extend(&mut self, k: LTerm, v: LTerm) {
        self.0.insert(k, v);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Walk substitution map
    ///
    /// Walking the substitution map recursively traverses the map until no next term is found,
    /// or the term found is a non-variable.
    pub fn walk<'a>(&'a self, mut k: &'a LTerm) -> &'a LTerm {
        loop {
            match k.as_ref() {
                LTermInner::Var(_, _) => {
                    match self.0.get(k) {
                        Some(s) => k = s, // recurse for variable-kind
                        None => return k, // if no next term found
                    }
                }
                _ => return k, // if the term is not a variable
            }
        }
    }

    /// Deeper walk of substitution map
    ///
    /// Walks the substitution map recursively like `walk()`, but does not stop at lists or
    /// binders, and instead recurses to deep walk the subterms as well. Returns a term which
    /// is a tree where all leaves are walked terms. This is the `deep-walk` used by
    /// reification.
    pub fn walk_star(&self, v: &LTerm) -> LTerm {
        let v = self.walk(v);
        match v.as_ref() {
            LTermInner::Cons(head, tail) => LTerm::cons(self.walk_star(head), self.walk_star(tail)),
            LTermInner::Tie(name, body) => {
                LTerm::tie(self.walk_star(name), self.walk_star(body))
            }
            _ => v.clone(),
        }
    }

    /// Check that the variable `x` is not contained in the term `v`.
    ///
    /// Occurs check is used to prevent unification of terms that would cause the variable to
    /// be contained in itself.
    pub fn occurs_check(&self, x: &LTerm, v: &LTerm) -> bool {
        match self.walk(v).as_ref() {
            LTermInner::Var(vvar, _) => match x.as_ref() {
                LTermInner::Var(xvar, _) => *vvar == *xvar,
                _ => false,
            },
            LTermInner::Cons(head, tail) => {
                self.occurs_check(x, head) || self.occurs_check(x, tail)
            }
            LTermInner::Tie(name, body) => {
                self.occurs_check(x, name) || self.occurs_check(x, body)
            }
            _ => false,
        }
    }

    /// Check if the given logic term refers to any unassociated variables
    pub fn is_anyvar(&self, v: &LTerm) -> bool {
        match v.as_ref() {
            LTermInner::Var(_, _) => self.walk(v).is_var(),
            LTermInner::Cons(u, v) => self.is_anyvar(u) || self.is_anyvar(v),
            LTermInner::Tie(name, body) => self.is_anyvar(name) || self.is_anyvar(body),
            _ => false,
        }
    }

    /// Returns a set of variable operands referenced by the substitution
    pub fn operands(&self) -> Vec<LTerm> {
        let mut operands = vec![];
        for (k, v) in self.0.iter() {
            operands.push(k.clone());
            if v.is_var() {
                operands.push(v.clone());
            }
        }
        operands
    }
}

impl IntoIterator for SMap {
    type Item = (LTerm, LTerm);
    type IntoIter = ::std::collections::hash_map::IntoIter<LTerm, LTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Deref for SMap {
    type Target = HashMap<LTerm, LTerm>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
