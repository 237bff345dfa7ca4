use crate::lterm::{LTerm, LTermInner, VarID};
use crate::lvalue::LValue;
use crate::state::SMap;
use std::collections::HashMap;
use std::fmt;

/// A canonicalized term: variables renumbered by first occurrence, so two
/// calls that differ only in variable identity share a pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CanonTerm {
    Var(usize),
    Val(LValue),
    Empty,
    Cons(Box<CanonTerm>, Box<CanonTerm>),
    Tie(Box<CanonTerm>, Box<CanonTerm>),
}

impl CanonTerm {
    /// Rebuilds a logic term, sharing one fresh variable per canonical
    /// variable index.
    pub fn instantiate(&self, vars: &mut HashMap<usize, LTerm>) -> LTerm {
        match self {
            CanonTerm::Var(i) => vars.entry(*i).or_insert_with(LTerm::any).clone(),
            CanonTerm::Val(value) => LTerm::from(value.clone()),
            CanonTerm::Empty => LTerm::empty_list(),
            CanonTerm::Cons(head, tail) => {
                LTerm::cons(head.instantiate(vars), tail.instantiate(vars))
            }
            CanonTerm::Tie(name, body) => {
                LTerm::tie(name.instantiate(vars), body.instantiate(vars))
            }
        }
    }
}

impl fmt::Display for CanonTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CanonTerm::Var(i) => write!(f, "_{}", i),
            CanonTerm::Val(value) => write!(f, "{}", value),
            CanonTerm::Empty => write!(f, "[]"),
            CanonTerm::Cons(head, tail) => write!(f, "[{} | {}]", head, tail),
            CanonTerm::Tie(name, body) => write!(f, "tie({}, {})", name, body),
        }
    }
}

/// The memoization key of a subgoal: predicate name plus canonicalized
/// arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallPattern {
    pub predicate: String,
    pub args: Vec<CanonTerm>,
}

impl fmt::Display for CallPattern {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.predicate)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

fn canon(t: &LTerm, smap: &SMap, vars: &mut HashMap<VarID, usize>) -> CanonTerm {
    let t = smap.walk(t);
    match t.as_ref() {
        LTermInner::Var(uid, _) => {
            let next = vars.len();
            CanonTerm::Var(*vars.entry(*uid).or_insert(next))
        }
        LTermInner::Val(value) => CanonTerm::Val(value.clone()),
        LTermInner::Empty => CanonTerm::Empty,
        LTermInner::Cons(head, tail) => CanonTerm::Cons(
            Box::new(canon(head, smap, vars)),
            Box::new(canon(tail, smap, vars)),
        ),
        LTermInner::Tie(name, body) => CanonTerm::Tie(
            Box::new(canon(name, smap, vars)),
            Box::new(canon(body, smap, vars)),
        ),
    }
}

/// Canonicalizes a call: arguments are walked against the substitution and
/// variables renumbered consistently across all of them.
pub fn canonicalize(predicate: &str, args: &[LTerm], smap: &SMap) -> CallPattern {
    let mut vars = HashMap::new();
    CallPattern {
        predicate: predicate.to_string(),
        args: args.iter().map(|a| canon(a, smap, &mut vars)).collect(),
    }
}

/// The canonical form of an answer tuple, used for structural deduplication.
pub fn answer_key(terms: &[LTerm]) -> Vec<CanonTerm> {
    let smap = SMap::new();
    let mut vars = HashMap::new();
    terms.iter().map(|t| canon(t, &smap, &mut vars)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_renames_consistently() {
        let smap = SMap::new();
        let x = LTerm::any();
        let y = LTerm::any();

        // f(x, y, x) and f(y, x, y) share a pattern.
        let p1 = canonicalize("f", &[x.clone(), y.clone(), x.clone()], &smap);
        let p2 = canonicalize("f", &[y.clone(), x.clone(), y.clone()], &smap);
        assert_eq!(p1, p2);

        // f(x, x, x) does not.
        let p3 = canonicalize("f", &[x.clone(), x.clone(), x.clone()], &smap);
        assert_ne!(p1, p3);
    }

    #[test]
    fn test_canonicalize_walks_bindings() {
        let mut smap = SMap::new();
        let x = LTerm::any();
        smap.extend(x.clone(), LTerm::from(1));

        let bound = canonicalize("f", &[x], &smap);
        let constant = canonicalize("f", &[LTerm::from(1)], &SMap::new());
        assert_eq!(bound, constant);
    }

    #[test]
    fn test_instantiate_shares_vars() {
        let smap = SMap::new();
        let x = LTerm::any();
        let pattern = canonicalize("f", &[x.clone(), x.clone()], &smap);

        let mut vars = HashMap::new();
        let args: Vec<LTerm> = pattern
            .args
            .iter()
            .map(|a| a.instantiate(&mut vars))
            .collect();
        assert_eq!(args[0], args[1]);
        assert!(args[0].is_var());
        // The instantiation is variable-disjoint from the original call.
        assert_ne!(args[0], x);
    }

    #[test]
    fn test_answer_key_dedup() {
        let a = LTerm::from("a");
        let k1 = answer_key(&[a.clone(), LTerm::any()]);
        let k2 = answer_key(&[a.clone(), LTerm::any()]);
        assert_eq!(k1, k2);

        let k3 = answer_key(&[a.clone(), LTerm::from(1)]);
        assert_ne!(k1, k3);
    }
}
