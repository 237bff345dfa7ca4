use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::nominal::{substitute, SubstResult};
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// Deterministic capture-avoiding substitution goal:
/// `substo(term, nom, replacement, out)` unifies `out` with
/// `term[nom := replacement]`.
///
/// While the term or replacement contains unresolved variables the goal
/// yields no solution; the caller re-tries once more bindings arrive.
#[derive(Debug)]
struct Substo {
    term: LTerm,
    nom: LTerm,
    replacement: LTerm,
    out: LTerm,
}

impl Solve for Substo {
    fn solve(&self, _solver: &Solver, state: State) -> Stream {
        match substitute(&self.term, &self.nom, &self.replacement, state.smap_ref()) {
            SubstResult::Done(result) => Stream::from_result(state.unify(&result, &self.out)),
            SubstResult::Unresolved => Stream::empty(),
        }
    }
}

pub fn substo(term: LTerm, nom: LTerm, replacement: LTerm, out: LTerm) -> Goal {
    Goal::dynamic(Rc::new(Substo {
        term,
        nom,
        replacement,
        out,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run;

    #[test]
    fn test_substo_1() {
        // (tie a. [a, b])[b := 2] = tie a. [a, 2]
        let solutions = run(0, |q| {
            let a = LTerm::symbol("a");
            let b = LTerm::symbol("b");
            let t = LTerm::tie(a.clone(), LTerm::from_vec(vec![a.clone(), b.clone()]));
            substo(t, b.clone(), LTerm::from(2), q.clone())
        });
        assert_eq!(solutions.len(), 1);
        let a = LTerm::symbol("a");
        assert_eq!(
            solutions[0],
            LTerm::tie(a.clone(), LTerm::from_vec(vec![a, LTerm::from(2)]))
        );
    }

    #[test]
    fn test_substo_2() {
        // Capture avoidance: (tie b. a)[a := b] renames the binder.
        let solutions = run(0, |q| {
            let a = LTerm::symbol("a");
            let b = LTerm::symbol("b");
            substo(LTerm::tie(b.clone(), a.clone()), a, b, q.clone())
        });
        assert_eq!(solutions.len(), 1);
        let out = &solutions[0];
        let b = LTerm::symbol("b");
        assert_ne!(out.tie_name().unwrap(), &b);
        assert_eq!(out.tie_body().unwrap(), &b);
    }

    #[test]
    fn test_substo_3() {
        // Unresolved input yields no solution.
        let solutions = run(0, |q| {
            let a = LTerm::symbol("a");
            substo(LTerm::var("t"), a, LTerm::from(1), q.clone())
        });
        assert!(solutions.is_empty());
    }
}
