use crate::goal::{Goal, Solve};
use crate::lterm::LTerm;
use crate::solver::Solver;
use crate::state::constraint::nominal::FreshnessConstraint;
use crate::state::constraint::Constraint;
use crate::state::State;
use crate::stream::Stream;
use std::rc::Rc;

/// Nominal freshness goal: the name must not occur free in the term.
#[derive(Debug)]
struct Fresho {
    nom: LTerm,
    term: LTerm,
}

impl Solve for Fresho {
    fn solve(&self, _solver: &Solver, state: State) -> Stream {
        let c = FreshnessConstraint::new(self.nom.clone(), self.term.clone());
        Stream::from_result(c.run(state))
    }
}

pub fn fresho(nom: LTerm, term: LTerm) -> Goal {
    Goal::dynamic(Rc::new(Fresho { nom, term }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::conj::conj;
    use crate::query::run;
    use crate::relation::eq::eq;

    #[test]
    fn test_fresho_1() {
        let a = LTerm::symbol("a");
        let b = LTerm::symbol("b");

        // a is fresh in tie(a, a): the occurrence is bound.
        let t = LTerm::tie(a.clone(), a.clone());
        let solutions = run(0, move |_q| fresho(a.clone(), t.clone()));
        assert_eq!(solutions.len(), 1);

        // a is not fresh in tie(b, a).
        let a = LTerm::symbol("a");
        let t = LTerm::tie(b, a.clone());
        let solutions = run(0, move |_q| fresho(a.clone(), t.clone()));
        assert!(solutions.is_empty());
    }

    #[test]
    fn test_fresho_2() {
        // The constraint guards later bindings.
        let solutions = run(0, |q| {
            let a = LTerm::symbol("a");
            conj(vec![
                fresho(a.clone(), q.clone()),
                eq(q.clone(), LTerm::singleton(a.clone())),
            ])
        });
        assert!(solutions.is_empty());

        let solutions = run(0, |q| {
            let a = LTerm::symbol("a");
            conj(vec![
                fresho(a.clone(), q.clone()),
                eq(q.clone(), LTerm::singleton(LTerm::symbol("b"))),
            ])
        });
        assert_eq!(solutions.len(), 1);
    }
}
