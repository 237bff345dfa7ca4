//! Clause-based pattern matching.
//!
//! A clause pairs a pattern term with a body goal; matching a term against a
//! clause unifies it with the pattern and then runs the body. The three
//! operators differ in clause selection: `matche` explores every matching
//! clause, `matcha` commits to the first clause whose pattern matches, and
//! `matchu` additionally commits to a single answer of that pattern match.
use crate::goal::Goal;
use crate::lterm::LTerm;
use crate::operator::cond::{ifa, ifte};
use crate::operator::conj::conj;
use crate::operator::disj::disj;
use crate::relation::eq::eq;

#[derive(Debug)]
pub struct Clause {
    pub pattern: LTerm,
    pub body: Goal,
}

impl Clause {
    pub fn new(pattern: LTerm, body: Goal) -> Clause {
        Clause { pattern, body }
    }
}

/// Exhaustive match: a disjunction over all clauses.
pub fn matche(term: LTerm, clauses: Vec<Clause>) -> Goal {
    disj(
        clauses
            .into_iter()
            .map(|c| conj(vec![eq(term.clone(), c.pattern), c.body]))
            .collect(),
    )
}

/// Committed match: the first clause whose pattern unifies is chosen and the
/// rest are discarded.
pub fn matcha(term: LTerm, clauses: Vec<Clause>) -> Goal {
    let mut goal = Goal::fail();
    for c in clauses.into_iter().rev() {
        goal = ifa(eq(term.clone(), c.pattern), c.body, goal);
    }
    goal
}

/// Unique match: like `matcha`, but only the first answer of the chosen
/// pattern match is kept.
pub fn matchu(term: LTerm, clauses: Vec<Clause>) -> Goal {
    let mut goal = Goal::fail();
    for c in clauses.into_iter().rev() {
        goal = ifte(eq(term.clone(), c.pattern), c.body, goal);
    }
    goal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run;
    use crate::lterm_list;

    fn number_clauses(q: &LTerm) -> Vec<Clause> {
        vec![
            Clause::new(lterm_list![1], eq(q.clone(), LTerm::from("one"))),
            Clause::new(lterm_list![2], eq(q.clone(), LTerm::from("two"))),
            Clause::new(LTerm::any(), eq(q.clone(), LTerm::from("many"))),
        ]
    }

    #[test]
    fn test_matche_1() {
        // All clauses whose patterns match contribute answers.
        let solutions = run(0, |q| matche(lterm_list![1], number_clauses(q)));
        assert_eq!(solutions.len(), 2);
        assert!(solutions.contains(&LTerm::from("one")));
        assert!(solutions.contains(&LTerm::from("many")));
    }

    #[test]
    fn test_matche_2() {
        let solutions = run(0, |q| matche(lterm_list![3], number_clauses(q)));
        assert_eq!(solutions, vec![LTerm::from("many")]);
    }

    #[test]
    fn test_matcha_1() {
        // Committed choice takes only the first matching clause.
        let solutions = run(0, |q| matcha(lterm_list![1], number_clauses(q)));
        assert_eq!(solutions, vec![LTerm::from("one")]);
    }

    #[test]
    fn test_matchu_1() {
        let solutions = run(0, |q| matchu(lterm_list![2], number_clauses(q)));
        assert_eq!(solutions, vec![LTerm::from("two")]);
    }
}
