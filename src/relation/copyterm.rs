use crate::goal::{Goal, Solve};
use crate::lterm::{LTerm, LTermInner, VarID};
use crate::solver::Solver;
use crate::state::State;
use crate::stream::Stream;
use std::collections::HashMap;
use std::rc::Rc;

/// `copyterm(u, v)` unifies `v` with a copy of `u` in which every free
/// variable is consistently replaced by a fresh one: shared variables within
/// `u` stay shared within the copy, and the copy is variable-disjoint
/// from `u`.
#[derive(Debug)]
pub struct Copyterm {
    u: LTerm,
    v: LTerm,
}

impl Copyterm {
    pub fn new(u: LTerm, v: LTerm) -> Goal {
        Goal::dynamic(Rc::new(Copyterm { u, v }))
    }
}

fn copy_rec(t: &LTerm, fresh: &mut HashMap<VarID, LTerm>) -> LTerm {
    match t.as_ref() {
        LTermInner::Var(uid, _) => fresh.entry(*uid).or_insert_with(LTerm::any).clone(),
        LTermInner::Cons(head, tail) => {
            LTerm::cons(copy_rec(head, fresh), copy_rec(tail, fresh))
        }
        LTermInner::Tie(name, body) => LTerm::tie(copy_rec(name, fresh), copy_rec(body, fresh)),
        _ => t.clone(),
    }
}

impl Solve for Copyterm {
    fn solve(&self, _solver: &Solver, state: State) -> Stream {
        let walked = state.smap_ref().walk_star(&self.u);
        let mut fresh = HashMap::new();
        let copy = copy_rec(&walked, &mut fresh);
        Stream::from_result(state.unify(&copy, &self.v))
    }
}

pub fn copyterm(u: LTerm, v: LTerm) -> Goal {
    Copyterm::new(u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::conj::conj;
    use crate::query::run;
    use crate::relation::eq::eq;
    use crate::lterm_list;

    #[test]
    fn test_copyterm_1() {
        // A ground term copies to itself.
        let solutions = run(0, |q| copyterm(lterm_list![1, 2, 3], q.clone()));
        assert_eq!(solutions, vec![lterm_list![1, 2, 3]]);
    }

    #[test]
    fn test_copyterm_2() {
        // The copy is variable-disjoint: binding the original after the copy
        // does not bind the copy.
        let solutions = run(0, |q| {
            let x = LTerm::var("x");
            conj(vec![
                copyterm(LTerm::from_vec(vec![x.clone(), x.clone()]), q.clone()),
                eq(x.clone(), LTerm::from(1)),
            ])
        });
        assert_eq!(solutions.len(), 1);
        let result = &solutions[0];
        // Shared variables stay shared in the copy.
        let elems: Vec<&LTerm> = result.iter().collect();
        assert_eq!(elems[0], elems[1]);
        assert!(elems[0].is_var());
    }

    #[test]
    fn test_copyterm_3() {
        // Bound parts are copied resolved.
        let solutions = run(0, |q| {
            let x = LTerm::var("x");
            conj(vec![
                eq(x.clone(), LTerm::from(1)),
                copyterm(LTerm::from_vec(vec![x.clone(), LTerm::any()]), q.clone()),
            ])
        });
        assert_eq!(solutions.len(), 1);
        let elems: Vec<&LTerm> = solutions[0].iter().collect();
        assert_eq!(elems[0], &1);
        assert!(elems[1].is_var());
    }
}
