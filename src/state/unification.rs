use super::substitution::SMap;
use super::{SResult, State};
use crate::lterm::{LTerm, LTermInner};

/// Recursive unification of tree terms
///
/// Walks both terms one step and dispatches on their kinds. Every substitution
/// added on the way is recorded in `extension` so that the caller can
/// post-process the whole unification through the constraint and domain
/// machinery in one sweep.
///
/// Unification never panics: conflicts and occurs-check cycles return `Err`.
pub fn unify_rec(mut state: State, extension: &mut SMap, u: &LTerm, v: &LTerm) -> SResult {
    let uwalk = state.smap_ref().walk(u).clone();
    let vwalk = state.smap_ref().walk(v).clone();
    match (uwalk.as_ref(), vwalk.as_ref()) {
        (LTermInner::Var(uvar, _), LTermInner::Var(vvar, _)) if uvar == vvar => {
            // If both terms are variables that walk to the same variable id, then the current
            // state can already unify the variables. Return the input state unchanged.
            Ok(state)
        }
        (LTermInner::Var(_, _), _) => {
            // The term u is a variable and the term v is something else. The variable u and
            // the term v can be unified by extending the substitution map.
            if state.occurs_check_enabled() && state.smap_ref().occurs_check(&uwalk, &vwalk) {
                Err(())
            } else {
                extension.extend(uwalk.clone(), vwalk.clone());
                state.smap_to_mut().extend(uwalk, vwalk);
                Ok(state)
            }
        }
        (_, LTermInner::Var(_, _)) => {
            // The term `v` is a variable and the term `u` is something else. The variable `v`
            // and the term `u` can be unified by extending the substitution map.
            if state.occurs_check_enabled() && state.smap_ref().occurs_check(&vwalk, &uwalk) {
                Err(())
            } else {
                extension.extend(vwalk.clone(), uwalk.clone());
                state.smap_to_mut().extend(vwalk, uwalk);
                Ok(state)
            }
        }
        (LTermInner::Val(uval), LTermInner::Val(vval)) if uval == vval => {
            // If both terms walk to identical values, then they are already unified.
            Ok(state)
        }
        (LTermInner::Empty, LTermInner::Empty) => Ok(state),
        (LTermInner::Cons(uhead, utail), LTermInner::Cons(vhead, vtail)) => {
            let state = unify_rec(state, extension, uhead, vhead)?;
            unify_rec(state, extension, utail, vtail)
        }
        (LTermInner::Tie(uname, ubody), LTermInner::Tie(vname, vbody)) => {
            // Tie-binders unify syntactically: equal names, unifiable bodies.
            // Equality modulo bound-name renaming is the α-equivalence
            // constraint, not unification.
            let state = unify_rec(state, extension, uname, vname)?;
            unify_rec(state, extension, ubody, vbody)
        }
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lterm_list;

    fn unify_pair(u: &LTerm, v: &LTerm) -> (SResult, SMap) {
        let mut extension = SMap::new();
        let state = unify_rec(State::new(), &mut extension, u, v);
        (state, extension)
    }

    #[test]
    fn test_unify_1() {
        // 1. var == var through a shared walk target
        let mut state = State::new();
        let v0 = LTerm::any();
        let v1 = LTerm::any();
        let v2 = LTerm::any();

        state.smap_to_mut().extend(v1.clone(), v0.clone());
        state.smap_to_mut().extend(v2.clone(), v0.clone());

        // both v1 and v2 walk to same variable id, therefore unification succeeds
        // with the current substitution
        let mut extension = SMap::new();
        let state = unify_rec(state, &mut extension, &v1, &v2).unwrap();
        assert!(extension.is_empty());
        drop(state);
    }

    #[test]
    fn test_unify_2() {
        // 2. var != var => unified by extending the substitution
        let mut state = State::new();
        let v0 = LTerm::any();
        let v1 = LTerm::any();
        let v2 = LTerm::any();
        let v3 = LTerm::any();

        state.smap_to_mut().extend(v1.clone(), v0.clone());
        state.smap_to_mut().extend(v2.clone(), v3.clone());

        let mut extension = SMap::new();
        let _ = unify_rec(state, &mut extension, &v1, &v2).unwrap();
        assert!(!extension.is_empty());
    }

    #[test]
    fn test_unify_3() {
        // 3. var == val
        let v = LTerm::any();
        let t = LTerm::from(1);
        let (state, extension) = unify_pair(&v, &t);
        let state = state.unwrap();
        assert!(!extension.is_empty());
        assert!(LTerm::ptr_eq(state.smap_ref().walk(&v), &t));
    }

    #[test]
    fn test_unify_4() {
        // 4. val == val / val != val
        let (state, extension) = unify_pair(&LTerm::from(1), &LTerm::from(1));
        assert!(state.is_ok());
        assert!(extension.is_empty());

        let (state, _) = unify_pair(&LTerm::from(1), &LTerm::from(2));
        assert!(state.is_err());
    }

    #[test]
    fn test_unify_5() {
        // 5. lists unify elementwise
        let x = LTerm::any();
        let u = lterm_list![1, 2, 3];
        let v = LTerm::from_vec(vec![LTerm::from(1), x.clone(), LTerm::from(3)]);
        let (state, _) = unify_pair(&u, &v);
        let state = state.unwrap();
        assert_eq!(state.smap_ref().walk(&x), &2);
    }

    #[test]
    fn test_unify_6() {
        // 6. lists of different length do not unify
        let (state, _) = unify_pair(&lterm_list![1, 2], &lterm_list![1]);
        assert!(state.is_err());
        let (state, _) = unify_pair(&lterm_list![1, 2], &lterm_list![1, 3]);
        assert!(state.is_err());
    }

    #[test]
    fn test_unify_7() {
        // 7. occurs check rejects cyclic bindings
        let x = LTerm::any();
        let l = LTerm::singleton(x.clone());
        let (state, _) = unify_pair(&x, &l);
        assert!(state.is_err());
    }

    #[test]
    fn test_unify_8() {
        // 8. ties unify on equal names and unifiable bodies
        let a = LTerm::symbol("a");
        let b = LTerm::symbol("b");
        let x = LTerm::any();

        let t1 = LTerm::tie(a.clone(), x.clone());
        let t2 = LTerm::tie(a.clone(), LTerm::from(1));
        let (state, _) = unify_pair(&t1, &t2);
        let state = state.unwrap();
        assert_eq!(state.smap_ref().walk(&x), &1);

        // Different names do not unify, even with equal bodies.
        let t3 = LTerm::tie(b, LTerm::from(1));
        let (state, _) = unify_pair(&t2, &t3);
        assert!(state.is_err());
    }

    #[test]
    fn test_unify_symmetry() {
        // unify(t1, t2) succeeds iff unify(t2, t1) succeeds, with the same bindings
        let x = LTerm::any();
        let u = LTerm::from_vec(vec![x.clone(), LTerm::from(2)]);
        let v = lterm_list![1, 2];

        let (s1, _) = unify_pair(&u, &v);
        let (s2, _) = unify_pair(&v, &u);
        let s1 = s1.unwrap();
        let s2 = s2.unwrap();
        assert_eq!(s1.smap_ref().walk(&x), s2.smap_ref().walk(&x));
    }

    #[test]
    fn test_unify_self() {
        // unify(t, t, σ) = σ
        let x = LTerm::any();
        let u = LTerm::from_vec(vec![x, LTerm::from(2)]);
        let (state, extension) = unify_pair(&u, &u);
        assert!(state.is_ok());
        assert!(extension.is_empty());
    }
}
