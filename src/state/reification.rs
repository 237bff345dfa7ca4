use super::SMap;
use crate::lterm::{LTerm, LTermInner, VarID};
use std::collections::HashMap;

/// Reify a term against a substitution.
///
/// Deep-walks the term and replaces every remaining free variable with a
/// shared any-variable, so that two occurrences of the same free variable in
/// a result remain visibly shared while the original query variables do not
/// leak out.
pub fn reify(smap: &SMap, v: &LTerm) -> LTerm {
    let walked = smap.walk_star(v);
    let mut names: HashMap<VarID, LTerm> = HashMap::new();
    rename(&walked, &mut names)
}

fn rename(t: &LTerm, names: &mut HashMap<VarID, LTerm>) -> LTerm {
    match t.as_ref() {
        LTermInner::Var(uid, _) => names
            .entry(*uid)
            .or_insert_with(LTerm::any)
            .clone(),
        LTermInner::Cons(head, tail) => LTerm::cons(rename(head, names), rename(tail, names)),
        LTermInner::Tie(name, body) => LTerm::tie(rename(name, names), rename(body, names)),
        _ => t.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reify_ground() {
        let mut smap = SMap::new();
        let x = LTerm::any();
        smap.extend(x.clone(), LTerm::from(1));
        assert_eq!(reify(&smap, &x), LTerm::from(1));
    }

    #[test]
    fn test_reify_shared_free_vars() {
        let smap = SMap::new();
        let x = LTerm::any();
        let l = LTerm::from_vec(vec![x.clone(), x.clone(), LTerm::any()]);
        let r = reify(&smap, &l);

        let elems: Vec<&LTerm> = r.iter().collect();
        // The two occurrences of x stay shared; the third variable differs.
        assert_eq!(elems[0], elems[1]);
        assert_ne!(elems[0], elems[2]);
        // The original variable does not leak out.
        assert_ne!(elems[0], &x);
    }
}
