//! Nominal term algorithms: free-name scans, α-equivalence, and
//! capture-avoiding substitution over tie-binders.
//!
//! All functions operate on walked views of the current substitution and
//! answer conservatively: an unresolved variable that could still change the
//! verdict yields `Pending` (constraints) or `Unresolved` (substitution), so
//! the caller re-fires once more bindings arrive.

use crate::lterm::{LTerm, LTermInner};
use crate::state::constraint::Outcome;
use crate::state::SMap;

/// Checks whether the nominal name `nom` occurs *free* in `term`.
///
/// Occurrences under a tie-binder with the same name are bound and do not
/// count. `Satisfied` means the freshness condition holds (no free
/// occurrence).
pub fn freshness(nom: &LTerm, term: &LTerm, smap: &SMap) -> Outcome {
    let nom = smap.walk(nom).clone();
    if nom.is_var() {
        return Outcome::Pending;
    }
    if !nom.is_symbol() {
        return Outcome::Violated;
    }

    let (found, unresolved) = occurs_free(&nom, term, smap);
    if found {
        Outcome::Violated
    } else if unresolved {
        Outcome::Pending
    } else {
        Outcome::Satisfied
    }
}

/// Returns (free occurrence found, unresolved variables seen).
fn occurs_free(nom: &LTerm, term: &LTerm, smap: &SMap) -> (bool, bool) {
    let term = smap.walk(term);
    match term.as_ref() {
        LTermInner::Var(_, _) => (false, true),
        LTermInner::Val(_) => (term == nom, false),
        LTermInner::Empty => (false, false),
        LTermInner::Cons(head, tail) => {
            let (f1, u1) = occurs_free(nom, head, smap);
            if f1 {
                return (true, u1);
            }
            let (f2, u2) = occurs_free(nom, tail, smap);
            (f2, u1 || u2)
        }
        LTermInner::Tie(name, body) => {
            let name = smap.walk(name);
            if name.is_var() {
                // The binder name is unknown; it may yet capture `nom`.
                (false, true)
            } else if name == nom {
                // Bound within the body.
                (false, false)
            } else {
                occurs_free(nom, body, smap)
            }
        }
    }
}

/// Structural equality modulo consistent renaming of tie-bound names.
pub fn alpha_eq(u: &LTerm, v: &LTerm, smap: &SMap) -> Outcome {
    let mut us = vec![];
    let mut vs = vec![];
    alpha_rec(u, v, &mut us, &mut vs, smap)
}

fn alpha_rec(
    u: &LTerm,
    v: &LTerm,
    us: &mut Vec<LTerm>,
    vs: &mut Vec<LTerm>,
    smap: &SMap,
) -> Outcome {
    let u = smap.walk(u).clone();
    let v = smap.walk(v).clone();
    match (u.as_ref(), v.as_ref()) {
        (LTermInner::Var(uvar, _), LTermInner::Var(vvar, _)) if uvar == vvar => Outcome::Satisfied,
        (LTermInner::Var(_, _), _) | (_, LTermInner::Var(_, _)) => Outcome::Pending,
        (LTermInner::Val(_), LTermInner::Val(_)) => {
            if u.is_symbol() || v.is_symbol() {
                // Symbols compare through the binder stacks: names bound at the
                // same depth correspond; a bound name never equals a free one.
                let upos = us.iter().rposition(|n| *n == u);
                let vpos = vs.iter().rposition(|n| *n == v);
                match (upos, vpos) {
                    (Some(ui), Some(vi)) if ui == vi => Outcome::Satisfied,
                    (None, None) if u == v => Outcome::Satisfied,
                    _ => Outcome::Violated,
                }
            } else if u == v {
                Outcome::Satisfied
            } else {
                Outcome::Violated
            }
        }
        (LTermInner::Empty, LTermInner::Empty) => Outcome::Satisfied,
        (LTermInner::Cons(uhead, utail), LTermInner::Cons(vhead, vtail)) => {
            match alpha_rec(uhead, vhead, us, vs, smap) {
                Outcome::Violated => Outcome::Violated,
                head_outcome => match alpha_rec(utail, vtail, us, vs, smap) {
                    Outcome::Violated => Outcome::Violated,
                    Outcome::Pending => Outcome::Pending,
                    Outcome::Satisfied => head_outcome,
                },
            }
        }
        (LTermInner::Tie(uname, ubody), LTermInner::Tie(vname, vbody)) => {
            let uname = smap.walk(uname).clone();
            let vname = smap.walk(vname).clone();
            if uname.is_var() || vname.is_var() {
                return Outcome::Pending;
            }
            us.push(uname);
            vs.push(vname);
            let outcome = alpha_rec(ubody, vbody, us, vs, smap);
            us.pop();
            vs.pop();
            outcome
        }
        _ => Outcome::Violated,
    }
}

/// The free nominal names of a walked term, or `None` while unresolved
/// variables could still introduce more.
pub fn free_noms(term: &LTerm, smap: &SMap) -> Option<Vec<LTerm>> {
    let mut bound = vec![];
    let mut free = vec![];
    if collect_free(term, smap, &mut bound, &mut free) {
        Some(free)
    } else {
        None
    }
}

fn collect_free(
    term: &LTerm,
    smap: &SMap,
    bound: &mut Vec<LTerm>,
    free: &mut Vec<LTerm>,
) -> bool {
    let term = smap.walk(term);
    match term.as_ref() {
        LTermInner::Var(_, _) => false,
        LTermInner::Val(_) => {
            if term.is_symbol() && !bound.contains(term) && !free.contains(term) {
                free.push(term.clone());
            }
            true
        }
        LTermInner::Empty => true,
        LTermInner::Cons(head, tail) => {
            collect_free(head, smap, bound, free) && collect_free(tail, smap, bound, free)
        }
        LTermInner::Tie(name, body) => {
            let name = smap.walk(name).clone();
            if name.is_var() {
                return false;
            }
            bound.push(name);
            let ok = collect_free(body, smap, bound, free);
            bound.pop();
            ok
        }
    }
}

/// Result of a capture-avoiding substitution attempt.
#[derive(Debug, Clone)]
pub enum SubstResult {
    Done(LTerm),
    /// Variables inside the term or the replacement block the rewrite; the
    /// caller should retry when more bindings arrive.
    Unresolved,
}

/// Capture-avoiding substitution `term[nom := replacement]`.
///
/// A tie-binder whose name equals `nom` shadows it; a binder whose name
/// occurs free in `replacement` is α-renamed to a fresh nominal name before
/// descending.
pub fn substitute(term: &LTerm, nom: &LTerm, replacement: &LTerm, smap: &SMap) -> SubstResult {
    let nom = smap.walk(nom).clone();
    if nom.is_var() {
        return SubstResult::Unresolved;
    }
    let replacement = smap.walk_star(replacement);
    let repl_free = match free_noms(&replacement, smap) {
        Some(free) => free,
        None => return SubstResult::Unresolved,
    };
    subst_rec(term, &nom, &replacement, &repl_free, smap)
}

fn subst_rec(
    term: &LTerm,
    nom: &LTerm,
    replacement: &LTerm,
    repl_free: &[LTerm],
    smap: &SMap,
) -> SubstResult {
    let term = smap.walk(term);
    match term.as_ref() {
        LTermInner::Var(_, _) => SubstResult::Unresolved,
        LTermInner::Val(_) => {
            if term == nom {
                SubstResult::Done(replacement.clone())
            } else {
                SubstResult::Done(term.clone())
            }
        }
        LTermInner::Empty => SubstResult::Done(term.clone()),
        LTermInner::Cons(head, tail) => {
            let head = match subst_rec(head, nom, replacement, repl_free, smap) {
                SubstResult::Done(t) => t,
                SubstResult::Unresolved => return SubstResult::Unresolved,
            };
            let tail = match subst_rec(tail, nom, replacement, repl_free, smap) {
                SubstResult::Done(t) => t,
                SubstResult::Unresolved => return SubstResult::Unresolved,
            };
            SubstResult::Done(LTerm::cons(head, tail))
        }
        LTermInner::Tie(name, body) => {
            let name = smap.walk(name).clone();
            if name.is_var() {
                return SubstResult::Unresolved;
            }
            if name == *nom {
                // Shadowed: the body's occurrences are bound.
                return SubstResult::Done(LTerm::tie(name, smap.walk_star(body)));
            }
            if repl_free.contains(&name) {
                // The binder would capture a free name of the replacement;
                // α-rename it before descending.
                let base = name.get_symbol().unwrap_or("n").to_string();
                let fresh = LTerm::fresh_nom(&base);
                let renamed = match subst_rec(body, &name, &fresh, &[], smap) {
                    SubstResult::Done(t) => t,
                    SubstResult::Unresolved => return SubstResult::Unresolved,
                };
                let body = match subst_rec(&renamed, nom, replacement, repl_free, smap) {
                    SubstResult::Done(t) => t,
                    SubstResult::Unresolved => return SubstResult::Unresolved,
                };
                return SubstResult::Done(LTerm::tie(fresh, body));
            }
            match subst_rec(body, nom, replacement, repl_free, smap) {
                SubstResult::Done(body) => SubstResult::Done(LTerm::tie(name, body)),
                SubstResult::Unresolved => SubstResult::Unresolved,
            }
        }
    }
}
