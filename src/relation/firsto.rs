use crate::goal::Goal;
use crate::lterm::LTerm;
use crate::relation::conso::conso;

/// `firsto(l, a)` holds when `a` is the head of `l`.
pub fn firsto(l: LTerm, a: LTerm) -> Goal {
    conso(a, LTerm::any(), l)
}
