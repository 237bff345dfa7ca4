use crate::goal::Goal;
use crate::lterm::LTerm;
use crate::relation::conso::conso;

/// `resto(l, d)` holds when `d` is the tail of `l`.
pub fn resto(l: LTerm, d: LTerm) -> Goal {
    conso(LTerm::any(), d, l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run;
    use crate::lterm_list;

    #[test]
    fn test_resto_1() {
        let solutions = run(0, |q| resto(lterm_list![1, 2, 3], q.clone()));
        assert_eq!(solutions, vec![lterm_list![2, 3]]);
    }
}
