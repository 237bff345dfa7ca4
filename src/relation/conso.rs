use crate::goal::Goal;
use crate::lterm::LTerm;
use crate::relation::eq::eq;

/// `conso(a, d, l)` holds when `l` is the cons of `a` onto `d`.
pub fn conso(a: LTerm, d: LTerm, l: LTerm) -> Goal {
    eq(LTerm::cons(a, d), l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run;
    use crate::lterm_list;

    #[test]
    fn test_conso_1() {
        let solutions = run(0, |q| {
            conso(LTerm::from(1), lterm_list![2, 3], q.clone())
        });
        assert_eq!(solutions, vec![lterm_list![1, 2, 3]]);
    }

    #[test]
    fn test_conso_2() {
        let solutions = run(0, |q| {
            conso(q.clone(), lterm_list![2, 3], lterm_list![1, 2, 3])
        });
        assert_eq!(solutions, vec![LTerm::from(1)]);
    }
}
