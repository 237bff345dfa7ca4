use crate::context::Context;
use crate::goal::Goal;
use crate::lterm::LTerm;
use crate::solver::Solver;
use crate::state::{reify, State};
use crate::stream::Stream;
use std::iter::FusedIterator;

/// A relational query over a single query variable.
///
/// The closure receives the query variable and returns the goal; solutions
/// are the reified values of the variable in each result state.
pub struct Query {
    q: LTerm,
    goal: Goal,
}

impl Query {
    pub fn new<F>(f: F) -> Query
    where
        F: FnOnce(&LTerm) -> Goal,
    {
        let q = LTerm::var("q");
        let goal = f(&q);
        Query { q, goal }
    }

    pub fn run(&self) -> ResultIterator {
        self.run_with_context(Context::new())
    }

    pub fn run_with_context(&self, context: Context) -> ResultIterator {
        self.run_with_state(context, State::new())
    }

    /// Run against a custom initial state, e.g. one with the occurs check
    /// disabled or pre-seeded bindings.
    pub fn run_with_state(&self, context: Context, initial_state: State) -> ResultIterator {
        let solver = Solver::new(context);
        let stream = solver.start(&self.goal, initial_state);
        ResultIterator {
            solver,
            q: self.q.clone(),
            stream,
        }
    }
}

pub struct ResultIterator {
    solver: Solver,
    q: LTerm,
    stream: Stream,
}

impl Iterator for ResultIterator {
    type Item = LTerm;

    fn next(&mut self) -> Option<Self::Item> {
        self.solver
            .next(&mut self.stream)
            .map(|state| reify(state.smap_ref(), &self.q))
    }
}

/* ResultIterator is fused because the solver keeps returning None on an
 * empty stream. */
impl FusedIterator for ResultIterator {}

/// Run a query for up to `n` solutions; `n == 0` streams all of them.
pub fn run<F>(n: usize, f: F) -> Vec<LTerm>
where
    F: FnOnce(&LTerm) -> Goal,
{
    run_with_context(Context::new(), n, f)
}

/// As `run`, under an explicit cancellation context.
pub fn run_with_context<F>(context: Context, n: usize, f: F) -> Vec<LTerm>
where
    F: FnOnce(&LTerm) -> Goal,
{
    let query = Query::new(f);
    let iter = query.run_with_context(context);
    if n == 0 {
        iter.collect()
    } else {
        iter.take(n).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::disj::disj;
    use crate::relation::eq::eq;

    #[test]
    fn test_query_iterator() {
        let query = Query::new(|q| {
            disj(vec![
                eq(q.clone(), LTerm::from(1)),
                eq(q.clone(), LTerm::from(2)),
            ])
        });
        let mut iter = query.run();
        assert!(iter.next().is_some());
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_query_rerun() {
        // A query can be run multiple times.
        let query = Query::new(|q| eq(q.clone(), LTerm::from(1)));
        assert_eq!(query.run().count(), 1);
        assert_eq!(query.run().count(), 1);
    }

    #[test]
    fn test_run_limit() {
        let solutions = run(1, |q| {
            disj(vec![
                eq(q.clone(), LTerm::from(1)),
                eq(q.clone(), LTerm::from(2)),
            ])
        });
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn test_run_without_occurs_check() {
        // x = [x] is rejected by default and admitted when the caller
        // disables the occurs check. The query variable stays acyclic so
        // that reification remains finite.
        let cyclic = |q: &LTerm| {
            let x = LTerm::var("x");
            crate::operator::conj::conj(vec![
                eq(x.clone(), LTerm::singleton(x.clone())),
                eq(q.clone(), LTerm::from(1)),
            ])
        };
        let query = Query::new(&cyclic);
        assert_eq!(query.run().count(), 0);

        let query = Query::new(&cyclic);
        let solved = query
            .run_with_state(Context::new(), State::new().without_occurs_check())
            .count();
        assert_eq!(solved, 1);
    }

    #[test]
    fn test_run_cancelled() {
        // A cancelled context yields no solutions.
        let ctx = Context::new();
        ctx.cancel();
        let solutions = run_with_context(ctx, 0, |q| eq(q.clone(), LTerm::from(1)));
        assert!(solutions.is_empty());
    }
}
