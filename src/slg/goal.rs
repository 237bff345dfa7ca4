use super::pattern::canonicalize;
use super::table::Answer;
use super::{Engine, Evaluator};
use crate::context::Context;
use crate::error::Result;
use crate::goal::{Goal, Solve};
use crate::lterm::{LTerm, LTermInner, VarID};
use crate::solver::Solver;
use crate::state::State;
use crate::stream::{LazyStream, Stream};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Tabled evaluation of a goal as a named subgoal.
///
/// Solving canonicalizes the arguments under the caller's bindings, lets the
/// engine produce (or replay) the answer set, and unifies fresh-renamed
/// answers back into the caller state, so the caller's attributed
/// constraints still guard every replayed binding.
pub struct Tabled {
    engine: Rc<Engine>,
    predicate: String,
    args: Vec<LTerm>,
    body: Goal,
}

impl fmt::Debug for Tabled {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tabled({}/{})", self.predicate, self.args.len())
    }
}

/// The evaluator of a tabled goal: reproduce the canonical call shape in a
/// fresh state, run the body, and deep-walk the arguments of every result.
fn goal_evaluator(args: Vec<LTerm>, template: Vec<LTerm>, body: Goal) -> Evaluator {
    Rc::new(move |_engine: &Engine, ctx: &Context| -> Result<Vec<Answer>> {
        let mut state = State::new();
        for (arg, tmpl) in args.iter().zip(template.iter()) {
            state = match state.unify(arg, tmpl) {
                Ok(state) => state,
                // The canonical template always unifies with its own call.
                Err(()) => return Ok(vec![]),
            };
        }

        let solver = Solver::new(ctx.clone());
        let mut stream = body.solve(&solver, state);
        let mut answers = vec![];
        while let Some(result) = solver.next(&mut stream) {
            ctx.checkpoint()?;
            answers.push(
                args.iter()
                    .map(|a| result.smap_ref().walk_star(a))
                    .collect(),
            );
        }
        Ok(answers)
    })
}

fn rename_fresh(t: &LTerm, vars: &mut HashMap<VarID, LTerm>) -> LTerm {
    match t.as_ref() {
        LTermInner::Var(uid, _) => vars.entry(*uid).or_insert_with(LTerm::any).clone(),
        LTermInner::Cons(head, tail) => {
            LTerm::cons(rename_fresh(head, vars), rename_fresh(tail, vars))
        }
        LTermInner::Tie(name, body) => {
            LTerm::tie(rename_fresh(name, vars), rename_fresh(body, vars))
        }
        _ => t.clone(),
    }
}

impl Solve for Tabled {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let pattern = canonicalize(&self.predicate, &self.args, state.smap_ref());
        let mut vars = HashMap::new();
        let template: Vec<LTerm> = pattern
            .args
            .iter()
            .map(|a| a.instantiate(&mut vars))
            .collect();
        let evaluator = goal_evaluator(self.args.clone(), template, self.body.clone());

        let answers = match self.engine.evaluate(solver.context(), pattern, evaluator) {
            Ok(answers) => answers,
            Err(_) => return Stream::empty(),
        };

        // Replay: unify each fresh-renamed answer with the call arguments.
        let mut states = vec![];
        for answer in answers {
            let mut fresh = HashMap::new();
            let mut replay = state.clone();
            let mut ok = true;
            for (arg, term) in self.args.iter().zip(answer.iter()) {
                let renamed = rename_fresh(term, &mut fresh);
                match replay.clone().unify(arg, &renamed) {
                    Ok(next) => replay = next,
                    Err(()) => {
                        ok = false;
                        break;
                    }
                }
            }
            if ok {
                states.push(replay);
            }
        }

        let mut stream = Stream::empty();
        for replay in states.into_iter().rev() {
            stream = Stream::mplus(
                Stream::unit(Box::new(replay)),
                LazyStream::delay(stream),
            );
        }
        stream
    }
}

/// A goal evaluated through the SLG engine under the given predicate name.
pub fn tabled(engine: Rc<Engine>, predicate: &str, args: Vec<LTerm>, body: Goal) -> Goal {
    Goal::dynamic(Rc::new(Tabled {
        engine,
        predicate: predicate.to_string(),
        args,
        body,
    }))
}

/// Negation-as-failure of a tabled subgoal: succeeds (with no new bindings)
/// iff the subgoal has zero answers. Subject to stratification.
pub struct Negated {
    engine: Rc<Engine>,
    predicate: String,
    args: Vec<LTerm>,
    body: Goal,
}

impl fmt::Debug for Negated {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Negated({}/{})", self.predicate, self.args.len())
    }
}

impl Solve for Negated {
    fn solve(&self, solver: &Solver, state: State) -> Stream {
        let pattern = canonicalize(&self.predicate, &self.args, state.smap_ref());
        let mut vars = HashMap::new();
        let template: Vec<LTerm> = pattern
            .args
            .iter()
            .map(|a| a.instantiate(&mut vars))
            .collect();
        let evaluator = goal_evaluator(self.args.clone(), template, self.body.clone());

        match self.engine.negate(solver.context(), pattern, evaluator) {
            Ok(true) => Stream::unit(Box::new(state)),
            Ok(false) => Stream::empty(),
            Err(_) => Stream::empty(),
        }
    }
}

pub fn negated(engine: Rc<Engine>, predicate: &str, args: Vec<LTerm>, body: Goal) -> Goal {
    Goal::dynamic(Rc::new(Negated {
        engine,
        predicate: predicate.to_string(),
        args,
        body,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::closure::closure;
    use crate::operator::conj::conj;
    use crate::operator::disj::disj;
    use crate::query::run;
    use crate::relation::eq::eq;
    use crate::slg::EngineConfig;

    /// parent(john, mary). parent(mary, alice).
    fn parent(engine: &Rc<Engine>, a: LTerm, b: LTerm) -> Goal {
        let body = disj(vec![
            conj(vec![
                eq(a.clone(), LTerm::from("john")),
                eq(b.clone(), LTerm::from("mary")),
            ]),
            conj(vec![
                eq(a.clone(), LTerm::from("mary")),
                eq(b.clone(), LTerm::from("alice")),
            ]),
        ]);
        tabled(Rc::clone(engine), "parent", vec![a, b], body)
    }

    #[test]
    fn test_tabled_grandparent() {
        let engine = Rc::new(Engine::new(EngineConfig::default()));
        let solutions = run(0, |q| {
            let gp = LTerm::var("gp");
            let p = LTerm::var("p");
            let gc = LTerm::var("gc");
            conj(vec![
                parent(&engine, gp.clone(), p.clone()),
                parent(&engine, p.clone(), gc.clone()),
                eq(gp.clone(), LTerm::from("john")),
                eq(
                    q.clone(),
                    LTerm::from_vec(vec![gp.clone(), p.clone(), gc.clone()]),
                ),
            ])
        });
        assert_eq!(solutions.len(), 1);
        let expected = LTerm::from_vec(vec![
            LTerm::from("john"),
            LTerm::from("mary"),
            LTerm::from("alice"),
        ]);
        assert_eq!(solutions[0], expected);
    }

    #[test]
    fn test_tabled_cache_hit() {
        let engine = Rc::new(Engine::new(EngineConfig::default()));
        for _ in 0..2 {
            let engine = Rc::clone(&engine);
            let solutions = run(0, move |q| {
                let b = LTerm::var("b");
                conj(vec![
                    parent(&engine, q.clone(), b.clone()),
                ])
            });
            assert_eq!(solutions.len(), 2);
        }
        // One table for the open call, consulted again on the second run.
        assert!(engine.stats().hits >= 1);
    }

    /// Left-recursive reachability over edge facts; terminates only through
    /// tabling. The recursive call is built behind a closure so that goal
    /// construction itself stays finite.
    fn reach(engine: &Rc<Engine>, edges: Rc<Vec<(isize, isize)>>, a: LTerm, b: LTerm) -> Goal {
        let edge_goal = |x: LTerm, y: LTerm| {
            disj(
                edges
                    .iter()
                    .map(|&(from, to)| {
                        conj(vec![
                            eq(x.clone(), LTerm::from(from)),
                            eq(y.clone(), LTerm::from(to)),
                        ])
                    })
                    .collect(),
            )
        };
        let z = LTerm::any();
        let rec_engine = Rc::clone(engine);
        let rec_edges = Rc::clone(&edges);
        let rec_a = a.clone();
        let rec_z = z.clone();
        let body = disj(vec![
            conj(vec![
                closure(move || {
                    reach(
                        &rec_engine,
                        Rc::clone(&rec_edges),
                        rec_a.clone(),
                        rec_z.clone(),
                    )
                }),
                edge_goal(z.clone(), b.clone()),
            ]),
            edge_goal(a.clone(), b.clone()),
        ]);
        tabled(Rc::clone(engine), "reach", vec![a, b], body)
    }

    #[test]
    fn test_tabled_left_recursion() {
        let engine = Rc::new(Engine::new(EngineConfig::default()));
        let edges = Rc::new(vec![(1, 2), (2, 3)]);
        let solutions = run(0, move |q| {
            reach(&engine, Rc::clone(&edges), LTerm::from(1), q.clone())
        });
        let mut values: Vec<isize> = solutions.iter().map(|s| s.get_number().unwrap()).collect();
        values.sort();
        assert_eq!(values, vec![2, 3]);
    }

    #[test]
    fn test_tabled_cycle_terminates() {
        let engine = Rc::new(Engine::new(EngineConfig::default()));
        let edges = Rc::new(vec![(1, 2), (2, 1)]);
        let solutions = run(0, move |q| {
            reach(&engine, Rc::clone(&edges), LTerm::from(1), q.clone())
        });
        let mut values: Vec<isize> = solutions.iter().map(|s| s.get_number().unwrap()).collect();
        values.sort();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_negated_goal() {
        let engine = Rc::new(Engine::new(EngineConfig::default()));
        // parent(alice, _) has no answers, so the negation succeeds.
        let e1 = Rc::clone(&engine);
        let solutions = run(0, move |q| {
            let b = LTerm::var("b");
            conj(vec![
                eq(q.clone(), LTerm::from("alice")),
                negated(
                    Rc::clone(&e1),
                    "parent",
                    vec![q.clone(), b.clone()],
                    parent_body(q.clone(), b.clone()),
                ),
            ])
        });
        assert_eq!(solutions.len(), 1);

        // parent(john, _) has answers; the negation fails.
        let e2 = Rc::clone(&engine);
        let solutions = run(0, move |q| {
            let b = LTerm::var("b");
            conj(vec![
                eq(q.clone(), LTerm::from("john")),
                negated(
                    Rc::clone(&e2),
                    "parent",
                    vec![q.clone(), b.clone()],
                    parent_body(q.clone(), b.clone()),
                ),
            ])
        });
        assert!(solutions.is_empty());
    }

    fn parent_body(a: LTerm, b: LTerm) -> Goal {
        disj(vec![
            conj(vec![
                eq(a.clone(), LTerm::from("john")),
                eq(b.clone(), LTerm::from("mary")),
            ]),
            conj(vec![
                eq(a.clone(), LTerm::from("mary")),
                eq(b.clone(), LTerm::from("alice")),
            ]),
        ])
    }
}
