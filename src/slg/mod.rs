//! The SLG tabling engine.
//!
//! Subgoals are memoized under canonicalized call patterns; recursive calls
//! consume answer snapshots and record dependency edges, and the strongly
//! connected components of the dependency graph are iterated to a fixed
//! point once the root evaluation settles. Negation is admitted only under
//! stratification.

pub mod goal;
pub mod pattern;
pub mod table;

pub use goal::{negated, tabled};
pub use pattern::{canonicalize, CallPattern, CanonTerm};
pub use table::{Answer, Status, Subgoal};

use crate::context::Context;
use crate::error::{Error, Result};
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Maximum number of table entries kept; additional subgoals are
    /// evaluated without memoization. 0 = unlimited.
    pub max_table_size: usize,
    /// Per-subgoal answer cap; 0 = unlimited.
    pub max_answers_per_subgoal: usize,
    /// SCC fixed-point iteration guard.
    pub max_fixpoint_iterations: usize,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            max_table_size: 0,
            max_answers_per_subgoal: 0,
            max_fixpoint_iterations: 1000,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub tables: usize,
    pub answers: usize,
    pub hits: usize,
    pub fixpoint_rounds: usize,
}

/// An evaluator produces the answers of a subgoal; nested tabled calls
/// re-enter the engine through the reference it receives.
pub type Evaluator = Rc<dyn Fn(&Engine, &Context) -> Result<Vec<Answer>>>;

/// The tabling engine. Single-threaded and re-entrant: evaluators call back
/// into `evaluate`/`negate` while their own subgoal is on the stack.
pub struct Engine {
    config: EngineConfig,
    tables: RefCell<HashMap<CallPattern, Rc<Subgoal>>>,
    evaluators: RefCell<HashMap<CallPattern, Evaluator>>,
    strata: RefCell<HashMap<String, i32>>,
    stack: RefCell<Vec<CallPattern>>,
    stats: RefCell<Stats>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Engine {
        Engine {
            config,
            tables: RefCell::new(HashMap::new()),
            evaluators: RefCell::new(HashMap::new()),
            strata: RefCell::new(HashMap::new()),
            stack: RefCell::new(vec![]),
            stats: RefCell::new(Stats::default()),
        }
    }

    /// Assigns negation strata to predicate names; unlisted predicates are
    /// stratum 0.
    pub fn set_strata(&self, strata: HashMap<String, i32>) {
        *self.strata.borrow_mut() = strata;
    }

    fn stratum(&self, predicate: &str) -> i32 {
        self.strata.borrow().get(predicate).copied().unwrap_or(0)
    }

    pub fn stats(&self) -> Stats {
        *self.stats.borrow()
    }

    /// Clears every table entry.
    pub fn invalidate_all(&self) {
        self.tables.borrow_mut().clear();
        self.evaluators.borrow_mut().clear();
    }

    /// Clears only the entries of the named predicate; other predicates'
    /// answers stay cached.
    pub fn invalidate_predicate(&self, name: &str) {
        self.tables
            .borrow_mut()
            .retain(|pattern, _| pattern.predicate != name);
        self.evaluators
            .borrow_mut()
            .retain(|pattern, _| pattern.predicate != name);
    }

    pub fn table_count(&self) -> usize {
        self.tables.borrow().len()
    }

    fn entry(&self, pattern: &CallPattern) -> Option<Rc<Subgoal>> {
        self.tables.borrow().get(pattern).cloned()
    }

    /// Evaluates a subgoal, memoizing through its call pattern. Concurrent
    /// (recursive) callers of the same pattern receive the producer's
    /// current answer snapshot and are completed by the SCC fixed point at
    /// the evaluation root.
    pub fn evaluate(
        &self,
        ctx: &Context,
        pattern: CallPattern,
        evaluator: Evaluator,
    ) -> Result<Vec<Answer>> {
        ctx.checkpoint()?;

        // At the table cap, unknown subgoals run unmemoized.
        if self.config.max_table_size > 0
            && !self.tables.borrow().contains_key(&pattern)
            && self.tables.borrow().len() >= self.config.max_table_size
        {
            debug!(%pattern, "table cap reached; evaluating untabled");
            return evaluator(self, ctx);
        }

        let entry = {
            let mut tables = self.tables.borrow_mut();
            match tables.get(&pattern) {
                Some(entry) => Rc::clone(entry),
                None => {
                    let entry = Rc::new(Subgoal::new(pattern.clone()));
                    tables.insert(pattern.clone(), Rc::clone(&entry));
                    self.stats.borrow_mut().tables += 1;
                    entry
                }
            }
        };
        self.evaluators
            .borrow_mut()
            .entry(pattern.clone())
            .or_insert_with(|| Rc::clone(&evaluator));

        match entry.status() {
            Status::Complete => {
                self.stats.borrow_mut().hits += 1;
                Ok(entry.answers())
            }
            Status::Failed => Err(entry
                .error()
                .unwrap_or(Error::InvalidArgument(format!("failed subgoal {}", pattern)))),
            Status::Evaluating => {
                if self.stack.borrow().is_empty() {
                    // A previous root evaluation aborted mid-flight; close
                    // the leftover components before answering.
                    self.run_fixpoint(ctx)?;
                    return match entry.status() {
                        Status::Failed => Err(entry
                            .error()
                            .unwrap_or(Error::FixpointOverflow { iterations: 0 })),
                        _ => Ok(entry.answers()),
                    };
                }
                // Delayed consumption: hand out the current snapshot and
                // record the dependency edge for the fixed point.
                if let Some(consumer) = self.stack.borrow().last() {
                    if let Some(consumer_entry) = self.entry(consumer) {
                        consumer_entry.add_dep(pattern.clone());
                    }
                }
                self.stats.borrow_mut().hits += 1;
                Ok(entry.answers())
            }
            Status::New | Status::Invalidated => {
                entry.set_status(Status::Evaluating);
                self.run_evaluator(ctx, &entry, &evaluator)?;
                if self.stack.borrow().is_empty() {
                    self.run_fixpoint(ctx)?;
                }
                match entry.status() {
                    Status::Failed => Err(entry
                        .error()
                        .unwrap_or(Error::FixpointOverflow { iterations: 0 })),
                    _ => Ok(entry.answers()),
                }
            }
        }
    }

    /// Stratified negation-as-failure: succeeds iff the (fully evaluated)
    /// subgoal has zero answers. The negated predicate must be in a strictly
    /// lower stratum than the caller.
    pub fn negate(
        &self,
        ctx: &Context,
        pattern: CallPattern,
        evaluator: Evaluator,
    ) -> Result<bool> {
        let caller = self.stack.borrow().last().cloned();
        let caller_stratum = match &caller {
            Some(c) => self.stratum(&c.predicate),
            None => i32::MAX,
        };
        if self.stratum(&pattern.predicate) >= caller_stratum {
            let caller_name = caller
                .as_ref()
                .map(|c| c.predicate.clone())
                .unwrap_or_else(|| "query".to_string());
            let violation = Error::StratificationViolation {
                predicate: pattern.predicate.clone(),
                caller: caller_name,
            };
            if let Some(c) = &caller {
                if let Some(entry) = self.entry(c) {
                    entry.fail(violation.clone());
                }
            }
            return Err(violation);
        }

        // Evaluate the negated subgoal as its own root so its SCC closes;
        // stratification guarantees it cannot depend on the caller.
        let saved = self.stack.replace(vec![]);
        let result = self.evaluate(ctx, pattern.clone(), evaluator);
        *self.stack.borrow_mut() = saved;
        let answers = result?;

        if let Some(entry) = self.entry(&pattern) {
            if entry.status() != Status::Complete {
                return Err(Error::StratificationViolation {
                    predicate: pattern.predicate.clone(),
                    caller: caller
                        .map(|c| c.predicate)
                        .unwrap_or_else(|| "query".to_string()),
                });
            }
        }
        Ok(answers.is_empty())
    }

    /// Runs an entry's evaluator with the entry on the stack; returns true
    /// when new answers were added.
    fn run_evaluator(
        &self,
        ctx: &Context,
        entry: &Rc<Subgoal>,
        evaluator: &Evaluator,
    ) -> Result<bool> {
        self.stack.borrow_mut().push(entry.pattern().clone());
        let result = evaluator(self, ctx);
        self.stack.borrow_mut().pop();

        match result {
            Ok(answers) => {
                let mut grew = false;
                for answer in answers {
                    if self.config.max_answers_per_subgoal > 0
                        && entry.answer_count() >= self.config.max_answers_per_subgoal
                    {
                        break;
                    }
                    if entry.insert_answer(answer) {
                        self.stats.borrow_mut().answers += 1;
                        grew = true;
                    }
                }
                Ok(grew)
            }
            Err(error) => {
                entry.fail(error.clone());
                Err(error)
            }
        }
    }

    /// Completes every entry left `Evaluating` by the root evaluation:
    /// trivial SCCs are complete as-is, recursive ones iterate until their
    /// answer sets stop growing. Re-runs can discover fresh subgoals, so the
    /// scan repeats until nothing is left evaluating.
    fn run_fixpoint(&self, ctx: &Context) -> Result<()> {
        loop {
            let evaluating: Vec<Rc<Subgoal>> = self
                .tables
                .borrow()
                .values()
                .filter(|e| e.status() == Status::Evaluating)
                .cloned()
                .collect();
            if evaluating.is_empty() {
                return Ok(());
            }
            self.close_components(ctx, evaluating)?;
        }
    }

    fn close_components(&self, ctx: &Context, evaluating: Vec<Rc<Subgoal>>) -> Result<()> {
        // Dependency graph over the still-evaluating entries.
        let mut graph = DiGraph::<usize, ()>::new();
        let mut index = HashMap::new();
        for (i, entry) in evaluating.iter().enumerate() {
            let node = graph.add_node(i);
            index.insert(entry.pattern().clone(), node);
        }
        for entry in &evaluating {
            let from = index[entry.pattern()];
            for dep in entry.deps() {
                if let Some(&to) = index.get(&dep) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        // tarjan_scc yields components in reverse topological order, so
        // dependencies complete before their dependents.
        for scc in tarjan_scc(&graph) {
            let members: Vec<&Rc<Subgoal>> = scc.iter().map(|&n| &evaluating[graph[n]]).collect();
            let recursive = members.len() > 1 || members[0].depends_on_self();
            if !recursive {
                members[0].set_status(Status::Complete);
                continue;
            }

            let mut converged = false;
            for _ in 0..self.config.max_fixpoint_iterations {
                ctx.checkpoint()?;
                self.stats.borrow_mut().fixpoint_rounds += 1;
                let mut changed = false;
                for member in &members {
                    let evaluator = self
                        .evaluators
                        .borrow()
                        .get(member.pattern())
                        .cloned()
                        .expect("evaluating entry has an evaluator");
                    changed |= self.run_evaluator(ctx, member, &evaluator)?;
                }
                if !changed {
                    converged = true;
                    break;
                }
            }
            if converged {
                for member in &members {
                    member.set_status(Status::Complete);
                }
                debug!(members = members.len(), "scc fixpoint closed");
            } else {
                let overflow = Error::FixpointOverflow {
                    iterations: self.config.max_fixpoint_iterations,
                };
                for member in &members {
                    member.fail(overflow.clone());
                }
                return Err(overflow);
            }
        }
        Ok(())
    }
}
