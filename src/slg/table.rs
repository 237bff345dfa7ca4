use super::pattern::{answer_key, CallPattern, CanonTerm};
use crate::error::Error;
use crate::lterm::LTerm;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// Per-subgoal evaluation status.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    New,
    Evaluating,
    Complete,
    Failed,
    Invalidated,
}

/// An answer: the instantiation of the call's arguments, deep-walked at
/// answer time.
pub type Answer = Vec<LTerm>;

/// One subgoal table entry: the call pattern, its answer set (deduplicated
/// by canonical form), the subgoals it consumed from, and the evaluation
/// status.
pub struct Subgoal {
    pattern: CallPattern,
    status: Cell<Status>,
    answers: RefCell<Vec<Answer>>,
    keys: RefCell<HashSet<Vec<CanonTerm>>>,
    deps: RefCell<HashSet<CallPattern>>,
    error: RefCell<Option<Error>>,
}

impl Subgoal {
    pub fn new(pattern: CallPattern) -> Subgoal {
        Subgoal {
            pattern,
            status: Cell::new(Status::New),
            answers: RefCell::new(vec![]),
            keys: RefCell::new(HashSet::new()),
            deps: RefCell::new(HashSet::new()),
            error: RefCell::new(None),
        }
    }

    pub fn pattern(&self) -> &CallPattern {
        &self.pattern
    }

    pub fn status(&self) -> Status {
        self.status.get()
    }

    pub fn set_status(&self, status: Status) {
        self.status.set(status);
    }

    pub fn fail(&self, error: Error) {
        self.status.set(Status::Failed);
        *self.error.borrow_mut() = Some(error);
    }

    pub fn error(&self) -> Option<Error> {
        self.error.borrow().clone()
    }

    /// Inserts an answer unless an equal one (after canonicalization) is
    /// already present; true when the set grew.
    pub fn insert_answer(&self, answer: Answer) -> bool {
        let key = answer_key(&answer);
        if self.keys.borrow_mut().insert(key) {
            self.answers.borrow_mut().push(answer);
            true
        } else {
            false
        }
    }

    pub fn answer_count(&self) -> usize {
        self.answers.borrow().len()
    }

    pub fn answers(&self) -> Vec<Answer> {
        self.answers.borrow().clone()
    }

    pub fn add_dep(&self, pattern: CallPattern) {
        self.deps.borrow_mut().insert(pattern);
    }

    pub fn deps(&self) -> Vec<CallPattern> {
        self.deps.borrow().iter().cloned().collect()
    }

    pub fn depends_on_self(&self) -> bool {
        self.deps.borrow().contains(&self.pattern)
    }
}

impl std::fmt::Debug for Subgoal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Subgoal")
            .field("pattern", &self.pattern)
            .field("status", &self.status.get())
            .field("answers", &self.answers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slg::pattern::canonicalize;
    use crate::state::SMap;

    #[test]
    fn test_subgoal_dedup() {
        let pattern = canonicalize("p", &[LTerm::any()], &SMap::new());
        let entry = Subgoal::new(pattern);

        assert!(entry.insert_answer(vec![LTerm::from(1)]));
        assert!(!entry.insert_answer(vec![LTerm::from(1)]));
        assert!(entry.insert_answer(vec![LTerm::from(2)]));
        assert_eq!(entry.answer_count(), 2);
    }

    #[test]
    fn test_subgoal_dedup_modulo_variables() {
        let pattern = canonicalize("p", &[LTerm::any()], &SMap::new());
        let entry = Subgoal::new(pattern);

        // Two answers equal up to variable renaming collapse.
        assert!(entry.insert_answer(vec![LTerm::any()]));
        assert!(!entry.insert_answer(vec![LTerm::any()]));
    }

    #[test]
    fn test_subgoal_status() {
        let pattern = canonicalize("p", &[], &SMap::new());
        let entry = Subgoal::new(pattern);
        assert_eq!(entry.status(), Status::New);
        entry.set_status(Status::Evaluating);
        assert_eq!(entry.status(), Status::Evaluating);
        entry.fail(Error::FixpointOverflow { iterations: 10 });
        assert_eq!(entry.status(), Status::Failed);
        assert!(entry.error().is_some());
    }
}
